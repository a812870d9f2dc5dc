use proc_macro::TokenStream;

mod entity;

/// Derive `Entity`, `Record`, `Column` and `Element` for a struct with
/// named fields.
///
/// - `#[orm(name = "pkg.Unit")]` on the struct overrides the qualified name.
/// - `#[orm("col key auto")]` on a field sets its tag; the default tag is
///   the field name.
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input.into()).into()
}
