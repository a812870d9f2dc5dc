use crate::{
    error::{ErrorOrigin, OrmError},
    model::{FieldDescriptor, FieldModel, FieldTag, RelationModel},
};
use std::collections::{HashMap, HashSet};

///
/// EntityModel
///
/// Static runtime description of a record type, emitted once per type by
/// `#[derive(Entity)]`.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Rust type identifier.
    pub ident: &'static str,
    /// `module_path!()` of the declaring module.
    pub path: &'static str,
    /// Explicit qualified name, when overridden.
    pub name: Option<&'static str>,
    /// Fields in declaration order.
    pub fields: &'static [FieldModel],
}

impl EntityModel {
    /// Qualified name: explicit override, or `{module}.{Ident}`.
    #[must_use]
    pub fn name(&self) -> String {
        match self.name {
            Some(name) => name.to_string(),
            None => {
                let module = self.path.rsplit("::").next().unwrap_or(self.path);
                format!("{module}.{}", self.ident)
            }
        }
    }

    #[must_use]
    pub fn table_name(&self) -> String {
        self.name().replace('.', "_")
    }

    /// Fully qualified origin of the type, used to detect two types
    /// competing for one table.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("{}::{}", self.path, self.ident)
    }

    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        self.path == other.path && self.ident == other.ident
    }

    #[must_use]
    pub fn primary_key_index(&self) -> Option<usize> {
        self.fields.iter().position(|field| {
            FieldTag::parse(field.tag).is_ok_and(|tag| tag.is_primary_key())
        })
    }

    /// Parse and validate every field declaration.
    pub fn describe(&self) -> Result<Vec<FieldDescriptor>, OrmError> {
        if self.fields.is_empty() {
            return Err(OrmError::invalid_argument(
                ErrorOrigin::Model,
                format!("{} declares no fields", self.name()),
            ));
        }

        let entity = self.name();
        let mut columns = HashSet::new();
        let mut primary_key: Option<&str> = None;
        let mut descriptors = Vec::with_capacity(self.fields.len());

        for (index, field) in self.fields.iter().enumerate() {
            let tag = FieldTag::parse(field.tag)
                .map_err(|err| OrmError::malformed_tag(&entity, field.tag, err))?;
            let field_type = field.field_type();

            if tag.is_auto_increment() && !field_type.kind.is_integer() {
                return Err(OrmError::malformed_tag(
                    &entity,
                    field.tag,
                    format!("auto-increment on {} field", field_type.kind),
                ));
            }
            if tag.is_primary_key() {
                if field_type.kind.is_composite() {
                    return Err(OrmError::malformed_tag(
                        &entity,
                        field.tag,
                        format!("primary key on {} field", field_type.kind),
                    ));
                }
                if let Some(existing) = primary_key {
                    return Err(OrmError::malformed_tag(
                        &entity,
                        field.tag,
                        format!("second primary key, '{existing}' already declared"),
                    ));
                }
                primary_key = Some(field.name);
            }
            if !columns.insert(tag.name().to_string()) {
                return Err(OrmError::malformed_tag(
                    &entity,
                    field.tag,
                    "duplicate column name",
                ));
            }

            descriptors.push(FieldDescriptor {
                index,
                name: field.name,
                tag,
                field_type,
            });
        }

        Ok(descriptors)
    }

    /// Relation fields declared directly on this model.
    pub fn relations(&'static self) -> Result<Vec<RelationModel>, OrmError> {
        Ok(self
            .describe()?
            .iter()
            .filter_map(|field| RelationModel::of(self, field))
            .collect())
    }

    /// Every related model reachable from this one, leaves first, each
    /// listed once. The model itself is never included.
    pub fn dependencies(&'static self) -> Result<Vec<&'static Self>, OrmError> {
        let mut claimed = HashMap::from([(self.table_name(), self.origin())]);
        let mut resolved = Vec::new();
        self.collect_dependencies(&mut claimed, &mut resolved)?;

        Ok(resolved)
    }

    fn collect_dependencies(
        &'static self,
        claimed: &mut HashMap<String, String>,
        resolved: &mut Vec<&'static Self>,
    ) -> Result<(), OrmError> {
        for field in self.describe()? {
            let Some(dependency) = field.field_type.dependency() else {
                continue;
            };

            let table = dependency.table_name();
            let origin = dependency.origin();
            match claimed.get(&table) {
                Some(existing) if *existing == origin => continue,
                Some(existing) => return Err(OrmError::conflicting_type(&table, existing, &origin)),
                None => {}
            }

            claimed.insert(table, origin);
            dependency.collect_dependencies(claimed, resolved)?;
            resolved.push(dependency);
        }

        Ok(())
    }
}
