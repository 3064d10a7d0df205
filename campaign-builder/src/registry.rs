//! Field type registry
//!
//! Maps type ids to [`FieldType`] implementations. The registry is built once
//! at startup and treated as immutable afterwards; it is shared read-only by
//! every render.

use crate::campaign::Campaign;
use crate::fields::format::normalize_type_id;
use crate::fields::kinds::builtin_fields;
use crate::fields::{FieldDefinition, FieldGroup, FieldType};
use indexmap::IndexMap;
use serde::Serialize;

/// One entry of the builder's "add block" palette
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteEntry {
    pub type_id: String,
    pub display_name: String,
    pub icon: String,
    pub group: FieldGroup,
    pub default_order: u32,
    pub max_instances: Option<u32>,
    /// Instances already placed on the page
    pub count: usize,
    /// The type is at its per-page limit
    pub add_disabled: bool,
}

impl PaletteEntry {
    fn new(definition: &FieldDefinition, count: usize) -> Self {
        Self {
            type_id: definition.type_id.clone(),
            display_name: definition.display_name.clone(),
            icon: definition.icon.clone(),
            group: definition.group,
            default_order: definition.default_order,
            max_instances: definition.max_instances,
            count,
            add_disabled: !definition.allows_another(count),
        }
    }
}

/// Registered field types, keyed by type id
#[derive(Default)]
pub struct FieldRegistry {
    types: IndexMap<String, Box<dyn FieldType>>,
}

impl FieldRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in field type
    pub fn with_builtin_fields() -> Self {
        let mut registry = Self::new();
        for field in builtin_fields() {
            registry.register_boxed(field);
        }
        registry
    }

    /// Register a field type, replacing any type with the same id
    pub fn register<T: FieldType + 'static>(&mut self, field: T) {
        self.register_boxed(Box::new(field));
    }

    pub fn register_boxed(&mut self, field: Box<dyn FieldType>) {
        let type_id = field.type_id().to_string();
        if self.types.contains_key(&type_id) {
            tracing::debug!(type_id = %type_id, "replacing registered field type");
        } else {
            tracing::debug!(type_id = %type_id, "registering field type");
        }
        self.types.insert(type_id, field);
    }

    /// Look a type up by id.
    ///
    /// Ids that differ only in spelling (`ProgressBar`, `progress_bar`) resolve
    /// to the same type.
    pub fn get(&self, type_id: &str) -> Option<&dyn FieldType> {
        self.types
            .get(type_id)
            .or_else(|| self.types.get(&normalize_type_id(type_id)))
            .map(|field| field.as_ref())
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.get(type_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered ids in registration order
    pub fn type_ids(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    /// Definitions ordered by `(default_order, type_id)`, optionally limited
    /// to one palette group
    pub fn definitions(&self, group: Option<FieldGroup>) -> Vec<&FieldDefinition> {
        let mut definitions: Vec<&FieldDefinition> = self
            .types
            .values()
            .map(|field| field.definition())
            .filter(|definition| group.map_or(true, |g| definition.group == g))
            .collect();
        definitions.sort_by(|a, b| {
            a.default_order
                .cmp(&b.default_order)
                .then_with(|| a.type_id.cmp(&b.type_id))
        });
        definitions
    }

    /// The palette for `campaign`: every type with its current instance count
    /// and whether another one may be added
    pub fn palette(&self, campaign: &Campaign) -> Vec<PaletteEntry> {
        self.definitions(None)
            .into_iter()
            .map(|definition| {
                PaletteEntry::new(definition, campaign.layout.count_type(&definition.type_id))
            })
            .collect()
    }
}

impl std::fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("types", &self.type_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::FieldId;
    use crate::fields::kinds::{BUILTIN_TYPE_IDS, CAMPAIGN_TITLE, DONATE_AMOUNT, PROGRESS_BAR, TEXT};
    use crate::fields::RenderContext;
    use crate::layout::{Column, FieldRef, LayoutTree, Row, RowKind, Section};
    use crate::settings::SettingsView;
    use campaign_builder_templating::Markup;

    struct Custom(FieldDefinition);

    impl FieldType for Custom {
        fn definition(&self) -> &FieldDefinition {
            &self.0
        }

        fn render_preview(&self, _settings: &SettingsView<'_>, _ctx: &RenderContext<'_>) -> Markup {
            Markup::text("custom")
        }
    }

    #[test]
    fn test_builtin_registry_has_every_type() {
        let registry = FieldRegistry::with_builtin_fields();
        assert_eq!(registry.len(), BUILTIN_TYPE_IDS.len());
        for id in BUILTIN_TYPE_IDS {
            assert!(registry.contains(id), "missing {id}");
        }
    }

    #[test]
    fn test_lookup_normalizes_spelling() {
        let registry = FieldRegistry::with_builtin_fields();
        assert_eq!(registry.get("ProgressBar").unwrap().type_id(), PROGRESS_BAR);
        assert_eq!(registry.get("progress_bar").unwrap().type_id(), PROGRESS_BAR);
        assert!(registry.get("carousel").is_none());
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = FieldRegistry::with_builtin_fields();
        let count = registry.len();
        registry.register(Custom(FieldDefinition::new(TEXT, "Fancy text")));
        assert_eq!(registry.len(), count);
        assert_eq!(registry.get(TEXT).unwrap().definition().display_name, "Fancy text");
    }

    #[test]
    fn test_definitions_sorted_and_grouped() {
        let registry = FieldRegistry::with_builtin_fields();
        let all = registry.definitions(None);
        assert_eq!(all[0].type_id, CAMPAIGN_TITLE);
        assert!(all
            .windows(2)
            .all(|w| (w[0].default_order, &w[0].type_id) <= (w[1].default_order, &w[1].type_id)));

        let social = registry.definitions(Some(FieldGroup::Social));
        assert_eq!(social.len(), 2);
    }

    #[test]
    fn test_palette_disables_types_at_limit() {
        let registry = FieldRegistry::with_builtin_fields();
        let mut campaign = Campaign::new("x");
        campaign.layout = LayoutTree::new().with_row(Row {
            kind: RowKind::Row,
            columns: vec![Column {
                sections: vec![Section::Fields {
                    fields: vec![
                        FieldRef::new(FieldId(0), DONATE_AMOUNT),
                        FieldRef::new(FieldId(1), TEXT),
                        FieldRef::new(FieldId(2), TEXT),
                    ],
                }],
            }],
        });

        let palette = registry.palette(&campaign);
        let donate = palette.iter().find(|e| e.type_id == DONATE_AMOUNT).unwrap();
        assert_eq!(donate.count, 1);
        assert!(donate.add_disabled);
        let text = palette.iter().find(|e| e.type_id == TEXT).unwrap();
        assert_eq!(text.count, 2);
        assert!(!text.add_disabled);
    }
}
