//! Layout tree
//!
//! Rows contain columns, columns contain sections, and a section holds either
//! a flat list of field references or a list of tabs that each hold their own
//! list. Only ids and type ids are stored here; settings live in
//! [`Campaign::fields`](crate::Campaign::fields).

use crate::campaign::FieldId;
use crate::error::{BuilderError, Result};
use crate::fields::format::normalize_type_id;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference from the layout to a field instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub type_id: String,
}

impl FieldRef {
    pub fn new(id: FieldId, type_id: impl Into<String>) -> Self {
        Self {
            id,
            type_id: type_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowKind {
    Header,
    #[default]
    Row,
    Tabs,
}

impl RowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RowKind::Header => "header",
            RowKind::Row => "row",
            RowKind::Tabs => "tabs",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(rename = "type", default)]
    pub kind: RowKind,
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Section {
    Fields {
        #[serde(default)]
        fields: Vec<FieldRef>,
    },
    Header {
        #[serde(default)]
        fields: Vec<FieldRef>,
    },
    Tabs {
        #[serde(default)]
        tabs: Vec<Tab>,
    },
}

impl Default for Section {
    fn default() -> Self {
        Section::Fields { fields: Vec::new() }
    }
}

impl Section {
    pub fn kind(&self) -> &'static str {
        match self {
            Section::Fields { .. } => "fields",
            Section::Header { .. } => "header",
            Section::Tabs { .. } => "tabs",
        }
    }

    /// Every reference in this section, tabs flattened in order
    pub fn field_refs(&self) -> Box<dyn Iterator<Item = &FieldRef> + '_> {
        match self {
            Section::Fields { fields } | Section::Header { fields } => Box::new(fields.iter()),
            Section::Tabs { tabs } => Box::new(tabs.iter().flat_map(|tab| tab.fields.iter())),
        }
    }

    fn field_list_mut(&mut self, tab: Option<usize>) -> Option<&mut Vec<FieldRef>> {
        match (self, tab) {
            (Section::Fields { fields } | Section::Header { fields }, None) => Some(fields),
            (Section::Tabs { tabs }, Some(index)) => tabs.get_mut(index).map(|t| &mut t.fields),
            _ => None,
        }
    }

    fn remove(&mut self, id: FieldId) -> Option<FieldRef> {
        let lists: Vec<&mut Vec<FieldRef>> = match self {
            Section::Fields { fields } | Section::Header { fields } => vec![fields],
            Section::Tabs { tabs } => tabs.iter_mut().map(|t| &mut t.fields).collect(),
        };
        for list in lists {
            if let Some(pos) = list.iter().position(|r| r.id == id) {
                return Some(list.remove(pos));
            }
        }
        None
    }
}

/// Position of a field list within the tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionAddress {
    pub row: usize,
    pub column: usize,
    pub section: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab: Option<usize>,
}

impl SectionAddress {
    pub fn new(row: usize, column: usize, section: usize) -> Self {
        Self {
            row,
            column,
            section,
            tab: None,
        }
    }

    pub fn in_tab(mut self, tab: usize) -> Self {
        self.tab = Some(tab);
        self
    }
}

impl fmt::Display for SectionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} column {} section {}",
            self.row, self.column, self.section
        )?;
        if let Some(tab) = self.tab {
            write!(f, " tab {tab}")?;
        }
        Ok(())
    }
}

/// The page structure of one campaign
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutTree {
    pub rows: Vec<Row>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.rows
            .iter()
            .flat_map(|row| row.columns.iter())
            .flat_map(|column| column.sections.iter())
    }

    /// Every field reference in depth-first tree order
    pub fn field_refs(&self) -> impl Iterator<Item = &FieldRef> {
        self.sections().flat_map(Section::field_refs)
    }

    pub fn find(&self, id: FieldId) -> Option<&FieldRef> {
        self.field_refs().find(|r| r.id == id)
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.find(id).is_some()
    }

    /// Number of placed instances of a field type. References spelled
    /// differently (`DonateAmount`, `donate_amount`) count toward the same type.
    pub fn count_type(&self, type_id: &str) -> usize {
        let wanted = normalize_type_id(type_id);
        self.field_refs()
            .filter(|r| r.type_id == type_id || normalize_type_id(&r.type_id) == wanted)
            .count()
    }

    /// References whose id has no entry in the settings map
    pub fn dangling_refs<'a, V>(&'a self, fields: &IndexMap<FieldId, V>) -> Vec<&'a FieldRef> {
        self.field_refs()
            .filter(|r| !fields.contains_key(&r.id))
            .collect()
    }

    /// Append a reference to the addressed section, or to the first flat
    /// field list when no address is given. An empty tree grows a row.
    pub fn append(
        &mut self,
        field: FieldRef,
        at: Option<&SectionAddress>,
    ) -> Result<SectionAddress> {
        let address = match at {
            Some(address) => *address,
            None => self.first_field_list(),
        };
        self.field_list_mut(&address)?.push(field);
        Ok(address)
    }

    /// Insert at `index` within the addressed list, clamped to its length
    pub fn insert(
        &mut self,
        field: FieldRef,
        at: &SectionAddress,
        index: usize,
    ) -> Result<()> {
        let list = self.field_list_mut(at)?;
        let index = index.min(list.len());
        list.insert(index, field);
        Ok(())
    }

    pub fn remove(&mut self, id: FieldId) -> Option<FieldRef> {
        self.rows
            .iter_mut()
            .flat_map(|row| row.columns.iter_mut())
            .flat_map(|column| column.sections.iter_mut())
            .find_map(|section| section.remove(id))
    }

    /// Move a field to another list. The tree is unchanged on error.
    pub fn move_field(
        &mut self,
        id: FieldId,
        to: &SectionAddress,
        index: Option<usize>,
    ) -> Result<()> {
        self.field_list_mut(to)?;
        let field = self.remove(id).ok_or(BuilderError::FieldNotFound { id })?;
        let list = self.field_list_mut(to)?;
        let index = index.unwrap_or(list.len()).min(list.len());
        list.insert(index, field);
        Ok(())
    }

    fn first_field_list(&mut self) -> SectionAddress {
        for (r, row) in self.rows.iter().enumerate() {
            for (c, column) in row.columns.iter().enumerate() {
                for (s, section) in column.sections.iter().enumerate() {
                    if matches!(section, Section::Fields { .. }) {
                        return SectionAddress::new(r, c, s);
                    }
                }
            }
        }
        self.rows.push(Row {
            kind: RowKind::Row,
            columns: vec![Column {
                sections: vec![Section::default()],
            }],
        });
        SectionAddress::new(self.rows.len() - 1, 0, 0)
    }

    fn field_list_mut(&mut self, address: &SectionAddress) -> Result<&mut Vec<FieldRef>> {
        self.rows
            .get_mut(address.row)
            .and_then(|row| row.columns.get_mut(address.column))
            .and_then(|column| column.sections.get_mut(address.section))
            .and_then(|section| section.field_list_mut(address.tab))
            .ok_or_else(|| BuilderError::InvalidLayoutAddress {
                address: address.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tabs_layout() -> LayoutTree {
        serde_json::from_value(json!([
            {"type": "header", "columns": [{"sections": [
                {"type": "header", "fields": [{"id": 0, "type": "campaign-title"}]}
            ]}]},
            {"columns": [
                {"sections": [{"type": "fields", "fields": [
                    {"id": 1, "type": "photo"},
                    {"id": 2, "type": "text"}
                ]}]},
                {"sections": [{"type": "tabs", "tabs": [
                    {"title": "Story", "fields": [{"id": 3, "type": "campaign-description"}]},
                    {"title": "Donors", "fields": [{"id": 4, "type": "donor-wall"}]}
                ]}]}
            ]}
        ]))
        .unwrap()
    }

    #[test]
    fn test_deserialize_defaults_row_kind() {
        let layout = tabs_layout();
        assert_eq!(layout.rows[0].kind, RowKind::Header);
        assert_eq!(layout.rows[1].kind, RowKind::Row);
    }

    #[test]
    fn test_field_refs_in_tree_order() {
        let ids: Vec<u32> = tabs_layout().field_refs().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_count_type() {
        let layout = tabs_layout();
        assert_eq!(layout.count_type("photo"), 1);
        assert_eq!(layout.count_type("progress-bar"), 0);
    }

    #[test]
    fn test_count_type_matches_alias_spellings() {
        let mut layout = LayoutTree::new();
        for (id, type_id) in [(0, "DonateAmount"), (1, "donate_amount"), (2, "donate-amount")] {
            layout
                .append(FieldRef::new(FieldId(id), type_id), None)
                .unwrap();
        }
        assert_eq!(layout.count_type("donate-amount"), 3);
        assert_eq!(layout.count_type("DonateAmount"), 3);
        assert_eq!(layout.count_type("donate-button"), 0);
    }

    #[test]
    fn test_append_to_first_fields_section() {
        let mut layout = tabs_layout();
        let address = layout
            .append(FieldRef::new(FieldId(9), "spacer"), None)
            .unwrap();
        assert_eq!(address, SectionAddress::new(1, 0, 0));
        let last = layout.rows[1].columns[0].sections[0]
            .field_refs()
            .last()
            .unwrap()
            .id;
        assert_eq!(last, FieldId(9));
    }

    #[test]
    fn test_append_to_empty_tree_creates_row() {
        let mut layout = LayoutTree::new();
        let address = layout
            .append(FieldRef::new(FieldId(0), "text"), None)
            .unwrap();
        assert_eq!(address, SectionAddress::new(0, 0, 0));
        assert_eq!(layout.rows.len(), 1);
        assert!(layout.contains(FieldId(0)));
    }

    #[test]
    fn test_append_into_tab() {
        let mut layout = tabs_layout();
        let at = SectionAddress::new(1, 1, 0).in_tab(1);
        layout.append(FieldRef::new(FieldId(5), "text"), Some(&at)).unwrap();
        match &layout.rows[1].columns[1].sections[0] {
            Section::Tabs { tabs } => assert_eq!(tabs[1].fields.len(), 2),
            other => panic!("expected tabs, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_address() {
        let mut layout = tabs_layout();
        let tab_section_without_tab = SectionAddress::new(1, 1, 0);
        assert!(matches!(
            layout.append(FieldRef::new(FieldId(5), "text"), Some(&tab_section_without_tab)),
            Err(BuilderError::InvalidLayoutAddress { .. })
        ));
        let out_of_range = SectionAddress::new(9, 0, 0);
        assert!(layout
            .append(FieldRef::new(FieldId(5), "text"), Some(&out_of_range))
            .is_err());
    }

    #[test]
    fn test_move_field_between_sections() {
        let mut layout = tabs_layout();
        let to = SectionAddress::new(1, 1, 0).in_tab(0);
        layout.move_field(FieldId(1), &to, Some(0)).unwrap();

        let ids: Vec<u32> = layout.field_refs().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![0, 2, 1, 3, 4]);
    }

    #[test]
    fn test_move_to_bad_address_leaves_tree_intact() {
        let mut layout = tabs_layout();
        let before = layout.clone();
        let result = layout.move_field(FieldId(1), &SectionAddress::new(5, 0, 0), None);
        assert!(result.is_err());
        assert_eq!(layout, before);
    }

    #[test]
    fn test_remove_and_dangling() {
        let mut layout = tabs_layout();
        assert_eq!(layout.remove(FieldId(3)).unwrap().type_id, "campaign-description");
        assert!(layout.remove(FieldId(3)).is_none());

        let mut fields: IndexMap<FieldId, ()> = IndexMap::new();
        fields.insert(FieldId(0), ());
        fields.insert(FieldId(1), ());
        let dangling: Vec<u32> = layout
            .dangling_refs(&fields)
            .into_iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(dangling, vec![2, 4]);
    }
}
