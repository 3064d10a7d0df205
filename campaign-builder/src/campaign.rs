//! The campaign document
//!
//! A campaign round-trips through one serialized document: general settings,
//! donation options, the settings of every field instance and the layout tree
//! that positions them. A campaign with id 0 has never been saved.

use crate::error::{BuilderError, Result};
use crate::layout::{FieldRef, LayoutTree, SectionAddress};
use crate::settings::FieldSettings;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Campaign identifier. Zero means "not persisted yet".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CampaignId(pub u64);

impl CampaignId {
    pub const UNSAVED: CampaignId = CampaignId(0);

    pub fn is_unsaved(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Field instance identifier, unique within one campaign
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FieldId(pub u32);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FieldId {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BuilderError::InvalidFieldId {
                value: s.to_string(),
            });
        }
        trimmed
            .parse::<u32>()
            .map(FieldId)
            .map_err(|_| BuilderError::InvalidFieldId {
                value: s.to_string(),
            })
    }
}

/// General campaign settings. Unknown keys are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub goal: Option<f64>,
    pub description: String,
    pub overview: String,
    pub creator_id: Option<u64>,
    /// Public URL of the campaign page, used for sharing links
    pub url: Option<String>,
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedDonation {
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonationOptions {
    pub suggested_donations: Vec<SuggestedDonation>,
    /// `None` defers to the configured default
    pub allow_custom_donations: Option<bool>,
    pub minimum_donation: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignSettings {
    pub general: GeneralSettings,
    pub donation_options: DonationOptions,
}

/// A placed field as seen through the layout: its id, type and settings
#[derive(Debug, Clone, Copy)]
pub struct FieldInstance<'a> {
    pub id: FieldId,
    pub type_id: &'a str,
    pub settings: Option<&'a FieldSettings>,
}

/// One fundraising campaign page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Campaign {
    pub id: CampaignId,
    pub title: String,
    pub settings: CampaignSettings,
    pub fields: IndexMap<FieldId, FieldSettings>,
    pub layout: LayoutTree,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

impl Campaign {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: CampaignId) -> Self {
        self.id = id;
        self
    }

    pub fn with_goal(mut self, goal: f64) -> Self {
        self.settings.general.goal = Some(goal);
        self
    }

    pub fn is_unsaved(&self) -> bool {
        self.id.is_unsaved()
    }

    /// The fundraising goal, or 0 when none is set
    pub fn goal(&self) -> f64 {
        self.settings
            .general
            .goal
            .filter(|goal| goal.is_finite() && *goal > 0.0)
            .unwrap_or(0.0)
    }

    /// One past the highest id used by either the field map or the layout.
    pub fn next_field_id(&self) -> FieldId {
        self.fields
            .keys()
            .copied()
            .chain(self.layout.field_refs().map(|r| r.id))
            .max()
            .map(|FieldId(max)| FieldId(max.saturating_add(1)))
            .unwrap_or_default()
    }

    pub fn field_settings(&self, id: FieldId) -> Option<&FieldSettings> {
        self.fields.get(&id)
    }

    pub fn field(&self, id: FieldId) -> Option<FieldInstance<'_>> {
        self.layout.find(id).map(|field_ref| FieldInstance {
            id,
            type_id: field_ref.type_id.as_str(),
            settings: self.fields.get(&id),
        })
    }

    /// All placed fields in layout order
    pub fn instances(&self) -> impl Iterator<Item = FieldInstance<'_>> {
        self.layout.field_refs().map(move |field_ref| FieldInstance {
            id: field_ref.id,
            type_id: field_ref.type_id.as_str(),
            settings: self.fields.get(&field_ref.id),
        })
    }

    /// Place a new field, assigning it the next free id.
    pub fn insert_field(
        &mut self,
        type_id: impl Into<String>,
        settings: FieldSettings,
        at: Option<&SectionAddress>,
    ) -> Result<(FieldId, SectionAddress)> {
        let id = self.next_field_id();
        let address = self.layout.append(FieldRef::new(id, type_id), at)?;
        self.fields.insert(id, settings);
        Ok((id, address))
    }

    /// Remove a field from both the layout and the settings map.
    pub fn delete_field(&mut self, id: FieldId) -> Result<Option<FieldSettings>> {
        let removed_ref = self.layout.remove(id);
        let removed_settings = self.fields.shift_remove(&id);
        if removed_ref.is_none() && removed_settings.is_none() {
            return Err(BuilderError::FieldNotFound { id });
        }
        Ok(removed_settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_id_parsing() {
        assert_eq!("12".parse::<FieldId>().unwrap(), FieldId(12));
        assert_eq!(" 3 ".parse::<FieldId>().unwrap(), FieldId(3));
        assert!(matches!(
            "abc".parse::<FieldId>(),
            Err(BuilderError::InvalidFieldId { .. })
        ));
        assert!("-1".parse::<FieldId>().is_err());
        assert!("".parse::<FieldId>().is_err());
    }

    #[test]
    fn test_next_field_id() {
        let mut campaign = Campaign::new("Clean water");
        assert_eq!(campaign.next_field_id(), FieldId(0));

        campaign.insert_field("text", FieldSettings::new(), None).unwrap();
        campaign.insert_field("photo", FieldSettings::new(), None).unwrap();
        assert_eq!(campaign.next_field_id(), FieldId(2));
    }

    #[test]
    fn test_next_field_id_considers_layout_only_refs() {
        let mut campaign = Campaign::new("x");
        campaign
            .layout
            .append(FieldRef::new(FieldId(7), "text"), None)
            .unwrap();
        assert_eq!(campaign.next_field_id(), FieldId(8));
    }

    #[test]
    fn test_delete_field() {
        let mut campaign = Campaign::new("x");
        let (id, _) = campaign
            .insert_field("text", FieldSettings::new().with("headline", "Hi"), None)
            .unwrap();

        let removed = campaign.delete_field(id).unwrap();
        assert_eq!(removed.unwrap().string("headline").as_deref(), Some("Hi"));
        assert!(campaign.layout.find(id).is_none());
        assert!(matches!(
            campaign.delete_field(id),
            Err(BuilderError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_document_round_trip_keeps_unknown_general_keys() {
        let doc = json!({
            "id": 4,
            "title": "Library roof",
            "settings": {
                "general": {"goal": 1200, "description": "<p>Help</p>", "category": "community"},
                "donation_options": {"suggested_donations": [{"amount": 20}]}
            },
            "fields": {"0": {"headline": "Thanks"}},
            "layout": [{"type": "row", "columns": [{"sections": [
                {"type": "fields", "fields": [{"id": 0, "type": "text"}]}
            ]}]}]
        });

        let campaign: Campaign = serde_json::from_value(doc).unwrap();
        assert_eq!(campaign.id, CampaignId(4));
        assert_eq!(campaign.goal(), 1200.0);
        assert_eq!(
            campaign.settings.general.extra.get("category"),
            Some(&json!("community"))
        );
        assert_eq!(campaign.field(FieldId(0)).unwrap().type_id, "text");

        let back = serde_json::to_value(&campaign).unwrap();
        assert_eq!(back["settings"]["general"]["category"], "community");
        assert_eq!(back["fields"]["0"]["headline"], "Thanks");
    }

    #[test]
    fn test_empty_document_is_default() {
        let campaign: Campaign = serde_json::from_str("{}").unwrap();
        assert!(campaign.is_unsaved());
        assert_eq!(campaign.goal(), 0.0);
        assert!(campaign.layout.is_empty());
    }
}
