//! Live campaign state
//!
//! Donation totals, donor counts and time remaining are computed elsewhere and
//! handed to the engine through [`StateProvider`]. The engine only formats and
//! conditionally shows them.

use crate::campaign::CampaignId;
use campaign_builder_config::PreviewConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Donor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Creator {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Computed state of one campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignState {
    pub donated: f64,
    /// Zero when the campaign has no goal
    pub goal: f64,
    /// Percent of the goal raised. Derived from `donated / goal` when absent.
    pub percent_donated: Option<f64>,
    pub donor_count: u64,
    pub time_remaining: Option<String>,
    pub goal_achieved: bool,
    pub accepting_donations: bool,
    pub donors: Vec<Donor>,
    pub creator: Option<Creator>,
    /// Placeholder values substituted for an unsaved campaign
    #[serde(skip)]
    pub illustrative: bool,
}

impl Default for CampaignState {
    fn default() -> Self {
        Self::zeroed(0.0)
    }
}

impl CampaignState {
    /// Nothing raised yet, donations open
    pub fn zeroed(goal: f64) -> Self {
        Self {
            donated: 0.0,
            goal: goal.max(0.0),
            percent_donated: None,
            donor_count: 0,
            time_remaining: None,
            goal_achieved: false,
            accepting_donations: true,
            donors: Vec::new(),
            creator: None,
            illustrative: false,
        }
    }

    /// Placeholder state for previewing a campaign without real donations.
    ///
    /// The configured donated/goal ratio is applied to the campaign's own goal
    /// so the preview bar looks the same however large the goal is. A campaign
    /// without a goal keeps a zero goal.
    pub fn illustrative(goal: f64, preview: &PreviewConfig) -> Self {
        let goal = goal.max(0.0);
        let donated = if goal > 0.0 && preview.goal > 0.0 {
            goal * preview.donated / preview.goal
        } else {
            preview.donated
        };
        let donors = preview
            .donor_names
            .iter()
            .enumerate()
            .map(|(i, name)| Donor {
                name: name.clone(),
                amount: Some(25.0 * (i as f64 + 1.0)),
                message: None,
            })
            .collect();

        Self {
            donated,
            goal,
            percent_donated: None,
            donor_count: preview.donor_count,
            time_remaining: Some(preview.time_remaining.clone()).filter(|t| !t.trim().is_empty()),
            goal_achieved: goal > 0.0 && donated >= goal,
            accepting_donations: true,
            donors,
            creator: None,
            illustrative: true,
        }
    }

    pub fn has_goal(&self) -> bool {
        self.goal.is_finite() && self.goal > 0.0
    }

    /// Percentage of the goal raised, `None` without a goal
    pub fn percent(&self) -> Option<f64> {
        if let Some(percent) = self.percent_donated.filter(|p| p.is_finite()) {
            return Some(percent.max(0.0));
        }
        self.has_goal()
            .then(|| (self.donated.max(0.0) / self.goal) * 100.0)
    }

    pub fn time_remaining_text(&self) -> Option<&str> {
        self.time_remaining
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Source of live campaign state
pub trait StateProvider: Send + Sync {
    /// State for a saved campaign, `None` when the provider knows nothing about it
    fn campaign_state(&self, campaign: CampaignId) -> Option<CampaignState>;
}

/// Provider that never has state
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStateProvider;

impl StateProvider for NoStateProvider {
    fn campaign_state(&self, _campaign: CampaignId) -> Option<CampaignState> {
        None
    }
}

/// Fixed states keyed by campaign id
#[derive(Debug, Default, Clone)]
pub struct StaticStateProvider {
    states: HashMap<CampaignId, CampaignState>,
}

impl StaticStateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, campaign: CampaignId, state: CampaignState) -> Self {
        self.states.insert(campaign, state);
        self
    }
}

impl StateProvider for StaticStateProvider {
    fn campaign_state(&self, campaign: CampaignId) -> Option<CampaignState> {
        self.states.get(&campaign).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_derived_from_totals() {
        let state = CampaignState {
            donated: 250.0,
            ..CampaignState::zeroed(1000.0)
        };
        assert_eq!(state.percent(), Some(25.0));
    }

    #[test]
    fn test_percent_without_goal() {
        let state = CampaignState {
            donated: 250.0,
            ..CampaignState::zeroed(0.0)
        };
        assert!(!state.has_goal());
        assert_eq!(state.percent(), None);
    }

    #[test]
    fn test_explicit_percent_wins() {
        let state = CampaignState {
            percent_donated: Some(12.5),
            ..CampaignState::zeroed(0.0)
        };
        assert_eq!(state.percent(), Some(12.5));
    }

    #[test]
    fn test_illustrative_scales_to_goal() {
        let preview = PreviewConfig::default();
        let state = CampaignState::illustrative(1000.0, &preview);
        assert_eq!(state.donated, 500.0);
        assert_eq!(state.percent(), Some(50.0));
        assert!(state.illustrative);
        assert_eq!(state.donors.len(), preview.donor_names.len());
    }

    #[test]
    fn test_illustrative_without_goal_keeps_zero_goal() {
        let state = CampaignState::illustrative(0.0, &PreviewConfig::default());
        assert!(!state.has_goal());
        assert_eq!(state.donated, 2500.0);
    }

    #[test]
    fn test_blank_time_remaining() {
        let state = CampaignState {
            time_remaining: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(state.time_remaining_text(), None);
    }

    #[test]
    fn test_static_provider() {
        let provider =
            StaticStateProvider::new().with_state(CampaignId(3), CampaignState::zeroed(10.0));
        assert!(provider.campaign_state(CampaignId(3)).is_some());
        assert!(provider.campaign_state(CampaignId(4)).is_none());
        assert!(NoStateProvider.campaign_state(CampaignId(3)).is_none());
    }
}
