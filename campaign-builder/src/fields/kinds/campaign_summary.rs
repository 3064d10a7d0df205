use super::{placeholder, CAMPAIGN_SUMMARY};
use crate::fields::format::format_percent;
use crate::fields::visibility::{is_visible, SubElement};
use crate::fields::{FieldDefinition, FieldGroup, FieldType, RenderContext};
use crate::panel::SettingsPanel;
use crate::settings::{SettingsView, ROUND_PERCENTAGE};
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{Element, Markup};

const SHOW_AMOUNT_DONATED: SubElement =
    SubElement::new("show_amount_donated", "Amount donated", true);
const SHOW_NUMBER_DONORS: SubElement =
    SubElement::new("show_number_donors", "Number of donors", true);
const SHOW_GOAL_PERCENTAGE: SubElement =
    SubElement::new("show_goal_percentage", "Percent of goal", false);
const SHOW_TIME_REMAINING: SubElement =
    SubElement::new("show_time_remaining", "Time remaining", false);

const SUB_ELEMENTS: [SubElement; 4] = [
    SHOW_AMOUNT_DONATED,
    SHOW_NUMBER_DONORS,
    SHOW_GOAL_PERCENTAGE,
    SHOW_TIME_REMAINING,
];

fn stat(class: &str, value: String, label: &str) -> Element {
    Element::new("li")
        .class("cb-summary-item")
        .class(class)
        .child(Element::new("strong").class("cb-summary-value").text(value))
        .child(Element::new("span").class("cb-summary-label").text(label))
}

/// Donation statistics: amount raised, donor count, percent of goal and time left
pub struct CampaignSummaryField {
    definition: FieldDefinition,
}

impl CampaignSummaryField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(CAMPAIGN_SUMMARY, "Campaign Summary")
                .icon("bar-chart")
                .order(35)
                .group(FieldGroup::Donation)
                .min_width(25)
                .sub_elements(&SUB_ELEMENTS),
        }
    }

    fn items(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Vec<Element> {
        let state = ctx.state;
        let mut items = Vec::new();

        if is_visible(settings, &SHOW_AMOUNT_DONATED, true) {
            items.push(stat("cb-summary-donated", ctx.money(state.donated), "raised"));
        }
        if is_visible(settings, &SHOW_NUMBER_DONORS, true) {
            let label = if state.donor_count == 1 { "donor" } else { "donors" };
            items.push(stat(
                "cb-summary-donors",
                state.donor_count.to_string(),
                label,
            ));
        }
        if is_visible(settings, &SHOW_GOAL_PERCENTAGE, state.has_goal()) {
            let percent = format_percent(
                state.percent().unwrap_or(0.0),
                ctx.round_percentages(settings),
            );
            items.push(stat("cb-summary-percentage", percent, "of goal"));
        }
        let time = state.time_remaining_text();
        if is_visible(settings, &SHOW_TIME_REMAINING, time.is_some()) {
            items.push(
                Element::new("li")
                    .class("cb-summary-item cb-summary-time")
                    .child(
                        Element::new("span")
                            .class("cb-summary-label")
                            .text(time.unwrap_or_default()),
                    ),
            );
        }

        items
    }
}

impl Default for CampaignSummaryField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for CampaignSummaryField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        let items = self.items(settings, ctx);
        if items.is_empty() && ctx.is_preview() {
            return Element::new("div")
                .class("cb-campaign-summary")
                .child(placeholder("All summary items are hidden."))
                .render();
        }
        Element::new("ul")
            .class("cb-campaign-summary")
            .children(items)
            .render()
    }

    fn settings_controls(
        &self,
        panel: &mut SettingsPanel,
        settings: &SettingsView<'_>,
        config: &BuilderConfig,
    ) {
        panel.sub_elements(&SUB_ELEMENTS, settings).checkbox(
            ROUND_PERCENTAGE,
            "Round donation percentage",
            settings
                .bool(ROUND_PERCENTAGE)
                .unwrap_or(config.display.round_percentages),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::Campaign;
    use crate::fields::kinds::test_support::render;
    use crate::render::RenderMode;
    use crate::settings::FieldSettings;
    use crate::state::CampaignState;
    use serde_json::json;

    fn render_summary(
        settings: Option<&FieldSettings>,
        state: &CampaignState,
        mode: RenderMode,
    ) -> String {
        render(
            &CampaignSummaryField::new(),
            settings,
            &Campaign::default(),
            state,
            mode,
        )
    }

    #[test]
    fn test_defaults_show_amount_and_donors() {
        let state = CampaignState {
            donated: 300.0,
            donor_count: 1,
            time_remaining: Some("3 days left".into()),
            ..CampaignState::zeroed(1000.0)
        };
        let html = render_summary(None, &state, RenderMode::Display);
        assert!(html.contains("<strong class=\"cb-summary-value\">$300</strong>"));
        assert!(html.contains("<span class=\"cb-summary-label\">donor</span>"));
        assert!(!html.contains("cb-summary-percentage"));
        assert!(!html.contains("3 days left"));
    }

    #[test]
    fn test_selected_items_respect_gates() {
        let settings = FieldSettings::from_value(json!({
            "show_hide": ["show_goal_percentage", "show_time_remaining"]
        }))
        .unwrap();
        let open = CampaignState {
            donated: 250.0,
            time_remaining: Some("3 days left".into()),
            ..CampaignState::zeroed(1000.0)
        };
        let html = render_summary(Some(&settings), &open, RenderMode::Display);
        assert!(html.contains("25%"));
        assert!(html.contains("3 days left"));
        assert!(!html.contains("cb-summary-donated"));

        let closed = CampaignState::zeroed(0.0);
        let html = render_summary(Some(&settings), &closed, RenderMode::Display);
        assert_eq!(html, "<ul class=\"cb-campaign-summary\"></ul>");
    }

    #[test]
    fn test_preview_placeholder_when_everything_hidden() {
        let settings = FieldSettings::from_value(json!({"show_hide": []})).unwrap();
        let html = render_summary(Some(&settings), &CampaignState::default(), RenderMode::Preview);
        assert!(html.contains("cb-placeholder"));
    }
}
