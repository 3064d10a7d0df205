use super::PROGRESS_BAR;
use crate::fields::format::{format_percent, rounded_percent};
use crate::fields::visibility::{is_visible, SubElement};
use crate::fields::{FieldDefinition, FieldGroup, FieldType, RenderContext};
use crate::panel::SettingsPanel;
use crate::settings::{SettingsView, ROUND_PERCENTAGE};
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{Element, Markup};

const SHOW_DONATED: SubElement = SubElement::new("show_donated", "Amount donated", true);
const SHOW_GOAL: SubElement = SubElement::new("show_goal", "Goal", true);
const SHOW_PERCENTAGE: SubElement = SubElement::new("show_percentage", "Percent raised", false);

const SUB_ELEMENTS: [SubElement; 3] = [SHOW_DONATED, SHOW_GOAL, SHOW_PERCENTAGE];

/// Donation progress toward the campaign goal.
///
/// The goal and percentage labels are gated on the campaign having a goal;
/// the donated amount always renders unless hidden by the operator.
pub struct ProgressBarField {
    definition: FieldDefinition,
}

impl ProgressBarField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(PROGRESS_BAR, "Progress Bar")
                .icon("tasks")
                .order(30)
                .group(FieldGroup::Donation)
                .min_width(25)
                .sub_elements(&SUB_ELEMENTS),
        }
    }

    fn bar(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Element {
        let state = ctx.state;
        let has_goal = state.has_goal();
        let round = ctx.round_percentages(settings);
        let percent = state.percent();

        let mut track = Element::new("div")
            .class("cb-progress")
            .attr("role", "progressbar")
            .attr("aria-valuemin", 0)
            .attr("aria-valuemax", 100);
        if let Some(percent) = percent.filter(|_| has_goal) {
            let fill = rounded_percent(percent).min(100);
            track = track.attr("aria-valuenow", fill).child(
                Element::new("div")
                    .class("cb-progress-fill")
                    .attr("style", format!("width: {fill}%;")),
            );
        }

        let donated = is_visible(settings, &SHOW_DONATED, true).then(|| {
            Element::new("span")
                .class("cb-progress-donated")
                .text(format!("{} raised", ctx.money(state.donated)))
        });
        let goal = is_visible(settings, &SHOW_GOAL, has_goal).then(|| {
            Element::new("span")
                .class("cb-progress-goal")
                .text(format!("of {} goal", ctx.money(state.goal)))
        });
        let percentage = is_visible(settings, &SHOW_PERCENTAGE, has_goal).then(|| {
            Element::new("span")
                .class("cb-progress-percentage")
                .text(format_percent(percent.unwrap_or(0.0), round))
        });

        let labels = Element::new("div")
            .class("cb-progress-labels")
            .child_opt(donated)
            .child_opt(goal)
            .child_opt(percentage);

        Element::new("div")
            .class("cb-progress-bar")
            .class_if(state.goal_achieved, "cb-goal-achieved")
            .child(track)
            .child(labels)
    }
}

impl Default for ProgressBarField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for ProgressBarField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        self.bar(settings, ctx).render()
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
    use crate::fields::kinds::test_support::{panel, render};
    use crate::render::RenderMode;
    use crate::settings::FieldSettings;
    use crate::state::CampaignState;
    use serde_json::json;

    fn settings(value: serde_json::Value) -> FieldSettings {
        FieldSettings::from_value(value).unwrap()
    }

    fn state(donated: f64, goal: f64) -> CampaignState {
        CampaignState {
            donated,
            ..CampaignState::zeroed(goal)
        }
    }

    fn render_bar(settings: Option<&FieldSettings>, state: &CampaignState) -> String {
        render(
            &ProgressBarField::new(),
            settings,
            &Campaign::default(),
            state,
            RenderMode::Display,
        )
    }

    #[test]
    fn test_zero_goal_hides_goal_despite_selection() {
        let s = settings(json!({"show_hide": ["show_donated", "show_goal"]}));
        let html = render_bar(Some(&s), &state(0.0, 0.0));
        assert!(html.contains("<span class=\"cb-progress-donated\">$0 raised</span>"));
        assert!(!html.contains("cb-progress-goal"));
        assert!(!html.contains("cb-progress-fill"));
    }

    #[test]
    fn test_goal_and_fill_with_goal() {
        let s = settings(json!({"show_hide": ["show_donated", "show_goal", "show_percentage"]}));
        let html = render_bar(Some(&s), &state(1250.0, 5000.0));
        assert!(html.contains("$1,250 raised"));
        assert!(html.contains("of $5,000 goal"));
        assert!(html.contains("style=\"width: 25%;\""));
        assert!(html.contains("<span class=\"cb-progress-percentage\">25%</span>"));
    }

    #[test]
    fn test_override_forces_percentage_without_goal() {
        let s = settings(json!({"show_hide": [], "overrides": {"show_percentage": "show"}}));
        let html = render_bar(Some(&s), &state(10.0, 0.0));
        assert!(html.contains("<span class=\"cb-progress-percentage\">0%</span>"));
        assert!(!html.contains("cb-progress-donated"));
    }

    #[test]
    fn test_rounding_never_shows_zero_for_progress() {
        let s = settings(json!({
            "show_hide": ["show_percentage"],
            "round_percentage": "1"
        }));
        let html = render_bar(Some(&s), &state(3.0, 1000.0));
        assert!(html.contains("<span class=\"cb-progress-percentage\">1%</span>"));

        let unrounded = settings(json!({"show_hide": ["show_percentage"]}));
        let html = render_bar(Some(&unrounded), &state(3.0, 1000.0));
        assert!(html.contains("<span class=\"cb-progress-percentage\">0.3%</span>"));
    }

    #[test]
    fn test_new_instance_uses_type_defaults() {
        let html = render_bar(None, &state(50.0, 100.0));
        assert!(html.contains("cb-progress-donated"));
        assert!(html.contains("cb-progress-goal"));
        assert!(!html.contains("cb-progress-percentage"));
    }

    #[test]
    fn test_fill_capped_at_full() {
        let mut over = state(900.0, 300.0);
        over.goal_achieved = true;
        let html = render_bar(None, &over);
        assert!(html.contains("width: 100%;"));
        assert!(html.contains("cb-goal-achieved"));
    }

    #[test]
    fn test_panel_has_visibility_and_rounding_controls() {
        let html = panel(&ProgressBarField::new(), None);
        assert!(html.contains("name=\"fields[0][show_hide][]\" value=\"show_donated\" checked"));
        assert!(html.contains("name=\"fields[0][overrides][show_goal]\""));
        assert!(html.contains("name=\"fields[0][round_percentage]\""));
    }
}
