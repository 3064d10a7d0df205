use super::DONATE_BUTTON;
use crate::fields::{FieldDefinition, FieldGroup, FieldType, RenderContext};
use crate::panel::SettingsPanel;
use crate::settings::SettingsView;
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{Element, Markup};

const LABEL: &str = "label";
const CLOSED_LABEL: &str = "closed_label";

/// Submit button for the donation form
pub struct DonateButtonField {
    definition: FieldDefinition,
}

impl DonateButtonField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(DONATE_BUTTON, "Donate Button")
                .icon("heart")
                .order(34)
                .group(FieldGroup::Donation)
                .alignment(crate::fields::Alignment::Center)
                .min_width(10)
                .default_setting(LABEL, "Donate Now")
                .default_setting(CLOSED_LABEL, "Donations closed"),
        }
    }
}

impl Default for DonateButtonField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for DonateButtonField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        let open = ctx.state.accepting_donations;
        let label = if open {
            settings.string_or(LABEL, "Donate Now")
        } else {
            settings.string_or(CLOSED_LABEL, "Donations closed")
        };
        Element::new("button")
            .class("cb-donate-button")
            .class_if(!open, "cb-donations-closed")
            .attr("type", if open { "submit" } else { "button" })
            .flag_if(!open || ctx.is_preview(), "disabled")
            .text(label)
            .render()
    }

    fn settings_controls(
        &self,
        panel: &mut SettingsPanel,
        settings: &SettingsView<'_>,
        _config: &BuilderConfig,
    ) {
        panel
            .text(LABEL, "Button label", settings.string(LABEL).unwrap_or_default())
            .text(
                CLOSED_LABEL,
                "Label when donations are closed",
                settings.string(CLOSED_LABEL).unwrap_or_default(),
            );
    }
}
