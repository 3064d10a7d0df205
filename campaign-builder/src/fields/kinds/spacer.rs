use super::SPACER;
use crate::fields::format::plain_number;
use crate::fields::{FieldDefinition, FieldType, RenderContext, ValidationResult};
use crate::panel::SettingsPanel;
use crate::settings::{FieldSettings, SettingsView};
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{Element, Markup};

const HEIGHT: &str = "height";
const DEFAULT_HEIGHT: f64 = 20.0;
const MAX_HEIGHT: f64 = 400.0;

/// Vertical whitespace of a configurable height
pub struct SpacerField {
    definition: FieldDefinition,
}

impl SpacerField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(SPACER, "Spacer")
                .icon("arrows-v")
                .order(60)
                .min_width(5)
                .default_setting(HEIGHT, DEFAULT_HEIGHT),
        }
    }

    fn height(settings: &SettingsView<'_>) -> f64 {
        settings
            .number(HEIGHT)
            .unwrap_or(DEFAULT_HEIGHT)
            .round()
            .clamp(0.0, MAX_HEIGHT)
    }
}

impl Default for SpacerField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for SpacerField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        Element::new("div")
            .class("cb-spacer")
            .class_if(ctx.is_preview(), "cb-spacer-outline")
            .attr(
                "style",
                format!("height: {}px;", plain_number(Self::height(settings))),
            )
            .attr("aria-hidden", "true")
            .render()
    }

    fn settings_controls(
        &self,
        panel: &mut SettingsPanel,
        settings: &SettingsView<'_>,
        _config: &BuilderConfig,
    ) {
        panel.number(
            HEIGHT,
            "Height (px)",
            Some(Self::height(settings)),
            Some(0.0),
            Some(MAX_HEIGHT),
        );
    }

    fn prepare_settings(&self, settings: &mut FieldSettings) -> ValidationResult {
        match settings.get(HEIGHT) {
            None => ValidationResult::Valid,
            Some(_) => match settings.number(HEIGHT) {
                Some(height) => {
                    settings.insert(HEIGHT, height.round().clamp(0.0, MAX_HEIGHT));
                    ValidationResult::Valid
                }
                None => ValidationResult::invalid("Height must be a number"),
            },
        }
    }
}
