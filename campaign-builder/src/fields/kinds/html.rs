use super::{placeholder, HTML};
use crate::fields::{FieldDefinition, FieldType, RenderContext, ValidationResult};
use crate::panel::SettingsPanel;
use crate::settings::{FieldSettings, SettingsView};
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{sanitize_rich_text, validate_rich_text, Element, Markup};

const HTML_KEY: &str = "html";

/// Operator-authored markup, passed through the allowed-tag sanitizer
pub struct HtmlField {
    definition: FieldDefinition,
}

impl HtmlField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(HTML, "HTML")
                .icon("code")
                .order(45)
                .min_width(10),
        }
    }

    fn content(&self, settings: &SettingsView<'_>) -> Markup {
        settings
            .string(HTML_KEY)
            .map(|html| sanitize_rich_text(&html))
            .unwrap_or_default()
    }
}

impl Default for HtmlField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for HtmlField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, settings: &SettingsView<'_>, _ctx: &RenderContext<'_>) -> Markup {
        let content = self.content(settings);
        let container = Element::new("div").class("cb-html");
        if content.is_empty() {
            container.child(placeholder("Custom HTML")).render()
        } else {
            container.markup(content).render()
        }
    }

    fn render_display(&self, settings: &SettingsView<'_>, _ctx: &RenderContext<'_>) -> Markup {
        Element::new("div")
            .class("cb-html")
            .markup(self.content(settings))
            .render()
    }

    fn settings_controls(
        &self,
        panel: &mut SettingsPanel,
        settings: &SettingsView<'_>,
        _config: &BuilderConfig,
    ) {
        panel
            .textarea(HTML_KEY, "HTML", settings.string(HTML_KEY).unwrap_or_default())
            .help("Scripts, styles, frames and event handlers are removed.");
    }

    fn prepare_settings(&self, settings: &mut FieldSettings) -> ValidationResult {
        settings
            .string(HTML_KEY)
            .and_then(|html| validate_rich_text(&html).err())
            .map_or(ValidationResult::Valid, |e| {
                ValidationResult::invalid(format!("HTML: {e}"))
            })
    }
}
