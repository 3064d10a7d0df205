use super::{placeholder, TEXT};
use crate::fields::{FieldDefinition, FieldType, RenderContext, ValidationResult};
use crate::panel::SettingsPanel;
use crate::settings::{FieldSettings, SettingsView};
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{sanitize_rich_text, validate_rich_text, Element, Markup};

const HEADLINE: &str = "headline";
const CONTENT: &str = "content";

/// Optional headline plus a rich-text body
pub struct TextField {
    definition: FieldDefinition,
}

impl TextField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(TEXT, "Text")
                .icon("text")
                .order(40)
                .min_width(10),
        }
    }

    fn body(&self, settings: &SettingsView<'_>) -> Option<Element> {
        let headline = settings.string(HEADLINE);
        let content = settings
            .string(CONTENT)
            .map(|content| sanitize_rich_text(&content))
            .filter(|content| !content.is_empty());
        if headline.is_none() && content.is_none() {
            return None;
        }
        Some(
            Element::new("div")
                .class("cb-text")
                .child_opt(headline.map(|h| Element::new("h3").class("cb-text-headline").text(h)))
                .child_opt(
                    content.map(|c| Element::new("div").class("cb-text-content").markup(c)),
                ),
        )
    }
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for TextField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, settings: &SettingsView<'_>, _ctx: &RenderContext<'_>) -> Markup {
        self.body(settings)
            .unwrap_or_else(|| {
                Element::new("div")
                    .class("cb-text")
                    .child(placeholder("Add a headline or some text."))
            })
            .render()
    }

    fn render_display(&self, settings: &SettingsView<'_>, _ctx: &RenderContext<'_>) -> Markup {
        self.body(settings)
            .unwrap_or_else(|| Element::new("div").class("cb-text"))
            .render()
    }

    fn settings_controls(
        &self,
        panel: &mut SettingsPanel,
        settings: &SettingsView<'_>,
        _config: &BuilderConfig,
    ) {
        panel
            .text(HEADLINE, "Headline", settings.string(HEADLINE).unwrap_or_default())
            .textarea(CONTENT, "Content", settings.string(CONTENT).unwrap_or_default());
    }

    fn prepare_settings(&self, settings: &mut FieldSettings) -> ValidationResult {
        match settings.string(CONTENT) {
            Some(content) => match validate_rich_text(&content) {
                Ok(()) => ValidationResult::Valid,
                Err(e) => ValidationResult::invalid(format!("Content: {e}")),
            },
            None => ValidationResult::Valid,
        }
    }
}
