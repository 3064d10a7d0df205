use super::CAMPAIGN_TITLE;
use crate::fields::{FieldDefinition, FieldType, RenderContext};
use crate::panel::SettingsPanel;
use crate::settings::SettingsView;
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{Element, Markup};

const HEADING_LEVEL: &str = "heading_level";
const HEADING_LEVELS: [&str; 3] = ["h1", "h2", "h3"];

/// The campaign's title as a heading
pub struct CampaignTitleField {
    definition: FieldDefinition,
}

impl CampaignTitleField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(CAMPAIGN_TITLE, "Campaign Title")
                .icon("heading")
                .order(10)
                .max_instances(1)
                .not_duplicable()
                .min_width(25)
                .default_setting(HEADING_LEVEL, "h1"),
        }
    }

    fn heading(&self, settings: &SettingsView<'_>) -> Element {
        let level = settings
            .string(HEADING_LEVEL)
            .and_then(|level| HEADING_LEVELS.into_iter().find(|l| *l == level.trim()))
            .unwrap_or("h1");
        Element::new(level).class("cb-campaign-title")
    }
}

impl Default for CampaignTitleField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for CampaignTitleField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        let title = ctx.campaign.title.trim();
        let heading = self.heading(settings);
        if title.is_empty() {
            heading.class("cb-placeholder").text("Campaign Title").render()
        } else {
            heading.text(title).render()
        }
    }

    fn render_display(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        self.heading(settings)
            .text(ctx.campaign.title.trim())
            .render()
    }

    fn settings_controls(
        &self,
        panel: &mut SettingsPanel,
        settings: &SettingsView<'_>,
        _config: &BuilderConfig,
    ) {
        let current = settings.string_or(HEADING_LEVEL, "h1");
        panel.select(
            HEADING_LEVEL,
            "Heading level",
            &current,
            HEADING_LEVELS.map(|l| (l, l.to_uppercase())),
        );
    }
}
