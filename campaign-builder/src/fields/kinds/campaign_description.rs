use super::{placeholder, CAMPAIGN_DESCRIPTION};
use crate::fields::format::truncate_chars;
use crate::fields::{FieldDefinition, FieldType, RenderContext};
use crate::settings::SettingsView;
use campaign_builder_templating::{plain_text, sanitize_rich_text, Element, Markup};

const PREVIEW_CHARACTERS: usize = 300;

/// The campaign's long description.
///
/// The builder shows a plain-text excerpt cut to the preview limit; visitors
/// get the full sanitized rich text.
pub struct CampaignDescriptionField {
    definition: FieldDefinition,
}

impl CampaignDescriptionField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(CAMPAIGN_DESCRIPTION, "Campaign Description")
                .icon("align-left")
                .order(20)
                .max_instances(1)
                .not_duplicable()
                .preview_char_limit(PREVIEW_CHARACTERS)
                .min_width(25),
        }
    }
}

impl Default for CampaignDescriptionField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for CampaignDescriptionField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, _settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        let text = plain_text(&ctx.campaign.settings.general.description);
        let container = Element::new("div").class("cb-campaign-description");
        if text.is_empty() {
            return container
                .child(placeholder("Your campaign description will appear here."))
                .render();
        }
        let limit = self
            .definition
            .preview_char_limit
            .unwrap_or(PREVIEW_CHARACTERS);
        container
            .child(Element::new("p").text(truncate_chars(&text, limit)))
            .render()
    }

    fn render_display(&self, _settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        Element::new("div")
            .class("cb-campaign-description")
            .markup(sanitize_rich_text(&ctx.campaign.settings.general.description))
            .render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::Campaign;
    use crate::fields::kinds::test_support::render;
    use crate::render::RenderMode;
    use crate::state::CampaignState;

    fn campaign(description: &str) -> Campaign {
        let mut campaign = Campaign::new("x");
        campaign.settings.general.description = description.to_string();
        campaign
    }

    #[test]
    fn test_preview_truncates_plain_text() {
        let long = format!("<p>{}</p>", "word ".repeat(100));
        let html = render(
            &CampaignDescriptionField::new(),
            None,
            &campaign(&long),
            &CampaignState::default(),
            RenderMode::Preview,
        );
        assert!(html.contains('…'));
        assert!(html.len() < 400);
    }

    #[test]
    fn test_display_sanitizes() {
        let html = render(
            &CampaignDescriptionField::new(),
            None,
            &campaign("<p onclick=\"x()\">Help <em>us</em></p><script>bad()</script>"),
            &CampaignState::default(),
            RenderMode::Display,
        );
        assert_eq!(
            html,
            "<div class=\"cb-campaign-description\"><p>Help <em>us</em></p></div>"
        );
    }

    #[test]
    fn test_preview_placeholder_when_empty() {
        let html = render(
            &CampaignDescriptionField::new(),
            None,
            &campaign(""),
            &CampaignState::default(),
            RenderMode::Preview,
        );
        assert!(html.contains("cb-placeholder"));
    }
}
