use super::{placeholder, SOCIAL_LINKS};
use crate::fields::{FieldDefinition, FieldGroup, FieldType, RenderContext, ValidationResult};
use crate::panel::SettingsPanel;
use crate::settings::{FieldSettings, SettingsView};
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{safe_url, Element, Markup};

const HEADING: &str = "heading";

/// Setting key and label of every supported profile link
const NETWORKS: [(&str, &str); 7] = [
    ("facebook", "Facebook"),
    ("twitter", "X (Twitter)"),
    ("instagram", "Instagram"),
    ("linkedin", "LinkedIn"),
    ("youtube", "YouTube"),
    ("tiktok", "TikTok"),
    ("website", "Website"),
];

/// Links to the organizer's social profiles
pub struct SocialLinksField {
    definition: FieldDefinition,
}

impl SocialLinksField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(SOCIAL_LINKS, "Social Links")
                .icon("share-alt")
                .order(80)
                .group(FieldGroup::Social)
                .min_width(10)
                .default_setting(HEADING, "Follow us"),
        }
    }

    fn links(settings: &SettingsView<'_>) -> Vec<Element> {
        NETWORKS
            .iter()
            .filter_map(|(key, label)| {
                let href = settings.string(key).and_then(|url| safe_url(&url))?;
                Some(
                    Element::new("li").class(format!("cb-social-{key}")).child(
                        Element::new("a")
                            .attr("href", href)
                            .attr("target", "_blank")
                            .attr("rel", "noopener noreferrer")
                            .text(*label),
                    ),
                )
            })
            .collect()
    }
}

impl Default for SocialLinksField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for SocialLinksField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        let links = Self::links(settings);
        let container = Element::new("div").class("cb-social-links").child_opt(
            settings
                .string(HEADING)
                .map(|h| Element::new("h3").class("cb-social-heading").text(h)),
        );
        if links.is_empty() {
            return if ctx.is_preview() {
                container.child(placeholder("Add links to your profiles.")).render()
            } else {
                Markup::new()
            };
        }
        container
            .child(Element::new("ul").class("cb-social-list").children(links))
            .render()
    }

    fn settings_controls(
        &self,
        panel: &mut SettingsPanel,
        settings: &SettingsView<'_>,
        _config: &BuilderConfig,
    ) {
        panel.text(HEADING, "Heading", settings.string(HEADING).unwrap_or_default());
        for (key, label) in NETWORKS {
            panel.text_with_placeholder(
                key,
                label,
                settings.string(key).unwrap_or_default(),
                "https://",
            );
        }
    }

    fn prepare_settings(&self, settings: &mut FieldSettings) -> ValidationResult {
        NETWORKS
            .iter()
            .filter_map(|(key, label)| {
                let url = settings.string(key)?;
                (!url.trim().is_empty() && safe_url(&url).is_none())
                    .then(|| ValidationResult::invalid(format!("{label}: unsupported URL")))
            })
            .fold(ValidationResult::Valid, ValidationResult::and)
    }
}
