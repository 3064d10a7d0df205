use super::ORGANIZER;
use crate::fields::visibility::{is_visible, SubElement};
use crate::fields::{FieldDefinition, FieldType, RenderContext};
use crate::panel::SettingsPanel;
use crate::settings::SettingsView;
use crate::state::Creator;
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{safe_url, Element, Markup};

const HEADING: &str = "heading";
const FALLBACK_NAME: &str = "Campaign Organizer";

const SHOW_AVATAR: SubElement = SubElement::new("show_avatar", "Photo", true);
const SHOW_BIO: SubElement = SubElement::new("show_bio", "Biography", false);

const SUB_ELEMENTS: [SubElement; 2] = [SHOW_AVATAR, SHOW_BIO];

/// The person or organization running the campaign
pub struct OrganizerField {
    definition: FieldDefinition,
}

impl OrganizerField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(ORGANIZER, "Organizer")
                .icon("user")
                .order(70)
                .min_width(20)
                .default_setting(HEADING, "Organizer")
                .sub_elements(&SUB_ELEMENTS),
        }
    }

    /// Creator from live state, else a name-only creator from the campaign's
    /// general settings
    fn creator(ctx: &RenderContext<'_>) -> Creator {
        if let Some(creator) = ctx.state.creator.clone() {
            return creator;
        }
        let name = ctx
            .campaign
            .settings
            .general
            .extra
            .get("creator_name")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_NAME);
        Creator {
            name: name.to_string(),
            ..Creator::default()
        }
    }
}

impl Default for OrganizerField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for OrganizerField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        let creator = Self::creator(ctx);
        let avatar = creator.avatar_url.as_deref().and_then(safe_url);
        let bio = creator
            .bio
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty());

        let avatar = avatar
            .filter(|_| is_visible(settings, &SHOW_AVATAR, true))
            .map(|src| {
                Element::new("img")
                    .class("cb-organizer-avatar")
                    .attr("src", src)
                    .attr("alt", &creator.name)
            });
        let bio = bio
            .filter(|_| is_visible(settings, &SHOW_BIO, true))
            .map(|bio| Element::new("p").class("cb-organizer-bio").text(bio));
        let name = Element::new("span").class("cb-organizer-name").text(&creator.name);
        let name = match creator.url.as_deref().and_then(safe_url) {
            Some(href) => Element::new("a").attr("href", href).child(name),
            None => name,
        };

        Element::new("div")
            .class("cb-organizer")
            .child_opt(
                settings
                    .string(HEADING)
                    .map(|h| Element::new("h3").class("cb-organizer-heading").text(h)),
            )
            .child_opt(avatar)
            .child(name)
            .child_opt(bio)
            .render()
    }

    fn settings_controls(
        &self,
        panel: &mut SettingsPanel,
        settings: &SettingsView<'_>,
        _config: &BuilderConfig,
    ) {
        panel
            .text(HEADING, "Heading", settings.string(HEADING).unwrap_or_default())
            .sub_elements(&SUB_ELEMENTS, settings);
    }
}
