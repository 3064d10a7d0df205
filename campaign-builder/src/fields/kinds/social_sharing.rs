use super::{placeholder, SOCIAL_SHARING};
use crate::fields::{FieldDefinition, FieldGroup, FieldType, RenderContext};
use crate::panel::SettingsPanel;
use crate::settings::SettingsView;
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{safe_url, Element, Markup};
use urlencoding::encode;

const HEADING: &str = "heading";
const NETWORKS_KEY: &str = "networks";

const DEFAULT_NETWORKS: [&str; 4] = ["facebook", "twitter", "linkedin", "email"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShareNetwork {
    Facebook,
    Twitter,
    LinkedIn,
    WhatsApp,
    Email,
}

impl ShareNetwork {
    const ALL: [ShareNetwork; 5] = [
        ShareNetwork::Facebook,
        ShareNetwork::Twitter,
        ShareNetwork::LinkedIn,
        ShareNetwork::WhatsApp,
        ShareNetwork::Email,
    ];

    fn key(self) -> &'static str {
        match self {
            ShareNetwork::Facebook => "facebook",
            ShareNetwork::Twitter => "twitter",
            ShareNetwork::LinkedIn => "linkedin",
            ShareNetwork::WhatsApp => "whatsapp",
            ShareNetwork::Email => "email",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ShareNetwork::Facebook => "Facebook",
            ShareNetwork::Twitter => "X (Twitter)",
            ShareNetwork::LinkedIn => "LinkedIn",
            ShareNetwork::WhatsApp => "WhatsApp",
            ShareNetwork::Email => "Email",
        }
    }

    fn share_url(self, url: &str, title: &str) -> String {
        let u = encode(url);
        let t = encode(title);
        match self {
            ShareNetwork::Facebook => format!("https://www.facebook.com/sharer/sharer.php?u={u}"),
            ShareNetwork::Twitter => format!("https://twitter.com/intent/tweet?url={u}&text={t}"),
            ShareNetwork::LinkedIn => {
                format!("https://www.linkedin.com/sharing/share-offsite/?url={u}")
            }
            ShareNetwork::WhatsApp => format!("https://wa.me/?text={t}%20{u}"),
            ShareNetwork::Email => format!("mailto:?subject={t}&body={u}"),
        }
    }
}

/// Share buttons for the campaign page
pub struct SocialSharingField {
    definition: FieldDefinition,
}

impl SocialSharingField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(SOCIAL_SHARING, "Social Sharing")
                .icon("share")
                .order(85)
                .group(FieldGroup::Social)
                .min_width(10)
                .default_setting(HEADING, "Share this campaign")
                .default_setting(NETWORKS_KEY, DEFAULT_NETWORKS.to_vec()),
        }
    }

    fn networks(settings: &SettingsView<'_>) -> Vec<ShareNetwork> {
        let selected = settings
            .list(NETWORKS_KEY)
            .unwrap_or_else(|| DEFAULT_NETWORKS.iter().map(|n| n.to_string()).collect());
        ShareNetwork::ALL
            .into_iter()
            .filter(|network| selected.iter().any(|s| s == network.key()))
            .collect()
    }
}

impl Default for SocialSharingField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for SocialSharingField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        let page_url = ctx
            .campaign
            .settings
            .general
            .url
            .as_deref()
            .and_then(safe_url);
        let networks = Self::networks(settings);
        let container = Element::new("div").class("cb-social-sharing").child_opt(
            settings
                .string(HEADING)
                .map(|h| Element::new("h3").class("cb-sharing-heading").text(h)),
        );

        let Some(page_url) = page_url.filter(|_| !networks.is_empty()) else {
            return if ctx.is_preview() {
                container
                    .child(placeholder("Share buttons appear once the campaign has a public URL."))
                    .render()
            } else {
                Markup::new()
            };
        };

        let title = ctx.campaign.title.trim();
        container
            .child(
                Element::new("ul").class("cb-sharing-list").children(networks.into_iter().map(
                    |network| {
                        Element::new("li")
                            .class(format!("cb-share-{}", network.key()))
                            .child(
                                Element::new("a")
                                    .attr("href", network.share_url(&page_url, title))
                                    .attr("target", "_blank")
                                    .attr("rel", "noopener noreferrer")
                                    .text(network.label()),
                            )
                    },
                )),
            )
            .render()
    }

    fn settings_controls(
        &self,
        panel: &mut SettingsPanel,
        settings: &SettingsView<'_>,
        _config: &BuilderConfig,
    ) {
        let selected = Self::networks(settings)
            .into_iter()
            .map(|n| n.key().to_string())
            .collect();
        panel
            .text(HEADING, "Heading", settings.string(HEADING).unwrap_or_default())
            .checkbox_list(
                NETWORKS_KEY,
                "Networks",
                selected,
                ShareNetwork::ALL.map(|n| (n.key(), n.label())),
            );
    }
}
