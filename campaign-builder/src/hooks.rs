//! Extension points
//!
//! Other components adjust the builder through ordered lists of transform
//! functions. Each transform receives the value computed so far and returns
//! the value to use, so the result of a chain with no transforms is the
//! engine's own value.

use crate::campaign::Campaign;
use crate::fields::RenderContext;
use crate::registry::PaletteEntry;
use crate::settings::{FieldSettings, SettingsView};
use campaign_builder_templating::Markup;
use std::collections::HashMap;
use std::sync::Arc;

/// Adjust the "add block" palette for a campaign
pub type PaletteTransform =
    Arc<dyn Fn(Vec<PaletteEntry>, &Campaign) -> Vec<PaletteEntry> + Send + Sync>;

/// Adjust the default settings of a newly created field of the given type
pub type DefaultsTransform = Arc<dyn Fn(&str, FieldSettings) -> FieldSettings + Send + Sync>;

/// Replace the visitor-facing markup of a field type. Returning `None` keeps
/// the markup computed so far.
pub type DisplayOverride =
    Arc<dyn Fn(&Markup, &SettingsView<'_>, &RenderContext<'_>) -> Option<Markup> + Send + Sync>;

#[derive(Default, Clone)]
pub struct ExtensionPoints {
    palette: Vec<PaletteTransform>,
    defaults: Vec<DefaultsTransform>,
    display: HashMap<String, Vec<DisplayOverride>>,
}

impl ExtensionPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_palette<F>(&mut self, transform: F) -> &mut Self
    where
        F: Fn(Vec<PaletteEntry>, &Campaign) -> Vec<PaletteEntry> + Send + Sync + 'static,
    {
        self.palette.push(Arc::new(transform));
        self
    }

    pub fn on_field_defaults<F>(&mut self, transform: F) -> &mut Self
    where
        F: Fn(&str, FieldSettings) -> FieldSettings + Send + Sync + 'static,
    {
        self.defaults.push(Arc::new(transform));
        self
    }

    pub fn on_display<F>(&mut self, type_id: impl Into<String>, transform: F) -> &mut Self
    where
        F: Fn(&Markup, &SettingsView<'_>, &RenderContext<'_>) -> Option<Markup>
            + Send
            + Sync
            + 'static,
    {
        self.display
            .entry(type_id.into())
            .or_default()
            .push(Arc::new(transform));
        self
    }

    pub fn has_display_overrides(&self, type_id: &str) -> bool {
        self.display.get(type_id).is_some_and(|list| !list.is_empty())
    }

    pub fn apply_palette(
        &self,
        entries: Vec<PaletteEntry>,
        campaign: &Campaign,
    ) -> Vec<PaletteEntry> {
        self.palette
            .iter()
            .fold(entries, |entries, transform| transform(entries, campaign))
    }

    pub fn apply_field_defaults(&self, type_id: &str, settings: FieldSettings) -> FieldSettings {
        self.defaults
            .iter()
            .fold(settings, |settings, transform| transform(type_id, settings))
    }

    pub fn apply_display(
        &self,
        type_id: &str,
        markup: Markup,
        settings: &SettingsView<'_>,
        ctx: &RenderContext<'_>,
    ) -> Markup {
        let Some(overrides) = self.display.get(type_id) else {
            return markup;
        };
        overrides.iter().fold(markup, |markup, transform| {
            match transform(&markup, settings, ctx) {
                Some(replaced) => {
                    tracing::debug!(
                        type_id = %type_id,
                        field_id = %ctx.field_id,
                        "display markup overridden"
                    );
                    replaced
                }
                None => markup,
            }
        })
    }
}

impl std::fmt::Debug for ExtensionPoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionPoints")
            .field("palette", &self.palette.len())
            .field("defaults", &self.defaults.len())
            .field("display", &self.display.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::FieldId;
    use crate::fields::FieldGroup;
    use crate::render::RenderMode;
    use crate::state::CampaignState;
    use campaign_builder_config::BuilderConfig;

    fn entry(type_id: &str) -> PaletteEntry {
        PaletteEntry {
            type_id: type_id.to_string(),
            display_name: type_id.to_string(),
            icon: String::new(),
            group: FieldGroup::Standard,
            default_order: 0,
            max_instances: None,
            count: 0,
            add_disabled: false,
        }
    }

    #[test]
    fn test_without_transforms_values_pass_through() {
        let hooks = ExtensionPoints::new();
        let campaign = Campaign::default();
        assert_eq!(
            hooks.apply_palette(vec![entry("text")], &campaign),
            vec![entry("text")]
        );
        let settings = FieldSettings::new().with("headline", "Hi");
        assert_eq!(hooks.apply_field_defaults("text", settings.clone()), settings);
    }

    #[test]
    fn test_transforms_run_in_registration_order() {
        let mut hooks = ExtensionPoints::new();
        hooks
            .on_field_defaults(|_, settings| settings.with("required", true))
            .on_field_defaults(|type_id, settings| {
                let required = settings.bool("required").unwrap_or(false);
                settings.with("note", format!("{type_id}:{required}"))
            });
        let settings = hooks.apply_field_defaults("donate-amount", FieldSettings::new());
        assert_eq!(settings.string("note").as_deref(), Some("donate-amount:true"));
    }

    #[test]
    fn test_palette_contribution() {
        let mut hooks = ExtensionPoints::new();
        hooks.on_palette(|mut entries, _| {
            entries.push(entry("countdown"));
            entries
        });
        let palette = hooks.apply_palette(vec![entry("text")], &Campaign::default());
        assert_eq!(palette.len(), 2);
        assert_eq!(palette[1].type_id, "countdown");
    }

    #[test]
    fn test_display_override_falls_back_on_none() {
        let mut hooks = ExtensionPoints::new();
        hooks
            .on_display("text", |_, _, _| None)
            .on_display("text", |markup, _, _| {
                let mut wrapped = Markup::trusted("<section>");
                wrapped.push(markup);
                wrapped.push(&Markup::trusted("</section>"));
                Some(wrapped)
            });

        let campaign = Campaign::default();
        let state = CampaignState::default();
        let config = BuilderConfig::default();
        let ctx = RenderContext {
            campaign: &campaign,
            field_id: FieldId(3),
            state: &state,
            config: &config,
            mode: RenderMode::Display,
        };
        let defaults = FieldSettings::new();
        let view = SettingsView::new(None, &defaults);

        let out = hooks.apply_display("text", Markup::text("body"), &view, &ctx);
        assert_eq!(out.as_str(), "<section>body</section>");
        let untouched = hooks.apply_display("photo", Markup::text("img"), &view, &ctx);
        assert_eq!(untouched.as_str(), "img");
        assert!(hooks.has_display_overrides("text"));
        assert!(!hooks.has_display_overrides("photo"));
    }
}
