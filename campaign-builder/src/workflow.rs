//! Operator and visitor workflows
//!
//! Each workflow is a command struct built with `new()` and `with_*` setters
//! and run with `execute`, which takes the builder context and the campaign
//! document it operates on. Mutating workflows authenticate first and leave
//! the campaign untouched on any error.

use crate::auth::Capability;
use crate::campaign::{Campaign, FieldId};
use crate::context::BuilderContext;
use crate::error::{BuilderError, Result};
use crate::fields::wrap::clamp_width;
use crate::fields::SubmissionContext;
use crate::layout::SectionAddress;
use crate::panel::parse_submission;
use crate::render::RenderMode;
use crate::settings::{FieldSettings, SettingsView, WIDTH};
use campaign_builder_templating::Markup;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Add a block to a campaign
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddField {
    /// Type of the new block (required)
    pub type_id: Option<String>,
    /// Request token
    pub token: Option<String>,
    /// Client-supplied defaults, merged over the type's own
    #[serde(default)]
    pub defaults: FieldSettings,
    /// Section to append to; the first field list when absent
    pub at: Option<SectionAddress>,
}

/// Everything the builder needs to insert a freshly added block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFieldResponse {
    pub field_id: FieldId,
    pub type_id: String,
    pub settings: FieldSettings,
    pub address: SectionAddress,
    pub preview: Markup,
    pub settings_panel: Markup,
    /// The type's per-page limit, if it has one
    pub max_allowed: Option<u32>,
    /// No further instance of this type may be added
    pub add_disabled: bool,
}

impl AddField {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: Some(type_id.into()),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_defaults(mut self, defaults: FieldSettings) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn at(mut self, address: SectionAddress) -> Self {
        self.at = Some(address);
        self
    }

    pub fn execute(
        &self,
        ctx: &BuilderContext,
        campaign: &mut Campaign,
    ) -> Result<NewFieldResponse> {
        let actor = ctx.authenticate(self.token.as_deref(), Capability::EditCampaign)?;

        let requested = self
            .type_id
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(BuilderError::MissingFieldType)?;
        let field_type = ctx
            .registry()
            .get(requested)
            .ok_or_else(|| BuilderError::UnknownFieldType {
                type_id: requested.to_string(),
            })?;
        let definition = field_type.definition();
        let type_id = definition.type_id.as_str();

        let mut settings = definition.defaults.clone();
        settings.merge(&self.defaults);
        let settings = ctx.hooks().apply_field_defaults(type_id, settings);

        let placed = campaign.layout.count_type(type_id);
        if !definition.allows_another(placed) {
            let max = definition.max_instances.unwrap_or_default();
            if ctx.config().limits.enforce_on_create {
                return Err(BuilderError::FieldLimitReached {
                    type_id: type_id.to_string(),
                    max,
                });
            }
            tracing::warn!(
                type_id = %type_id,
                max,
                placed,
                "adding field beyond its per-page limit"
            );
        }

        let (field_id, address) =
            campaign.insert_field(type_id, settings.clone(), self.at.as_ref())?;
        tracing::info!(
            campaign_id = %campaign.id,
            field_id = %field_id,
            type_id = %type_id,
            actor = %actor.name,
            "field added"
        );

        let preview = ctx
            .renderer()
            .render_field(campaign, field_id, RenderMode::Preview)
            .unwrap_or_default();
        let view = SettingsView::new(Some(&settings), &definition.defaults);
        let settings_panel = field_type.render_settings_panel(field_id, &view, ctx.config());

        Ok(NewFieldResponse {
            field_id,
            type_id: type_id.to_string(),
            settings,
            address,
            preview,
            settings_panel,
            max_allowed: definition.max_instances,
            add_disabled: !definition.allows_another(placed + 1),
        })
    }
}

/// Apply a settings-panel form submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveSettings {
    pub token: Option<String>,
    /// Raw `(name, value)` form pairs
    #[serde(default)]
    pub pairs: Vec<(String, String)>,
}

impl SaveSettings {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            token: None,
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Overwrite the settings of every submitted field. Returns the ids saved,
    /// in submission order.
    pub fn execute(&self, ctx: &BuilderContext, campaign: &mut Campaign) -> Result<Vec<FieldId>> {
        let actor = ctx.authenticate(self.token.as_deref(), Capability::EditCampaign)?;
        let submitted = parse_submission(self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;

        let mut prepared = IndexMap::with_capacity(submitted.len());
        for (field_id, mut settings) in submitted {
            let instance = campaign
                .field(field_id)
                .ok_or(BuilderError::FieldNotFound { id: field_id })?;
            let field_type = ctx.registry().get(instance.type_id).ok_or_else(|| {
                BuilderError::UnknownFieldType {
                    type_id: instance.type_id.to_string(),
                }
            })?;
            let definition = field_type.definition();

            if settings.contains(WIDTH) {
                let width = clamp_width(settings.number(WIDTH), definition.min_width);
                settings.insert(WIDTH, width);
            }
            field_type.prepare_settings(&mut settings).into_result(field_id)?;
            prepared.insert(field_id, settings);
        }

        let saved: Vec<FieldId> = prepared.keys().copied().collect();
        for (field_id, settings) in prepared {
            campaign.fields.insert(field_id, settings);
        }
        tracing::info!(
            campaign_id = %campaign.id,
            actor = %actor.name,
            fields = saved.len(),
            "field settings saved"
        );
        Ok(saved)
    }
}

/// Remove a block from a campaign
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteField {
    pub field_id: FieldId,
    pub token: Option<String>,
}

impl DeleteField {
    pub fn new(field_id: FieldId) -> Self {
        Self {
            field_id,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn execute(
        &self,
        ctx: &BuilderContext,
        campaign: &mut Campaign,
    ) -> Result<Option<FieldSettings>> {
        let actor = ctx.authenticate(self.token.as_deref(), Capability::EditCampaign)?;
        if let Some(instance) = campaign.field(self.field_id) {
            if let Some(field_type) = ctx.registry().get(instance.type_id) {
                if !field_type.definition().deletable {
                    return Err(BuilderError::FieldNotDeletable {
                        type_id: instance.type_id.to_string(),
                    });
                }
            }
        }
        let removed = campaign.delete_field(self.field_id)?;
        tracing::info!(
            campaign_id = %campaign.id,
            field_id = %self.field_id,
            actor = %actor.name,
            "field deleted"
        );
        Ok(removed)
    }
}

/// Validate and format values a visitor submitted through interactive fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessSubmission {
    #[serde(default)]
    pub values: IndexMap<FieldId, Value>,
}

impl ProcessSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, field_id: FieldId, value: impl Into<Value>) -> Self {
        self.values.insert(field_id, value.into());
        self
    }

    /// Formatted values keyed by field id. Every invalid value is reported in
    /// one [`BuilderError::ValidationFailed`].
    pub fn execute(
        &self,
        ctx: &BuilderContext,
        campaign: &Campaign,
    ) -> Result<IndexMap<FieldId, Value>> {
        let mut formatted = IndexMap::with_capacity(self.values.len());
        let mut errors = Vec::new();

        for (&field_id, value) in &self.values {
            let instance = campaign
                .field(field_id)
                .ok_or(BuilderError::FieldNotFound { id: field_id })?;
            let Some(field_type) = ctx.registry().get(instance.type_id) else {
                tracing::warn!(
                    field_id = %field_id,
                    type_id = %instance.type_id,
                    "ignoring value for unavailable field type"
                );
                continue;
            };
            let submission = SubmissionContext {
                campaign,
                field_id,
                config: ctx.config(),
            };
            let result = field_type.validate(value, &submission);
            if result.is_valid() {
                formatted.insert(field_id, field_type.format(value.clone(), &submission));
            } else {
                errors.extend(result.errors().iter().map(|e| format!("{field_id}: {e}")));
            }
        }

        if errors.is_empty() {
            Ok(formatted)
        } else {
            Err(BuilderError::ValidationFailed {
                field: "submission".to_string(),
                message: errors.join("; "),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Actor, StaticTokenAuthenticator};
    use crate::fields::kinds::{CAMPAIGN_TITLE, DONATE_AMOUNT, SPACER, TEXT};
    use campaign_builder_config::BuilderConfig;
    use serde_json::json;

    const TOKEN: &str = "edit-token";

    fn context() -> BuilderContext {
        BuilderContext::new(BuilderConfig::default()).with_authenticator(
            StaticTokenAuthenticator::new()
                .with_token(TOKEN, Actor::editor("ada"))
                .with_token("view-token", Actor::viewer("bo")),
        )
    }

    #[test]
    fn test_add_field_response() {
        let ctx = context();
        let mut campaign = Campaign::new("Wells");
        let response = AddField::new(TEXT)
            .with_token(TOKEN)
            .with_defaults(FieldSettings::new().with("headline", "Our plan"))
            .execute(&ctx, &mut campaign)
            .unwrap();

        assert_eq!(response.field_id, FieldId(0));
        assert_eq!(response.type_id, TEXT);
        assert_eq!(response.address, SectionAddress::new(0, 0, 0));
        assert!(response.preview.contains("Our plan"));
        assert!(response.settings_panel.contains("fields[0][headline]"));
        assert_eq!(response.max_allowed, None);
        assert!(!response.add_disabled);
        assert!(campaign.layout.contains(FieldId(0)));
    }

    #[test]
    fn test_add_field_requires_token_and_permission() {
        let ctx = context();
        let mut campaign = Campaign::new("Wells");
        let before = campaign.clone();

        let err = AddField::new(TEXT).execute(&ctx, &mut campaign).unwrap_err();
        assert!(matches!(err, BuilderError::Unauthorized));
        let err = AddField::new(TEXT)
            .with_token("view-token")
            .execute(&ctx, &mut campaign)
            .unwrap_err();
        assert!(matches!(err, BuilderError::Forbidden { .. }));
        assert_eq!(campaign, before);
    }

    #[test]
    fn test_add_field_requires_known_type() {
        let ctx = context();
        let mut campaign = Campaign::new("Wells");
        let missing = AddField {
            token: Some(TOKEN.into()),
            ..AddField::default()
        };
        assert!(matches!(
            missing.execute(&ctx, &mut campaign),
            Err(BuilderError::MissingFieldType)
        ));
        assert!(matches!(
            AddField::new("carousel").with_token(TOKEN).execute(&ctx, &mut campaign),
            Err(BuilderError::UnknownFieldType { .. })
        ));
    }

    #[test]
    fn test_add_field_applies_default_transforms() {
        let mut ctx = context();
        ctx.hooks_mut().on_field_defaults(|type_id, settings| {
            if type_id == DONATE_AMOUNT {
                settings.with("required", true)
            } else {
                settings
            }
        });
        let mut campaign = Campaign::new("Wells");
        let response = AddField::new("DonateAmount")
            .with_token(TOKEN)
            .execute(&ctx, &mut campaign)
            .unwrap();
        assert_eq!(response.type_id, DONATE_AMOUNT);
        assert_eq!(response.settings.bool("required"), Some(true));
        assert_eq!(response.max_allowed, Some(1));
        assert!(response.add_disabled);
    }

    #[test]
    fn test_limit_policy() {
        let ctx = context();
        let mut campaign = Campaign::new("Wells");
        AddField::new(CAMPAIGN_TITLE)
            .with_token(TOKEN)
            .execute(&ctx, &mut campaign)
            .unwrap();
        let err = AddField::new(CAMPAIGN_TITLE)
            .with_token(TOKEN)
            .execute(&ctx, &mut campaign)
            .unwrap_err();
        assert!(matches!(err, BuilderError::FieldLimitReached { max: 1, .. }));

        let mut config = BuilderConfig::default();
        config.limits.enforce_on_create = false;
        let lenient = BuilderContext::new(config).with_authenticator(
            StaticTokenAuthenticator::new().with_token(TOKEN, Actor::editor("ada")),
        );
        let response = AddField::new(CAMPAIGN_TITLE)
            .with_token(TOKEN)
            .execute(&lenient, &mut campaign)
            .unwrap();
        assert!(response.add_disabled);
        assert_eq!(campaign.layout.count_type(CAMPAIGN_TITLE), 2);
    }

    #[test]
    fn test_save_settings_overwrites_and_clamps() {
        let ctx = context();
        let mut campaign = Campaign::new("Wells");
        AddField::new(TEXT).with_token(TOKEN).execute(&ctx, &mut campaign).unwrap();
        AddField::new(SPACER).with_token(TOKEN).execute(&ctx, &mut campaign).unwrap();

        let saved = SaveSettings::new([
            ("fields[0][headline]", "Updated"),
            ("fields[0][width]", "3"),
            ("fields[1][height]", "1000"),
            ("nonce", "ignored"),
        ])
        .with_token(TOKEN)
        .execute(&ctx, &mut campaign)
        .unwrap();

        assert_eq!(saved, vec![FieldId(0), FieldId(1)]);
        let text = campaign.field_settings(FieldId(0)).unwrap();
        assert_eq!(text.string("headline").as_deref(), Some("Updated"));
        assert_eq!(text.number(WIDTH), Some(10.0));
        assert!(!text.contains("content"));
        assert_eq!(
            campaign.field_settings(FieldId(1)).unwrap().number("height"),
            Some(400.0)
        );
    }

    #[test]
    fn test_save_settings_is_all_or_nothing() {
        let ctx = context();
        let mut campaign = Campaign::new("Wells");
        AddField::new(TEXT).with_token(TOKEN).execute(&ctx, &mut campaign).unwrap();
        let before = campaign.clone();

        let err = SaveSettings::new([
            ("fields[0][headline]", "Changed"),
            ("fields[5][headline]", "Nowhere"),
        ])
        .with_token(TOKEN)
        .execute(&ctx, &mut campaign)
        .unwrap_err();
        assert!(matches!(err, BuilderError::FieldNotFound { id: FieldId(5) }));
        assert_eq!(campaign, before);

        let err = SaveSettings::new([("fields[abc][headline]", "x")])
            .with_token(TOKEN)
            .execute(&ctx, &mut campaign)
            .unwrap_err();
        assert!(matches!(err, BuilderError::InvalidFieldId { .. }));
    }

    #[test]
    fn test_delete_field() {
        let ctx = context();
        let mut campaign = Campaign::new("Wells");
        AddField::new(TEXT).with_token(TOKEN).execute(&ctx, &mut campaign).unwrap();

        let removed = DeleteField::new(FieldId(0))
            .with_token(TOKEN)
            .execute(&ctx, &mut campaign)
            .unwrap();
        assert!(removed.is_some());
        assert!(campaign.layout.is_empty() || !campaign.layout.contains(FieldId(0)));
        assert!(matches!(
            DeleteField::new(FieldId(0)).with_token(TOKEN).execute(&ctx, &mut campaign),
            Err(BuilderError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_process_submission() {
        let ctx = context();
        let mut campaign = Campaign::new("Wells");
        AddField::new(DONATE_AMOUNT).with_token(TOKEN).execute(&ctx, &mut campaign).unwrap();
        AddField::new(TEXT).with_token(TOKEN).execute(&ctx, &mut campaign).unwrap();

        let values = ProcessSubmission::new()
            .with_value(FieldId(0), "12.499")
            .with_value(FieldId(1), "free text")
            .execute(&ctx, &campaign)
            .unwrap();
        assert_eq!(values[&FieldId(0)], json!(12.5));
        assert_eq!(values[&FieldId(1)], json!("free text"));

        let err = ProcessSubmission::new()
            .with_value(FieldId(0), "-3")
            .execute(&ctx, &campaign)
            .unwrap_err();
        assert!(err.to_string().contains("0: Donation amount must be greater than zero"));
    }
}
