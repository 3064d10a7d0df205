//! Field types
//!
//! Every kind of page block implements [`FieldType`]: a static
//! [`FieldDefinition`] plus preview, display and settings-panel rendering and,
//! for interactive blocks, validation and formatting of visitor-submitted
//! values. Layout chrome (width, alignment, custom class) is not the field's
//! concern; the composition engine applies it with [`wrap::wrap_field`] after
//! the field returns its content.

pub mod format;
pub mod kinds;
pub mod visibility;
pub mod wrap;

use crate::campaign::{Campaign, FieldId};
use crate::error::{BuilderError, Result};
use crate::panel::SettingsPanel;
use crate::render::RenderMode;
use crate::settings::{FieldSettings, SettingsView};
use crate::state::CampaignState;
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::Markup;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use visibility::SubElement;

/// Palette grouping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldGroup {
    #[default]
    Standard,
    Donation,
    Social,
}

impl FieldGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldGroup::Standard => "standard",
            FieldGroup::Donation => "donation",
            FieldGroup::Social => "social",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(FieldGroup::Standard),
            "donation" => Some(FieldGroup::Donation),
            "social" => Some(FieldGroup::Social),
            _ => None,
        }
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub const ALL: [Alignment; 4] = [
        Alignment::Left,
        Alignment::Center,
        Alignment::Right,
        Alignment::Justify,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(value.trim()))
    }

    pub fn css_class(self) -> String {
        format!("cb-align-{}", self.as_str())
    }
}

/// Static metadata of a field type, built once when the type is constructed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub type_id: String,
    pub display_name: String,
    pub icon: String,
    pub default_order: u32,
    pub group: FieldGroup,
    pub editable: bool,
    pub deletable: bool,
    pub duplicable: bool,
    /// At most this many instances per page
    pub max_instances: Option<u32>,
    pub default_alignment: Alignment,
    /// Preview content is cut to this many characters
    pub preview_char_limit: Option<usize>,
    /// Smallest width, in percent, the block may be given
    pub min_width: u8,
    /// Settings a new instance starts with
    pub defaults: FieldSettings,
}

impl FieldDefinition {
    /// A standard, unlimited, full-width block with no default settings
    pub fn new(type_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            display_name: display_name.into(),
            icon: "block".to_string(),
            default_order: 100,
            group: FieldGroup::Standard,
            editable: true,
            deletable: true,
            duplicable: true,
            max_instances: None,
            default_alignment: Alignment::Left,
            preview_char_limit: None,
            min_width: 100,
            defaults: FieldSettings::new(),
        }
    }

    /// Palette icon name
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Position in the palette; lower sorts first
    pub fn order(mut self, order: u32) -> Self {
        self.default_order = order;
        self
    }

    /// Palette group the block is listed under
    pub fn group(mut self, group: FieldGroup) -> Self {
        self.group = group;
        self
    }

    /// Allow at most `max` instances per page
    pub fn max_instances(mut self, max: u32) -> Self {
        self.max_instances = Some(max);
        self
    }

    /// Alignment used until the operator picks one
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.default_alignment = alignment;
        self
    }

    /// Cut preview text to `limit` characters
    pub fn preview_char_limit(mut self, limit: usize) -> Self {
        self.preview_char_limit = Some(limit);
        self
    }

    /// Minimum width in percent, kept within 1 to 100
    pub fn min_width(mut self, percent: u8) -> Self {
        self.min_width = percent.clamp(1, 100);
        self
    }

    /// Flag the block as having no editable settings (`data-editable`)
    pub fn not_editable(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Refuse deletion through [`crate::DeleteField`]
    pub fn not_deletable(mut self) -> Self {
        self.deletable = false;
        self
    }

    /// Flag the block as not duplicable (`data-duplicable`)
    pub fn not_duplicable(mut self) -> Self {
        self.duplicable = false;
        self
    }

    /// Add `key` to the settings a new instance starts with
    pub fn default_setting(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.defaults.insert(key, value);
        self
    }

    /// Seed `show_hide` with the sub-elements visible by default
    pub fn sub_elements(self, elements: &[SubElement]) -> Self {
        let selection = visibility::default_selection(elements);
        self.default_setting(crate::settings::SHOW_HIDE, selection)
    }

    /// Whether `count` placed instances leave room for one more
    pub fn allows_another(&self, count: usize) -> bool {
        self.max_instances
            .map_or(true, |max| count < max as usize)
    }
}

/// Everything a field needs to render one instance
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub campaign: &'a Campaign,
    pub field_id: FieldId,
    pub state: &'a CampaignState,
    pub config: &'a BuilderConfig,
    pub mode: RenderMode,
}

impl<'a> RenderContext<'a> {
    pub fn is_preview(&self) -> bool {
        self.mode == RenderMode::Preview
    }

    pub fn money(&self, amount: f64) -> String {
        format::format_money(amount, &self.config.currency)
    }

    /// The instance's rounding toggle, defaulting to the configured value
    pub fn round_percentages(&self, settings: &SettingsView<'_>) -> bool {
        settings
            .bool(crate::settings::ROUND_PERCENTAGE)
            .unwrap_or(self.config.display.round_percentages)
    }
}

/// Context for validating and formatting a visitor-submitted value
#[derive(Debug, Clone, Copy)]
pub struct SubmissionContext<'a> {
    pub campaign: &'a Campaign,
    pub field_id: FieldId,
    pub config: &'a BuilderConfig,
}

/// Outcome of validating submitted data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(Vec<String>),
}

impl ValidationResult {
    pub fn invalid(message: impl Into<String>) -> Self {
        ValidationResult::Invalid(vec![message.into()])
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> &[String] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(errors) => errors,
        }
    }

    /// Combine two results, keeping every error
    pub fn and(self, other: ValidationResult) -> ValidationResult {
        match (self, other) {
            (ValidationResult::Valid, other) => other,
            (invalid, ValidationResult::Valid) => invalid,
            (ValidationResult::Invalid(mut a), ValidationResult::Invalid(b)) => {
                a.extend(b);
                ValidationResult::Invalid(a)
            }
        }
    }

    pub fn into_result(self, field: FieldId) -> Result<()> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(errors) => Err(BuilderError::ValidationFailed {
                field: field.to_string(),
                message: errors.join("; "),
            }),
        }
    }
}

/// The capability set every field type implements.
///
/// Rendering must not fail: `settings` may wrap no stored settings at all and
/// `ctx.campaign` may be unsaved, in which case defaults and placeholder
/// content stand in.
pub trait FieldType: Send + Sync {
    fn definition(&self) -> &FieldDefinition;

    fn type_id(&self) -> &str {
        &self.definition().type_id
    }

    /// Builder-side representation
    fn render_preview(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup;

    /// Visitor-facing representation
    fn render_display(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        self.render_preview(settings, ctx)
    }

    fn render(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        match ctx.mode {
            RenderMode::Preview => self.render_preview(settings, ctx),
            RenderMode::Display => self.render_display(settings, ctx),
        }
    }

    /// Add the type's own controls to its settings panel
    fn settings_controls(
        &self,
        _panel: &mut SettingsPanel,
        _settings: &SettingsView<'_>,
        _config: &BuilderConfig,
    ) {
    }

    /// The settings form for one instance, pre-filled from its settings
    fn render_settings_panel(
        &self,
        field_id: FieldId,
        settings: &SettingsView<'_>,
        config: &BuilderConfig,
    ) -> Markup {
        let mut panel = SettingsPanel::new(field_id, self.definition());
        self.settings_controls(&mut panel, settings, config);
        panel.layout_controls(self.definition(), settings);
        panel.render()
    }

    /// Check and normalize operator-saved settings
    fn prepare_settings(&self, _settings: &mut FieldSettings) -> ValidationResult {
        ValidationResult::Valid
    }

    /// Check a visitor-submitted value
    fn validate(&self, _value: &Value, _ctx: &SubmissionContext<'_>) -> ValidationResult {
        ValidationResult::Valid
    }

    /// Sanitize a visitor-submitted value for storage
    fn format(&self, value: Value, _ctx: &SubmissionContext<'_>) -> Value {
        value
    }
}

impl fmt::Debug for dyn FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldType")
            .field("type_id", &self.type_id())
            .finish()
    }
}
