use super::DONATE_AMOUNT;
use crate::campaign::Campaign;
use crate::fields::format::{parse_amount, plain_number};
use crate::fields::{
    FieldDefinition, FieldGroup, FieldType, RenderContext, SubmissionContext, ValidationResult,
};
use crate::panel::SettingsPanel;
use crate::settings::SettingsView;
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{Element, Markup};
use serde_json::Value;

const HEADLINE: &str = "headline";
const CUSTOM_LABEL: &str = "custom_label";

/// Form input carrying the chosen suggested amount
pub const AMOUNT_INPUT: &str = "cb_donation_amount";
/// Form input carrying a visitor-typed amount
pub const CUSTOM_AMOUNT_INPUT: &str = "cb_donation_custom_amount";

/// One selectable amount
#[derive(Debug, Clone, PartialEq)]
struct AmountOption {
    amount: f64,
    description: Option<String>,
}

/// The campaign's suggested amounts, or the configured defaults when the
/// campaign has none
fn amount_options(campaign: &Campaign, config: &BuilderConfig) -> Vec<AmountOption> {
    let own: Vec<AmountOption> = campaign
        .settings
        .donation_options
        .suggested_donations
        .iter()
        .filter(|s| s.amount.is_finite() && s.amount > 0.0)
        .map(|s| AmountOption {
            amount: s.amount,
            description: s.description.clone().filter(|d| !d.trim().is_empty()),
        })
        .collect();
    if !own.is_empty() {
        return own;
    }
    config
        .donations
        .suggested_amounts
        .iter()
        .map(|&amount| AmountOption {
            amount,
            description: None,
        })
        .collect()
}

fn allows_custom(campaign: &Campaign, config: &BuilderConfig) -> bool {
    campaign
        .settings
        .donation_options
        .allow_custom_donations
        .unwrap_or(config.donations.allow_custom_amount)
}

fn round_to(amount: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(i32::from(decimals));
    (amount * factor).round() / factor
}

/// Suggested donation amounts plus an optional custom amount input
pub struct DonateAmountField {
    definition: FieldDefinition,
}

impl DonateAmountField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(DONATE_AMOUNT, "Donation Amount")
                .icon("usd")
                .order(32)
                .group(FieldGroup::Donation)
                .max_instances(1)
                .not_duplicable()
                .min_width(25)
                .default_setting(HEADLINE, "Choose an amount")
                .default_setting(CUSTOM_LABEL, "Other amount"),
        }
    }

    fn submitted_amount(value: &Value, ctx: &SubmissionContext<'_>) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_amount(s, &ctx.config.currency),
            _ => None,
        }
    }
}

impl Default for DonateAmountField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for DonateAmountField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        let disabled = ctx.is_preview();
        let input_id = |suffix: &str| format!("cb-donate-{}-{suffix}", ctx.field_id);

        let options = amount_options(ctx.campaign, ctx.config)
            .into_iter()
            .enumerate()
            .map(|(i, option)| {
                let id = input_id(&i.to_string());
                Element::new("li")
                    .class("cb-donate-option")
                    .child(
                        Element::new("input")
                            .attr("type", "radio")
                            .attr("id", &id)
                            .attr("name", AMOUNT_INPUT)
                            .attr("value", plain_number(option.amount))
                            .flag_if(disabled, "disabled"),
                    )
                    .child(
                        Element::new("label")
                            .attr("for", &id)
                            .text(ctx.money(option.amount)),
                    )
                    .child_opt(option.description.map(|d| {
                        Element::new("span")
                            .class("cb-donate-option-description")
                            .text(d)
                    }))
            });

        let custom = allows_custom(ctx.campaign, ctx.config).then(|| {
            let id = input_id("custom");
            let minimum = ctx
                .campaign
                .settings
                .donation_options
                .minimum_donation
                .filter(|m| m.is_finite() && *m > 0.0);
            Element::new("div")
                .class("cb-donate-custom")
                .child(
                    Element::new("label")
                        .attr("for", &id)
                        .text(settings.string_or(CUSTOM_LABEL, "Other amount")),
                )
                .child(
                    Element::new("input")
                        .attr("type", "number")
                        .attr("id", &id)
                        .attr("name", CUSTOM_AMOUNT_INPUT)
                        .attr("min", plain_number(minimum.unwrap_or(0.0)))
                        .attr("step", "any")
                        .attr("placeholder", ctx.config.currency.symbol.as_str())
                        .flag_if(disabled, "disabled"),
                )
        });

        Element::new("div")
            .class("cb-donate-amount")
            .child_opt(
                settings
                    .string(HEADLINE)
                    .map(|h| Element::new("h3").class("cb-donate-headline").text(h)),
            )
            .child(Element::new("ul").class("cb-donate-options").children(options))
            .child_opt(custom)
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
            .text(
                CUSTOM_LABEL,
                "Custom amount label",
                settings.string(CUSTOM_LABEL).unwrap_or_default(),
            )
            .help("Suggested amounts are managed in the campaign's donation options.");
    }

    fn validate(&self, value: &Value, ctx: &SubmissionContext<'_>) -> ValidationResult {
        let Some(amount) = Self::submitted_amount(value, ctx) else {
            return ValidationResult::invalid("Please enter a donation amount");
        };
        if amount <= 0.0 {
            return ValidationResult::invalid("Donation amount must be greater than zero");
        }
        let options = &ctx.campaign.settings.donation_options;
        if let Some(minimum) = options.minimum_donation.filter(|m| *m > 0.0) {
            if amount < minimum {
                return ValidationResult::invalid(format!(
                    "The minimum donation is {}",
                    crate::fields::format::format_money(minimum, &ctx.config.currency)
                ));
            }
        }
        if !allows_custom(ctx.campaign, ctx.config) {
            let decimals = ctx.config.currency.decimals;
            let suggested = amount_options(ctx.campaign, ctx.config)
                .iter()
                .any(|o| round_to(o.amount, decimals) == round_to(amount, decimals));
            if !suggested {
                return ValidationResult::invalid("Please choose one of the suggested amounts");
            }
        }
        ValidationResult::Valid
    }

    fn format(&self, value: Value, ctx: &SubmissionContext<'_>) -> Value {
        match Self::submitted_amount(&value, ctx) {
            Some(amount) => serde_json::Number::from_f64(round_to(
                amount,
                ctx.config.currency.decimals,
            ))
            .map(Value::Number)
            .unwrap_or(value),
            None => value,
        }
    }
}
