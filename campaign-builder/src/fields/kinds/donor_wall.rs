use super::{placeholder, DONOR_WALL};
use crate::fields::visibility::{is_visible, SubElement};
use crate::fields::{FieldDefinition, FieldGroup, FieldType, RenderContext, ValidationResult};
use crate::panel::SettingsPanel;
use crate::settings::{FieldSettings, SettingsView};
use crate::state::Donor;
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{Element, Markup};

const HEADING: &str = "heading";
const MAX_DONORS: &str = "max_donors";
const DEFAULT_MAX_DONORS: f64 = 6.0;
const MAX_DONORS_LIMIT: f64 = 50.0;

const SHOW_AMOUNT: SubElement = SubElement::new("show_amount", "Donation amount", true);
const SHOW_MESSAGE: SubElement = SubElement::new("show_message", "Donor message", false);

const SUB_ELEMENTS: [SubElement; 2] = [SHOW_AMOUNT, SHOW_MESSAGE];

/// Recent donors, newest first as supplied by the state provider
pub struct DonorWallField {
    definition: FieldDefinition,
}

impl DonorWallField {
    pub fn new() -> Self {
        Self {
            definition: FieldDefinition::new(DONOR_WALL, "Donor Wall")
                .icon("users")
                .order(36)
                .group(FieldGroup::Donation)
                .min_width(25)
                .default_setting(HEADING, "Recent donors")
                .default_setting(MAX_DONORS, DEFAULT_MAX_DONORS)
                .sub_elements(&SUB_ELEMENTS),
        }
    }

    fn limit(settings: &SettingsView<'_>) -> usize {
        settings
            .number(MAX_DONORS)
            .unwrap_or(DEFAULT_MAX_DONORS)
            .round()
            .clamp(1.0, MAX_DONORS_LIMIT) as usize
    }

    fn donor(
        donor: &Donor,
        show_amount: bool,
        show_message: bool,
        ctx: &RenderContext<'_>,
    ) -> Element {
        let name = if donor.name.trim().is_empty() {
            "Anonymous"
        } else {
            donor.name.trim()
        };
        Element::new("li")
            .class("cb-donor")
            .child(Element::new("span").class("cb-donor-name").text(name))
            .child_opt(donor.amount.filter(|_| show_amount).map(|amount| {
                Element::new("span")
                    .class("cb-donor-amount")
                    .text(ctx.money(amount))
            }))
            .child_opt(
                donor
                    .message
                    .as_deref()
                    .map(str::trim)
                    .filter(|m| show_message && !m.is_empty())
                    .map(|m| Element::new("q").class("cb-donor-message").text(m)),
            )
    }
}

impl Default for DonorWallField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for DonorWallField {
    fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn render_preview(&self, settings: &SettingsView<'_>, ctx: &RenderContext<'_>) -> Markup {
        let donors = &ctx.state.donors;
        let show_amount = is_visible(settings, &SHOW_AMOUNT, true);
        let show_message = is_visible(settings, &SHOW_MESSAGE, true);

        let wall = Element::new("div").class("cb-donor-wall").child_opt(
            settings
                .string(HEADING)
                .map(|h| Element::new("h3").class("cb-donor-wall-heading").text(h)),
        );

        if donors.is_empty() {
            let empty = if ctx.is_preview() {
                placeholder("Donors will be listed here.")
            } else {
                Element::new("p")
                    .class("cb-donor-wall-empty")
                    .text("Be the first to donate!")
            };
            return wall.child(empty).render();
        }

        wall.child(
            Element::new("ul").class("cb-donor-list").children(
                donors
                    .iter()
                    .take(Self::limit(settings))
                    .map(|donor| Self::donor(donor, show_amount, show_message, ctx)),
            ),
        )
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
            .number(
                MAX_DONORS,
                "Donors shown",
                Some(Self::limit(settings) as f64),
                Some(1.0),
                Some(MAX_DONORS_LIMIT),
            )
            .sub_elements(&SUB_ELEMENTS, settings);
    }

    fn prepare_settings(&self, settings: &mut FieldSettings) -> ValidationResult {
        if settings.get(MAX_DONORS).is_none() {
            return ValidationResult::Valid;
        }
        match settings.number(MAX_DONORS) {
            Some(n) => {
                settings.insert(MAX_DONORS, n.round().clamp(1.0, MAX_DONORS_LIMIT));
                ValidationResult::Valid
            }
            None => ValidationResult::invalid("Donors shown must be a number"),
        }
    }
}
