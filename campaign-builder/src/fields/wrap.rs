//! Layout chrome applied around every field's content
//!
//! The wrapper carries the per-field DOM addressing the builder UI relies on
//! for drag/drop and selection: `data-field-id`, `data-field-type` and the
//! row/column/section (and tab) counters of the current render.

use crate::campaign::FieldId;
use crate::fields::{Alignment, FieldDefinition};
use crate::render::RenderMode;
use crate::settings::{SettingsView, ALIGNMENT, CLASS, WIDTH};
use campaign_builder_templating::{css_class_tokens, Element, Markup};

/// Where a field sits in one render of the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldAddress {
    pub row: usize,
    pub column: usize,
    pub section: usize,
    pub tab: Option<usize>,
}

/// Clamp a width percentage to `[min_width, 100]`; unset or invalid is 100.
pub fn clamp_width(width: Option<f64>, min_width: u8) -> u8 {
    let min = min_width.clamp(1, 100);
    match width.filter(|w| w.is_finite()) {
        Some(w) => w.round().clamp(f64::from(min), 100.0) as u8,
        None => 100,
    }
}

fn with_address(element: Element, address: Option<&FieldAddress>) -> Element {
    match address {
        Some(address) => element
            .data("row", address.row)
            .data("column", address.column)
            .data("section", address.section)
            .attr_opt("data-tab", address.tab),
        None => element,
    }
}

/// Wrap field content with width, alignment, custom class and addressing.
pub fn wrap_field(
    content: Markup,
    definition: &FieldDefinition,
    settings: &SettingsView<'_>,
    field_id: FieldId,
    address: Option<&FieldAddress>,
    mode: RenderMode,
) -> Markup {
    let width = clamp_width(settings.number(WIDTH), definition.min_width);
    let alignment = settings
        .string(ALIGNMENT)
        .and_then(|value| Alignment::parse(&value))
        .unwrap_or(definition.default_alignment);
    let custom_class = settings
        .string(CLASS)
        .map(|class| css_class_tokens(&class))
        .unwrap_or_default();

    let mut wrapper = Element::new("div")
        .class("cb-field")
        .class(format!("cb-field-{}", definition.type_id))
        .class(alignment.css_class())
        .class(&custom_class)
        .data("field-id", field_id)
        .data("field-type", &definition.type_id);
    wrapper = with_address(wrapper, address);
    if width < 100 {
        wrapper = wrapper.attr("style", format!("width: {width}%;"));
    }

    if mode == RenderMode::Preview {
        wrapper = wrapper
            .class("cb-field-preview")
            .class_if(!settings.is_configured(), "cb-field-unconfigured")
            .data("editable", definition.editable)
            .data("deletable", definition.deletable)
            .data("duplicable", definition.duplicable);
    }

    wrapper.markup(content).render()
}

/// Stand-in for a field whose type is not registered.
///
/// Both modes keep an element flagged with `cb-field-unavailable` and
/// `data-placeholder="unavailable"` at the field's position. The preview
/// labels it so the operator can remove or replace the block; on the visitor
/// page it is empty and `hidden`.
pub fn unavailable_placeholder(
    field_id: FieldId,
    type_id: &str,
    address: Option<&FieldAddress>,
    mode: RenderMode,
) -> Markup {
    let wrapper = placeholder_wrapper(field_id, type_id, address)
        .class("cb-field-unavailable")
        .data("placeholder", "unavailable");

    match mode {
        RenderMode::Preview => wrapper
            .class("cb-field-preview")
            .child(
                Element::new("div")
                    .class("cb-placeholder")
                    .text(format!("This block ({type_id}) is not available.")),
            )
            .render(),
        RenderMode::Display => wrapper.flag("hidden").render(),
    }
}

/// Preview marker for a layout reference with no saved settings. The visitor
/// page renders nothing for such a reference.
pub fn missing_settings_placeholder(
    field_id: FieldId,
    type_id: &str,
    address: Option<&FieldAddress>,
) -> Markup {
    placeholder_wrapper(field_id, type_id, address)
        .class("cb-field-missing")
        .class("cb-field-preview")
        .data("placeholder", "missing")
        .child(
            Element::new("div")
                .class("cb-placeholder")
                .text(format!("This block ({type_id}) has no saved settings.")),
        )
        .render()
}

fn placeholder_wrapper(
    field_id: FieldId,
    type_id: &str,
    address: Option<&FieldAddress>,
) -> Element {
    let wrapper = Element::new("div")
        .class("cb-field")
        .data("field-id", field_id)
        .data("field-type", type_id);
    with_address(wrapper, address)
}
