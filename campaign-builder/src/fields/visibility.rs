//! Show/hide resolution for the sub-elements of composite fields
//!
//! Highest precedence first:
//!
//! 1. An explicit override in the instance's `overrides` object
//! 2. The campaign-state gate (no goal, no time remaining, ...)
//! 3. Membership in the instance's `show_hide` selection, when it has one
//! 4. The type-level default, for instances that have no selection yet

use crate::settings::{SettingsView, SHOW_HIDE};

/// A toggleable part of a composite field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubElement {
    /// Key used in `show_hide` and `overrides`
    pub key: &'static str,
    pub label: &'static str,
    pub default_visible: bool,
}

impl SubElement {
    pub const fn new(key: &'static str, label: &'static str, default_visible: bool) -> Self {
        Self {
            key,
            label,
            default_visible,
        }
    }
}

/// Whether `element` is shown, given whether its campaign-state gate is open.
pub fn is_visible(settings: &SettingsView<'_>, element: &SubElement, gate_open: bool) -> bool {
    if let Some(forced) = settings.override_for(element.key) {
        return forced;
    }
    if !gate_open {
        return false;
    }
    match settings.own().and_then(|own| own.list(SHOW_HIDE)) {
        Some(selected) => selected.iter().any(|key| key == element.key),
        None => element.default_visible,
    }
}

/// Keys of the elements visible by default, for seeding `show_hide`
pub fn default_selection(elements: &[SubElement]) -> Vec<&'static str> {
    elements
        .iter()
        .filter(|element| element.default_visible)
        .map(|element| element.key)
        .collect()
}
