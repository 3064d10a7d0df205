//! Settings panel generator
//!
//! Every control is named `fields[<field id>][<setting key>]` (with `[]`
//! appended for multi-value controls and `[<sub key>]` for object members), so
//! [`parse_submission`] can fold a whole form back into per-field settings
//! without knowing which field types produced it.

use crate::campaign::{Campaign, FieldId};
use crate::error::{BuilderError, Result};
use crate::fields::format::plain_number;
use crate::fields::visibility::{default_selection, SubElement};
use crate::fields::wrap::clamp_width;
use crate::fields::{Alignment, FieldDefinition};
use crate::registry::FieldRegistry;
use crate::settings::{FieldSettings, SettingsView, ALIGNMENT, CLASS, OVERRIDES, SHOW_HIDE, WIDTH};
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{Element, Markup};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static CONTROL_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^fields\[([^\]]*)\]((?:\[[^\]]*\])+)$").expect("valid control name regex")
});

static SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]").expect("valid segment regex"));

/// Form control name for a setting
pub fn control_name(field_id: FieldId, key: &str) -> String {
    format!("fields[{field_id}][{key}]")
}

fn control_id(field_id: FieldId, key: &str) -> String {
    format!("cb-field-{field_id}-{}", key.replace('_', "-"))
}

#[derive(Debug, Clone, PartialEq)]
enum ControlKind {
    Text {
        value: String,
        placeholder: Option<String>,
    },
    TextArea {
        value: String,
        rows: u8,
    },
    Number {
        value: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
        step: f64,
    },
    Checkbox {
        checked: bool,
    },
    Select {
        value: String,
        options: Vec<(String, String)>,
    },
    CheckboxList {
        selected: Vec<String>,
        options: Vec<(String, String)>,
    },
    Visibility {
        value: Option<bool>,
    },
}

impl ControlKind {
    fn css_name(&self) -> &'static str {
        match self {
            ControlKind::Text { .. } => "text",
            ControlKind::TextArea { .. } => "textarea",
            ControlKind::Number { .. } => "number",
            ControlKind::Checkbox { .. } => "checkbox",
            ControlKind::Select { .. } => "select",
            ControlKind::CheckboxList { .. } => "checkbox-list",
            ControlKind::Visibility { .. } => "visibility",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Control {
    key: String,
    label: String,
    kind: ControlKind,
    help: Option<String>,
}

/// Settings form for one field instance
#[derive(Debug, Clone)]
pub struct SettingsPanel {
    field_id: FieldId,
    type_id: String,
    title: String,
    controls: Vec<Control>,
}

impl SettingsPanel {
    pub fn new(field_id: FieldId, definition: &FieldDefinition) -> Self {
        Self {
            field_id,
            type_id: definition.type_id.clone(),
            title: definition.display_name.clone(),
            controls: Vec::new(),
        }
    }

    pub fn field_id(&self) -> FieldId {
        self.field_id
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    fn push(&mut self, key: &str, label: &str, kind: ControlKind) -> &mut Self {
        self.controls.push(Control {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            help: None,
        });
        self
    }

    /// Help text for the most recently added control
    pub fn help(&mut self, text: &str) -> &mut Self {
        if let Some(control) = self.controls.last_mut() {
            control.help = Some(text.to_string());
        }
        self
    }

    pub fn text(&mut self, key: &str, label: &str, value: impl Into<String>) -> &mut Self {
        self.push(
            key,
            label,
            ControlKind::Text {
                value: value.into(),
                placeholder: None,
            },
        )
    }

    pub fn text_with_placeholder(
        &mut self,
        key: &str,
        label: &str,
        value: impl Into<String>,
        placeholder: &str,
    ) -> &mut Self {
        self.push(
            key,
            label,
            ControlKind::Text {
                value: value.into(),
                placeholder: Some(placeholder.to_string()),
            },
        )
    }

    pub fn textarea(&mut self, key: &str, label: &str, value: impl Into<String>) -> &mut Self {
        self.push(
            key,
            label,
            ControlKind::TextArea {
                value: value.into(),
                rows: 6,
            },
        )
    }

    pub fn number(
        &mut self,
        key: &str,
        label: &str,
        value: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
    ) -> &mut Self {
        self.push(
            key,
            label,
            ControlKind::Number {
                value,
                min,
                max,
                step: 1.0,
            },
        )
    }

    pub fn checkbox(&mut self, key: &str, label: &str, checked: bool) -> &mut Self {
        self.push(key, label, ControlKind::Checkbox { checked })
    }

    pub fn select<I, V, L>(&mut self, key: &str, label: &str, value: &str, options: I) -> &mut Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        let options = options
            .into_iter()
            .map(|(v, l)| (v.into(), l.into()))
            .collect();
        self.push(
            key,
            label,
            ControlKind::Select {
                value: value.to_string(),
                options,
            },
        )
    }

    pub fn checkbox_list<I, V, L>(
        &mut self,
        key: &str,
        label: &str,
        selected: Vec<String>,
        options: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        let options = options
            .into_iter()
            .map(|(v, l)| (v.into(), l.into()))
            .collect();
        self.push(key, label, ControlKind::CheckboxList { selected, options })
    }

    /// The `show_hide` checkboxes plus an override selector per sub-element
    pub fn sub_elements(
        &mut self,
        elements: &[SubElement],
        settings: &SettingsView<'_>,
    ) -> &mut Self {
        let selected = settings
            .own()
            .and_then(|own| own.list(SHOW_HIDE))
            .unwrap_or_else(|| {
                default_selection(elements)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            });
        let options = elements
            .iter()
            .map(|element| (element.key.to_string(), element.label.to_string()))
            .collect();
        self.push(
            SHOW_HIDE,
            "Show",
            ControlKind::CheckboxList { selected, options },
        );
        for element in elements {
            self.push(
                element.key,
                element.label,
                ControlKind::Visibility {
                    value: settings.override_for(element.key),
                },
            );
        }
        self
    }

    /// Width, alignment and custom class, shared by every field type
    pub fn layout_controls(
        &mut self,
        definition: &FieldDefinition,
        settings: &SettingsView<'_>,
    ) -> &mut Self {
        let width = clamp_width(settings.number(WIDTH), definition.min_width);
        self.number(
            WIDTH,
            "Width (%)",
            Some(f64::from(width)),
            Some(f64::from(definition.min_width)),
            Some(100.0),
        );
        let alignment = settings
            .string(ALIGNMENT)
            .and_then(|a| Alignment::parse(&a))
            .unwrap_or(definition.default_alignment);
        self.select(
            ALIGNMENT,
            "Alignment",
            alignment.as_str(),
            Alignment::ALL.map(|a| (a.as_str(), capitalize(a.as_str()))),
        );
        self.text(CLASS, "CSS class", settings.string(CLASS).unwrap_or_default())
    }

    pub fn render(&self) -> Markup {
        let mut panel = Element::new("div")
            .class("cb-settings-panel")
            .data("field-id", self.field_id)
            .data("field-type", &self.type_id)
            .child(Element::new("h3").class("cb-settings-title").text(&self.title));
        for control in &self.controls {
            panel.push(self.render_control(control));
        }
        panel.render()
    }

    fn render_control(&self, control: &Control) -> Element {
        let name = control_name(self.field_id, &control.key);
        let id = control_id(self.field_id, &control.key);
        let row = Element::new("div")
            .class("cb-setting")
            .class(format!("cb-setting-{}", control.kind.css_name()));
        let label = Element::new("label").attr("for", &id).text(&control.label);

        let row = match &control.kind {
            ControlKind::Text { value, placeholder } => row.child(label).child(
                Element::new("input")
                    .attr("type", "text")
                    .attr("id", &id)
                    .attr("name", &name)
                    .attr("value", value)
                    .attr_opt("placeholder", placeholder.as_ref()),
            ),
            ControlKind::TextArea { value, rows } => row.child(label).child(
                Element::new("textarea")
                    .attr("id", &id)
                    .attr("name", &name)
                    .attr("rows", rows)
                    .text(value),
            ),
            ControlKind::Number {
                value,
                min,
                max,
                step,
            } => row.child(label).child(
                Element::new("input")
                    .attr("type", "number")
                    .attr("id", &id)
                    .attr("name", &name)
                    .attr_opt("value", value.map(plain_number))
                    .attr_opt("min", min.map(plain_number))
                    .attr_opt("max", max.map(plain_number))
                    .attr("step", plain_number(*step)),
            ),
            ControlKind::Checkbox { checked } => row
                .child(
                    Element::new("input")
                        .attr("type", "hidden")
                        .attr("name", &name)
                        .attr("value", "0"),
                )
                .child(
                    Element::new("input")
                        .attr("type", "checkbox")
                        .attr("id", &id)
                        .attr("name", &name)
                        .attr("value", "1")
                        .flag_if(*checked, "checked"),
                )
                .child(label),
            ControlKind::Select { value, options } => row.child(label).child(
                Element::new("select")
                    .attr("id", &id)
                    .attr("name", &name)
                    .children(options.iter().map(|(v, l)| {
                        Element::new("option")
                            .attr("value", v)
                            .flag_if(v == value, "selected")
                            .text(l)
                    })),
            ),
            ControlKind::CheckboxList { selected, options } => {
                let list_name = format!("{name}[]");
                let mut fieldset = Element::new("fieldset")
                    .attr("id", &id)
                    .child(Element::new("legend").text(&control.label))
                    .child(
                        Element::new("input")
                            .attr("type", "hidden")
                            .attr("name", &list_name)
                            .attr("value", ""),
                    );
                for (value, text) in options {
                    fieldset.push(
                        Element::new("label").child(
                            Element::new("input")
                                .attr("type", "checkbox")
                                .attr("name", &list_name)
                                .attr("value", value)
                                .flag_if(selected.contains(value), "checked"),
                        )
                        .text(format!(" {text}")),
                    );
                }
                row.child(fieldset)
            }
            ControlKind::Visibility { value } => {
                let override_name =
                    format!("fields[{}][{OVERRIDES}][{}]", self.field_id, control.key);
                let current = match value {
                    Some(true) => "show",
                    Some(false) => "hide",
                    None => "",
                };
                let options = [("", "Default"), ("show", "Always show"), ("hide", "Always hide")];
                row.child(label).child(
                    Element::new("select")
                        .attr("id", &id)
                        .attr("name", override_name)
                        .children(options.into_iter().map(|(v, l)| {
                            Element::new("option")
                                .attr("value", v)
                                .flag_if(v == current, "selected")
                                .text(l)
                        })),
                )
            }
        };

        match &control.help {
            Some(help) => row.child(Element::new("p").class("cb-setting-help").text(help)),
            None => row,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render the settings panel of a placed field.
pub fn render_settings_panel(
    registry: &FieldRegistry,
    campaign: &Campaign,
    field_id: FieldId,
    config: &BuilderConfig,
) -> Result<Markup> {
    let instance = campaign
        .field(field_id)
        .ok_or(BuilderError::FieldNotFound { id: field_id })?;
    let field_type =
        registry
            .get(instance.type_id)
            .ok_or_else(|| BuilderError::UnknownFieldType {
                type_id: instance.type_id.to_string(),
            })?;
    let view = SettingsView::new(instance.settings, &field_type.definition().defaults);
    Ok(field_type.render_settings_panel(field_id, &view, config))
}

/// Fold submitted form pairs back into per-field settings.
///
/// Pairs whose name does not start with `fields[` are ignored. For scalar
/// keys the last value wins; `[key][]` pairs accumulate into a list (empty
/// values only ensure the list exists); `[key][sub]` pairs build an object.
pub fn parse_submission<I, K, V>(pairs: I) -> Result<IndexMap<FieldId, FieldSettings>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut out: IndexMap<FieldId, FieldSettings> = IndexMap::new();

    for (name, value) in pairs {
        let name = name.as_ref();
        if !name.starts_with("fields[") {
            continue;
        }
        let invalid = || BuilderError::InvalidSettingsPath {
            path: name.to_string(),
        };
        let caps = CONTROL_NAME_RE.captures(name).ok_or_else(invalid)?;
        let field_id: FieldId = caps[1].parse()?;
        let segments: Vec<&str> = SEGMENT_RE
            .captures_iter(&caps[2])
            .map(|segment| segment.get(1).map_or("", |m| m.as_str()))
            .collect();
        let value: String = value.into();

        match segments.as_slice() {
            [key] if !key.is_empty() => {
                out.entry(field_id).or_default().insert(*key, value);
            }
            [key, ""] if !key.is_empty() => {
                let settings = out.entry(field_id).or_default();
                if !matches!(settings.get(key), Some(Value::Array(_))) {
                    settings.insert(*key, Value::Array(Vec::new()));
                }
                if let (Some(Value::Array(items)), false) =
                    (settings.get_mut(key), value.is_empty())
                {
                    items.push(Value::String(value));
                }
            }
            [key, sub] if !key.is_empty() => {
                let settings = out.entry(field_id).or_default();
                if !matches!(settings.get(key), Some(Value::Object(_))) {
                    settings.insert(*key, Value::Object(Default::default()));
                }
                if let Some(Value::Object(members)) = settings.get_mut(key) {
                    members.insert(sub.to_string(), Value::String(value));
                }
            }
            _ => return Err(invalid()),
        }
    }

    Ok(out)
}
