//! Builder for escaped HTML elements
//!
//! ```
//! use campaign_builder_templating::Element;
//!
//! let html = Element::new("a")
//!     .class("cb-link")
//!     .attr("href", "/donate?x=1&y=2")
//!     .text("Give <now>")
//!     .render();
//! assert_eq!(
//!     html.as_str(),
//!     r#"<a class="cb-link" href="/donate?x=1&amp;y=2">Give &lt;now&gt;</a>"#
//! );
//! ```

use crate::markup::Markup;

/// Elements rendered without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "br", "col", "hr", "img", "input", "meta", "source", "wbr",
];

#[derive(Debug, Clone)]
enum Child {
    Text(String),
    Markup(Markup),
    Element(Element),
}

/// An HTML element under construction.
///
/// Class names are de-duplicated and emitted first, then attributes in
/// insertion order, so the same builder calls always produce the same bytes.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
    children: Vec<Child>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add one or more whitespace-separated class names
    pub fn class(mut self, class: impl AsRef<str>) -> Self {
        for token in class.as_ref().split_whitespace() {
            if !self.classes.iter().any(|c| c == token) {
                self.classes.push(token.to_string());
            }
        }
        self
    }

    pub fn class_if(self, condition: bool, class: impl AsRef<str>) -> Self {
        if condition {
            self.class(class)
        } else {
            self
        }
    }

    /// Set an attribute. Setting the same name twice replaces the value.
    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set_attr(name.into(), Some(value.to_string()));
        self
    }

    pub fn attr_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// A `data-*` attribute
    pub fn data(self, key: &str, value: impl ToString) -> Self {
        self.attr(format!("data-{key}"), value)
    }

    /// A boolean attribute such as `disabled` or `hidden`
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.set_attr(name.into(), None);
        self
    }

    pub fn flag_if(self, condition: bool, name: impl Into<String>) -> Self {
        if condition {
            self.flag(name)
        } else {
            self
        }
    }

    /// Append escaped text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Child::Text(text.into()));
        self
    }

    pub fn child(mut self, element: Element) -> Self {
        self.children.push(Child::Element(element));
        self
    }

    pub fn child_opt(self, element: Option<Element>) -> Self {
        match element {
            Some(element) => self.child(element),
            None => self,
        }
    }

    pub fn children(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(elements.into_iter().map(Child::Element));
        self
    }

    /// Append an already-rendered fragment
    pub fn markup(mut self, markup: Markup) -> Self {
        self.children.push(Child::Markup(markup));
        self
    }

    pub fn push(&mut self, element: Element) {
        self.children.push(Child::Element(element));
    }

    pub fn push_markup(&mut self, markup: Markup) {
        self.children.push(Child::Markup(markup));
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn render(&self) -> Markup {
        let mut out = Markup::new();
        self.write_into(&mut out);
        out
    }

    fn set_attr(&mut self, name: String, value: Option<String>) {
        if let Some(existing) = self.attrs.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    fn write_into(&self, out: &mut Markup) {
        out.push_raw("<");
        out.push_raw(&self.tag);
        if !self.classes.is_empty() {
            out.push_raw(" class=\"");
            out.push_raw(&html_escape::encode_double_quoted_attribute(
                &self.classes.join(" "),
            ));
            out.push_raw("\"");
        }
        for (name, value) in &self.attrs {
            out.push_raw(" ");
            out.push_raw(name);
            if let Some(value) = value {
                out.push_raw("=\"");
                out.push_raw(&html_escape::encode_double_quoted_attribute(value));
                out.push_raw("\"");
            }
        }
        out.push_raw(">");

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            match child {
                Child::Text(text) => out.push_text(text),
                Child::Markup(markup) => out.push(markup),
                Child::Element(element) => element.write_into(out),
            }
        }

        out.push_raw("</");
        out.push_raw(&self.tag);
        out.push_raw(">");
    }
}

impl From<Element> for Markup {
    fn from(element: Element) -> Self {
        element.render()
    }
}
