//! Escaped HTML fragments

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fragment of HTML that is safe to emit as-is.
///
/// A `Markup` is only ever built from escaped text, from an [`crate::Element`]
/// render, from the rich-text sanitizer, or from other `Markup` values. The
/// one escape hatch is [`Markup::trusted`], reserved for fragments the builder
/// itself produced earlier (e.g. markup returned by an extension point).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    /// An empty fragment
    pub fn new() -> Self {
        Self(String::new())
    }

    /// Escape plain text into a fragment
    pub fn text(text: &str) -> Self {
        Self(html_escape::encode_text(text).into_owned())
    }

    /// Wrap HTML that was produced by the builder itself.
    pub fn trusted(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// Append another fragment
    pub fn push(&mut self, other: &Markup) {
        self.0.push_str(&other.0);
    }

    /// Append escaped text
    pub fn push_text(&mut self, text: &str) {
        self.0.push_str(&html_escape::encode_text(text));
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    pub(crate) fn push_raw(&mut self, html: &str) {
        self.0.push_str(html);
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Markup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromIterator<Markup> for Markup {
    fn from_iter<I: IntoIterator<Item = Markup>>(iter: I) -> Self {
        let mut out = Markup::new();
        out.extend(iter);
        out
    }
}

impl Extend<Markup> for Markup {
    fn extend<I: IntoIterator<Item = Markup>>(&mut self, iter: I) {
        for fragment in iter {
            self.push(&fragment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_escaped() {
        let markup = Markup::text("<b>Tom & Jerry</b>");
        assert_eq!(markup.as_str(), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
    }

    #[test]
    fn fragments_concatenate_in_order() {
        let joined: Markup = vec![Markup::text("a"), Markup::trusted("<br>"), Markup::text("b")]
            .into_iter()
            .collect();
        assert_eq!(joined.to_string(), "a<br>b");
    }

    #[test]
    fn push_text_escapes() {
        let mut markup = Markup::trusted("<p>");
        markup.push_text("1 < 2");
        assert_eq!(markup.as_str(), "<p>1 &lt; 2");
    }
}
