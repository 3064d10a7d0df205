//! Security filters for operator-supplied content
//!
//! Rich text typed into the builder (campaign descriptions, text blocks,
//! custom HTML) is rendered back to visitors, so it is parsed and rebuilt
//! against a fixed allow-list instead of being emitted verbatim. Disallowed
//! elements are unwrapped (their text survives) except for a short list of
//! elements whose content is never meaningful as text, which are dropped whole.

use crate::error::{Result, TemplatingError};
use crate::markup::Markup;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

/// Maximum allowed rich-text size in bytes
pub const MAX_RICH_TEXT_SIZE: usize = 100_000;

/// Maximum allowed element nesting depth for rich text
pub const MAX_RICH_TEXT_DEPTH: usize = 32;

/// Tags kept by [`sanitize_rich_text`]
pub const ALLOWED_TAGS: &[&str] = &[
    "p", "span", "div", "br", "strong", "em", "b", "i", "u", "s", "blockquote", "h1", "h2", "h3",
    "h4", "h5", "h6", "a", "img", "svg", "path", "g", "circle", "rect", "ul", "ol", "li",
];

/// Elements removed together with everything inside them
const DROPPED_WITH_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "textarea", "select",
];

const VOID_TAGS: &[&str] = &["br", "img"];

/// URL-bearing attributes, checked with [`safe_url`]
const URL_ATTRIBUTES: &[&str] = &["href", "src"];

fn allowed_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "class", "target", "rel", "title"],
        "img" => &["src", "alt", "class", "width", "height", "title"],
        "svg" => &[
            "class", "width", "height", "viewbox", "xmlns", "fill", "stroke", "aria-hidden", "role",
        ],
        "path" => &["d", "fill", "stroke", "stroke-width", "fill-rule", "clip-rule"],
        "g" => &["fill", "stroke", "transform"],
        "circle" => &["cx", "cy", "r", "fill", "stroke"],
        "rect" => &["x", "y", "width", "height", "rx", "ry", "fill", "stroke"],
        _ => &["class"],
    }
}

static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.\-]*):").expect("valid scheme regex"));

static CLASS_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[A-Za-z_][A-Za-z0-9_\-]*$").expect("valid class regex"));

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Parse operator-supplied HTML and rebuild it with only allow-listed tags
/// and attributes.
///
/// Allowed elements nested deeper than [`MAX_RICH_TEXT_DEPTH`] are unwrapped
/// like disallowed ones, so the output never nests further than that.
pub fn sanitize_rich_text(input: &str) -> Markup {
    if input.trim().is_empty() {
        return Markup::new();
    }
    let fragment = Html::parse_fragment(input);
    let mut out = Markup::new();
    let mut stack = Vec::new();
    push_children(fragment.root_element(), 0, &mut stack);

    while let Some(step) = stack.pop() {
        match step {
            Step::Text(text) => out.push_text(text),
            Step::Close(name) => out.push(&Markup::trusted(format!("</{name}>"))),
            Step::Open(element, depth) => write_element(element, depth, &mut out, &mut stack),
        }
    }
    out
}

/// Pending work of the sanitizer walk, popped in document order
enum Step<'a> {
    Text(&'a str),
    Open(ElementRef<'a>, usize),
    Close(String),
}

/// Queue the children of `parent` so the first child is popped first
fn push_children<'a>(parent: ElementRef<'a>, depth: usize, stack: &mut Vec<Step<'a>>) {
    let first = stack.len();
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => {
                let text: &str = text;
                stack.push(Step::Text(text));
            }
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    stack.push(Step::Open(element, depth));
                }
            }
            _ => {}
        }
    }
    stack[first..].reverse();
}

fn write_element<'a>(
    element: ElementRef<'a>,
    depth: usize,
    out: &mut Markup,
    stack: &mut Vec<Step<'a>>,
) {
    let name = element.value().name().to_ascii_lowercase();

    if DROPPED_WITH_CONTENT.contains(&name.as_str()) {
        tracing::debug!(tag = %name, "dropping disallowed element with content");
        return;
    }

    if !ALLOWED_TAGS.contains(&name.as_str()) || depth >= MAX_RICH_TEXT_DEPTH {
        push_children(element, depth, stack);
        return;
    }

    let allowed = allowed_attributes(&name);
    let mut open = format!("<{name}");
    for (attr, value) in element.value().attrs() {
        let attr = attr.to_ascii_lowercase();
        if !allowed.contains(&attr.as_str()) {
            continue;
        }
        let value = if URL_ATTRIBUTES.contains(&attr.as_str()) {
            match safe_url(value) {
                Some(url) => url,
                None => continue,
            }
        } else if attr == "class" {
            css_class_tokens(value)
        } else {
            value.to_string()
        };
        open.push(' ');
        open.push_str(&attr);
        open.push_str("=\"");
        open.push_str(&html_escape::encode_double_quoted_attribute(&value));
        open.push('"');
    }
    if name == "a" && element.value().attr("target") == Some("_blank") {
        open.push_str(" rel=\"noopener noreferrer\"");
    }
    open.push('>');
    out.push(&Markup::trusted(open));

    if VOID_TAGS.contains(&name.as_str()) {
        return;
    }

    stack.push(Step::Close(name));
    push_children(element, depth + 1, stack);
}

/// Reject rich text that is too large or too deeply nested to store.
pub fn validate_rich_text(input: &str) -> Result<()> {
    if input.len() > MAX_RICH_TEXT_SIZE {
        return Err(TemplatingError::TooLarge {
            size: input.len(),
            max: MAX_RICH_TEXT_SIZE,
        });
    }

    let fragment = Html::parse_fragment(input);
    let depth = max_depth(fragment.root_element());
    if depth > MAX_RICH_TEXT_DEPTH {
        return Err(TemplatingError::NestingTooDeep {
            depth,
            max: MAX_RICH_TEXT_DEPTH,
        });
    }

    Ok(())
}

fn max_depth(root: ElementRef<'_>) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(root, 0)];
    while let Some((element, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        stack.extend(
            element
                .children()
                .filter_map(ElementRef::wrap)
                .map(|child| (child, depth + 1)),
        );
    }
    deepest
}

/// Accept `http`, `https`, `mailto`, `tel` and scheme-less URLs; reject
/// everything else (`javascript:`, `data:`, ...).
pub fn safe_url(url: &str) -> Option<String> {
    let trimmed: String = url.trim().chars().filter(|c| !c.is_control()).collect();
    if trimmed.is_empty() {
        return None;
    }
    match SCHEME_RE.captures(&trimmed) {
        Some(caps) => {
            let scheme = caps[1].to_ascii_lowercase();
            match scheme.as_str() {
                "http" | "https" | "mailto" | "tel" => Some(trimmed),
                _ => None,
            }
        }
        None => Some(trimmed),
    }
}

/// Keep only well-formed CSS class tokens from a user-entered class string.
pub fn css_class_tokens(input: &str) -> String {
    input
        .split_whitespace()
        .filter(|token| CLASS_TOKEN_RE.is_match(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text content of an HTML fragment with whitespace collapsed, used for
/// character-limited previews.
pub fn plain_text(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    let mut text = String::new();
    let mut stack: Vec<_> = fragment.root_element().children().collect();
    stack.reverse();

    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(chunk) => {
                let chunk: &str = chunk;
                text.push_str(chunk);
            }
            Node::Element(el) => {
                let name = el.name().to_ascii_lowercase();
                if DROPPED_WITH_CONTENT.contains(&name.as_str()) {
                    continue;
                }
                text.push(' ');
                let first = stack.len();
                stack.extend(node.children());
                stack[first..].reverse();
            }
            _ => {}
        }
    }
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn keeps_allowed_markup() {
        let html =
            sanitize_rich_text("<p class=\"lead\">Help <strong>us</strong> <em>today</em></p>");
        assert_eq!(
            html.as_str(),
            "<p class=\"lead\">Help <strong>us</strong> <em>today</em></p>"
        );
    }

    #[test]
    fn drops_script_with_content() {
        let html = sanitize_rich_text("<p>ok</p><script>alert('x')</script>");
        assert_eq!(html.as_str(), "<p>ok</p>");
    }

    #[test]
    fn unwraps_unknown_tags_but_keeps_text() {
        let html = sanitize_rich_text("<marquee>Give <b>now</b></marquee>");
        assert_eq!(html.as_str(), "Give <b>now</b>");
    }

    #[test]
    fn strips_event_handlers_and_bad_urls() {
        let html = sanitize_rich_text(
            "<a href=\"javascript:alert(1)\" onclick=\"x()\" class=\"btn\">click</a>",
        );
        assert_eq!(html.as_str(), "<a class=\"btn\">click</a>");
    }

    #[test]
    fn blank_target_gets_noopener() {
        let html = sanitize_rich_text("<a href=\"https://example.org\" target=\"_blank\">x</a>");
        assert!(html.contains("rel=\"noopener noreferrer\""));
        assert!(html.contains("href=\"https://example.org\""));
    }

    #[test]
    fn image_is_void() {
        let html = sanitize_rich_text("<img src=\"/a.png\" alt=\"A\" onerror=\"x\">");
        assert_eq!(html.as_str(), "<img src=\"/a.png\" alt=\"A\">");
    }

    #[test]
    fn text_is_reescaped() {
        let html = sanitize_rich_text("5 &lt; 6 &amp; 7");
        assert_eq!(html.as_str(), "5 &lt; 6 &amp; 7");
    }

    #[test]
    fn empty_input_is_empty_markup() {
        assert!(sanitize_rich_text("   ").is_empty());
    }

    #[rstest]
    #[case("https://example.org/x", true)]
    #[case("http://example.org", true)]
    #[case("mailto:team@example.org", true)]
    #[case("/relative/path.png", true)]
    #[case("javascript:alert(1)", false)]
    #[case("JavaScript:alert(1)", false)]
    #[case("data:text/html;base64,AAAA", false)]
    #[case("", false)]
    fn url_filter(#[case] url: &str, #[case] accepted: bool) {
        assert_eq!(safe_url(url).is_some(), accepted);
    }

    #[test]
    fn class_tokens_are_filtered() {
        assert_eq!(
            css_class_tokens("hero  big\" onclick=x <b> ok-2"),
            "hero ok-2"
        );
    }

    #[test]
    fn plain_text_collapses_whitespace() {
        assert_eq!(
            plain_text("<h2>Title</h2>\n<p>Body   text</p><script>x</script>"),
            "Title Body text"
        );
    }

    #[test]
    fn validate_rejects_large_input() {
        let large = "a".repeat(MAX_RICH_TEXT_SIZE + 1);
        let result = validate_rich_text(&large);
        assert!(matches!(result, Err(TemplatingError::TooLarge { .. })));
    }

    #[test]
    fn validate_rejects_deep_nesting() {
        let deep = "<span>".repeat(MAX_RICH_TEXT_DEPTH + 5);
        let result = validate_rich_text(&deep);
        assert!(matches!(result, Err(TemplatingError::NestingTooDeep { .. })));
    }

    #[test]
    fn deeply_nested_input_is_flattened_not_overflowed() {
        let deep = format!("{}deep", "<span>".repeat(20_000));
        let html = sanitize_rich_text(&deep);
        assert_eq!(html.as_str().matches("<span>").count(), MAX_RICH_TEXT_DEPTH);
        assert_eq!(html.as_str().matches("</span>").count(), MAX_RICH_TEXT_DEPTH);
        assert!(html.contains("deep"));

        assert!(matches!(
            validate_rich_text(&deep),
            Err(TemplatingError::NestingTooDeep { .. })
        ));
        assert_eq!(plain_text(&deep), "deep");
    }

    #[test]
    fn nesting_at_the_limit_is_kept() {
        let nested = format!(
            "{}x{}",
            "<span>".repeat(MAX_RICH_TEXT_DEPTH),
            "</span>".repeat(MAX_RICH_TEXT_DEPTH)
        );
        assert_eq!(sanitize_rich_text(&nested).as_str(), nested);
        assert!(validate_rich_text(&nested).is_ok());
    }

    #[test]
    fn validate_accepts_normal_text() {
        assert!(validate_rich_text("<p>Thanks for <em>everything</em></p>").is_ok());
    }
}
