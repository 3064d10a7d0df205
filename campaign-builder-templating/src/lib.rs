//! # Campaign Builder Templating
//!
//! The markup primitive every other campaign-builder crate writes through.
//!
//! Nothing in the builder concatenates HTML by hand. Field types assemble
//! [`Element`] trees, which escape text and attribute values on render, and
//! produce a [`Markup`] fragment. Operator-supplied rich text (descriptions,
//! text blocks, custom HTML) goes through [`sanitize_rich_text`] which keeps a
//! fixed allow-list of tags and attributes and drops everything else.
//!
//! ## Modules
//!
//! - [`markup`] - the `Markup` fragment type
//! - [`element`] - a builder for escaped HTML elements
//! - [`security`] - rich-text sanitizer, URL and class-name filters
//! - [`error`] - error types for rich-text validation

pub mod element;
pub mod error;
pub mod markup;
pub mod security;

pub use element::Element;
pub use error::{Result, TemplatingError};
pub use markup::Markup;
pub use security::{
    css_class_tokens, plain_text, safe_url, sanitize_rich_text, validate_rich_text,
    ALLOWED_TAGS, MAX_RICH_TEXT_DEPTH, MAX_RICH_TEXT_SIZE,
};
