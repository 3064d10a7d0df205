//! Page composition engine for fundraising campaigns
//!
//! A campaign page is a tree of rows, columns, sections and tabs whose leaves
//! reference field instances: typed content blocks such as a title, a
//! progress bar or a donation amount picker. This crate owns the field-type
//! contract and the built-in types, the registry that resolves stored type
//! ids, the composition engine that walks a layout into markup, the settings
//! panels operators configure fields with, and the workflows that add,
//! configure and delete fields.
//!
//! ## Overview
//!
//! - **Two modes** - every page renders either as the builder's editable
//!   preview or as the page visitors see
//! - **Never fails to render** - unknown types become placeholders, missing
//!   settings fall back to the type's defaults
//! - **Extension points** - palette, default-settings and display transforms
//!   let other components adjust the builder without touching field types
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use campaign_builder::{AddField, BuilderContext, Campaign, RenderMode};
//! use campaign_builder_config::BuilderConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = BuilderContext::new(BuilderConfig::default());
//! let mut campaign = Campaign::new("Clean water for Kisumu").with_goal(5000.0);
//!
//! let added = AddField::new("progress-bar")
//!     .with_token("operator-token")
//!     .execute(&ctx, &mut campaign)?;
//! println!("added field {}", added.field_id);
//!
//! let page = ctx.render_page(&campaign, RenderMode::Preview);
//! println!("{}", page.html);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod campaign;
mod context;
mod error;
pub mod fields;
pub mod hooks;
pub mod layout;
pub mod panel;
pub mod registry;
pub mod render;
pub mod settings;
pub mod state;
pub mod store;
pub mod workflow;

pub use auth::{Actor, Authenticator, Capability, StaticTokenAuthenticator};
pub use campaign::{Campaign, CampaignId, CampaignSettings, FieldId, FieldInstance};
pub use context::BuilderContext;
pub use error::{BuilderError, ErrorSeverity, Result, Severity};
pub use fields::{
    FieldDefinition, FieldGroup, FieldType, RenderContext, SubElement, SubmissionContext,
    ValidationResult,
};
pub use hooks::ExtensionPoints;
pub use layout::{LayoutTree, SectionAddress};
pub use registry::{FieldRegistry, PaletteEntry};
pub use render::{PageRenderer, RenderMode, RenderStats, RenderedPage};
pub use settings::{FieldSettings, SettingsView};
pub use state::{CampaignState, NoStateProvider, StateProvider, StaticStateProvider};
pub use store::{CampaignStore, FileStore, MemoryStore};
pub use workflow::{AddField, DeleteField, NewFieldResponse, ProcessSubmission, SaveSettings};

// Re-export the markup primitive so field implementations need one import
pub use campaign_builder_templating::{Element, Markup};
