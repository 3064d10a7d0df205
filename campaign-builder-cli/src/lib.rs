//! `cb` - command-line front end for the campaign page builder.
//!
//! Commands:
//! - `cb render <campaign> [--mode preview|display] [--state <file>]`: Render a page to HTML
//! - `cb palette <campaign> [--json]`: List the "add block" palette
//! - `cb panel <campaign> <field-id>`: Render one field's settings panel
//! - `cb add-field <campaign> <type-id> --token <t>`: Add a block
//! - `cb save-settings <campaign> <form-file> --token <t>`: Apply a settings submission
//! - `cb types [--json]`: List registered field types

pub mod cli;
pub mod commands;
pub mod input;
pub mod table;

pub use cli::{Cli, Commands, Mode};
