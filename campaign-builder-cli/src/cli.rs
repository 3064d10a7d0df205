//! CLI definition for the `cb` command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Campaign page builder.
///
/// Renders campaign documents (JSON or YAML, picked by extension) to preview
/// or display HTML and applies the builder's editing workflows to them.
#[derive(Parser, Debug)]
#[command(name = "cb")]
#[command(version)]
#[command(about = "Render and edit fundraising campaign pages")]
#[command(
    long_about = "Render and edit fundraising campaign pages.\n\n\
    Campaign documents are read from JSON or YAML files. Mutating commands \
    (add-field, save-settings) write the document back in place and require \
    a token listed under [auth] in the configuration file.\n\n\
    Environment variables:\n  \
    CAMPAIGN_BUILDER_*   Override configuration keys (use __ for nesting)\n  \
    RUST_LOG             Log filter when --debug is not given"
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a campaign page to HTML on stdout
    Render {
        /// Campaign document
        campaign: PathBuf,
        /// Which representation to produce
        #[arg(long, value_enum, default_value_t = Mode::Preview)]
        mode: Mode,
        /// Campaign state (donated, goal, donors, ...) for a saved campaign
        #[arg(long, value_name = "FILE")]
        state: Option<PathBuf>,
    },

    /// List the "add block" palette for a campaign
    Palette {
        /// Campaign document
        campaign: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the settings panel of one field
    Panel {
        /// Campaign document
        campaign: PathBuf,
        /// Field id
        field_id: String,
    },

    /// Add a block to a campaign and print the builder response as JSON
    AddField {
        /// Campaign document, updated in place
        campaign: PathBuf,
        /// Type of the new block, e.g. progress-bar
        type_id: String,
        /// Request token
        #[arg(long)]
        token: Option<String>,
    },

    /// Apply a url-encoded settings form submission
    SaveSettings {
        /// Campaign document, updated in place
        campaign: PathBuf,
        /// File holding `fields[<id>][<key>]=<value>` pairs joined by `&` or newlines
        form: PathBuf,
        /// Request token
        #[arg(long)]
        token: Option<String>,
    },

    /// List registered field types
    Types {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Preview,
    Display,
}
