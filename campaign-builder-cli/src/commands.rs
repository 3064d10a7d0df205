//! Command implementations. Each writes its result to `out` so that stdout
//! carries only HTML, JSON or tables; diagnostics go to the log on stderr.

use crate::cli::{Cli, Commands, Mode};
use crate::input::{parse_form, read_document, write_document};
use crate::table::{palette_table, types_table};
use anyhow::{Context, Result};
use campaign_builder::{
    AddField, BuilderContext, Campaign, CampaignState, FieldId, RenderMode, SaveSettings,
    StaticStateProvider,
};
use std::fs;
use std::io::Write;
use std::path::Path;

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Preview => RenderMode::Preview,
            Mode::Display => RenderMode::Display,
        }
    }
}

/// Build the context every command runs against
pub fn build_context(config: Option<&Path>) -> Result<BuilderContext> {
    BuilderContext::from_config_file(config).context("loading configuration")
}

pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let ctx = build_context(cli.config.as_deref())?;

    match &cli.command {
        Commands::Render {
            campaign,
            mode,
            state,
        } => render(ctx, campaign, (*mode).into(), state.as_deref(), out),
        Commands::Palette { campaign, json } => palette(&ctx, campaign, *json, out),
        Commands::Panel { campaign, field_id } => panel(&ctx, campaign, field_id, out),
        Commands::AddField {
            campaign,
            type_id,
            token,
        } => add_field(&ctx, campaign, type_id, token.as_deref(), out),
        Commands::SaveSettings {
            campaign,
            form,
            token,
        } => save_settings(&ctx, campaign, form, token.as_deref(), out),
        Commands::Types { json } => types(&ctx, *json, out),
    }
}

fn render(
    ctx: BuilderContext,
    path: &Path,
    mode: RenderMode,
    state: Option<&Path>,
    out: &mut dyn Write,
) -> Result<()> {
    let campaign: Campaign = read_document(path)?;
    let ctx = match state {
        Some(state_path) => {
            let state: CampaignState = read_document(state_path)?;
            if campaign.is_unsaved() {
                tracing::warn!("campaign has no id, --state is ignored for unsaved campaigns");
            }
            ctx.with_state_provider(StaticStateProvider::new().with_state(campaign.id, state))
        }
        None => ctx,
    };

    let page = ctx.render_page(&campaign, mode);
    tracing::info!(
        mode = %mode,
        fields = page.stats.fields,
        placeholders = page.stats.placeholders,
        dangling = page.stats.dangling,
        "rendered campaign"
    );
    writeln!(out, "{}", page.html)?;
    Ok(())
}

fn palette(ctx: &BuilderContext, path: &Path, json: bool, out: &mut dyn Write) -> Result<()> {
    let campaign: Campaign = read_document(path)?;
    let entries = ctx.palette(&campaign);
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
    } else {
        writeln!(out, "{}", palette_table(&entries))?;
    }
    Ok(())
}

fn panel(ctx: &BuilderContext, path: &Path, field_id: &str, out: &mut dyn Write) -> Result<()> {
    let campaign: Campaign = read_document(path)?;
    let field_id: FieldId = field_id.parse()?;
    let markup = ctx.render_settings_panel(&campaign, field_id)?;
    writeln!(out, "{markup}")?;
    Ok(())
}

fn add_field(
    ctx: &BuilderContext,
    path: &Path,
    type_id: &str,
    token: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let mut campaign: Campaign = read_document(path)?;
    let mut command = AddField::new(type_id);
    if let Some(token) = token {
        command = command.with_token(token);
    }
    let response = command.execute(ctx, &mut campaign)?;
    write_document(path, &campaign)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;
    Ok(())
}

fn save_settings(
    ctx: &BuilderContext,
    path: &Path,
    form: &Path,
    token: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let mut campaign: Campaign = read_document(path)?;
    let body = fs::read_to_string(form).with_context(|| format!("reading {}", form.display()))?;
    let mut command = SaveSettings::new(parse_form(&body)?);
    if let Some(token) = token {
        command = command.with_token(token);
    }
    let saved = command.execute(ctx, &mut campaign)?;
    write_document(path, &campaign)?;
    writeln!(
        out,
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({ "saved": saved }))?
    )?;
    Ok(())
}

fn types(ctx: &BuilderContext, json: bool, out: &mut dyn Write) -> Result<()> {
    let definitions = ctx.registry().definitions(None);
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&definitions)?)?;
    } else {
        writeln!(out, "{}", types_table(&definitions))?;
    }
    Ok(())
}
