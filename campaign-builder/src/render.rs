//! Composition engine
//!
//! Walks a campaign's layout tree depth-first (rows, columns, sections, tabs)
//! and renders every referenced field through its registered type, in either
//! builder preview or visitor display mode.
//!
//! Rendering never fails. A reference to an unregistered type becomes an
//! "unavailable" placeholder. A reference whose id has no entry in the
//! campaign's field map is skipped (marked in preview only). A section with
//! nothing renderable gets a drop target in preview. Row, column and section
//! counters start at 1 and are assigned in walk order on every render, so
//! rendering the same campaign twice yields identical markup.

use crate::campaign::{Campaign, FieldId};
use crate::error::BuilderError;
use crate::fields::wrap::{
    missing_settings_placeholder, unavailable_placeholder, wrap_field, FieldAddress,
};
use crate::fields::RenderContext;
use crate::hooks::ExtensionPoints;
use crate::layout::{FieldRef, Row, Section, Tab};
use crate::registry::FieldRegistry;
use crate::settings::SettingsView;
use crate::state::{CampaignState, StateProvider};
use campaign_builder_config::BuilderConfig;
use campaign_builder_templating::{Element, Markup};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which representation to produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Editable representation inside the builder
    #[default]
    Preview,
    /// The page visitors see
    Display,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Preview => "preview",
            RenderMode::Display => "display",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preview" => Ok(RenderMode::Preview),
            "display" => Ok(RenderMode::Display),
            other => Err(BuilderError::ValidationFailed {
                field: "mode".to_string(),
                message: format!("unknown render mode '{other}', expected preview or display"),
            }),
        }
    }
}

/// What one page render touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    pub rows: usize,
    pub columns: usize,
    pub sections: usize,
    /// Fields rendered through their registered type
    pub fields: usize,
    /// References to unregistered types
    pub placeholders: usize,
    /// Layout references with no entry in the campaign's field map, skipped
    pub dangling: usize,
    /// Sections with no renderable field
    pub empty_sections: usize,
}

/// Markup of a whole page plus render statistics
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub html: Markup,
    pub stats: RenderStats,
}

#[derive(Debug, Default)]
struct Walk {
    stats: RenderStats,
    row: usize,
    column: usize,
    section: usize,
}

impl Walk {
    fn next_row(&mut self) -> usize {
        self.row += 1;
        self.stats.rows += 1;
        self.row
    }

    fn next_column(&mut self) -> usize {
        self.column += 1;
        self.stats.columns += 1;
        self.column
    }

    fn next_section(&mut self) -> usize {
        self.section += 1;
        self.stats.sections += 1;
        self.section
    }
}

/// Renders campaigns against a registry, extension points and state source
pub struct PageRenderer<'a> {
    registry: &'a FieldRegistry,
    hooks: &'a ExtensionPoints,
    config: &'a BuilderConfig,
    state_provider: &'a dyn StateProvider,
}

impl<'a> PageRenderer<'a> {
    pub fn new(
        registry: &'a FieldRegistry,
        hooks: &'a ExtensionPoints,
        config: &'a BuilderConfig,
        state_provider: &'a dyn StateProvider,
    ) -> Self {
        Self {
            registry,
            hooks,
            config,
            state_provider,
        }
    }

    /// Campaign state used for a render.
    ///
    /// Saved campaigns ask the provider. When it has nothing, preview falls
    /// back to illustrative placeholder numbers and display to a zeroed state
    /// carrying the campaign's own goal.
    pub fn resolve_state(&self, campaign: &Campaign, mode: RenderMode) -> CampaignState {
        if !campaign.is_unsaved() {
            if let Some(mut state) = self.state_provider.campaign_state(campaign.id) {
                if !state.has_goal() {
                    state.goal = campaign.goal();
                }
                return state;
            }
            tracing::debug!(
                campaign_id = %campaign.id,
                "no campaign state available, using defaults"
            );
        }
        match mode {
            RenderMode::Preview => {
                CampaignState::illustrative(campaign.goal(), &self.config.preview)
            }
            RenderMode::Display => CampaignState::zeroed(campaign.goal()),
        }
    }

    /// Render the whole page
    pub fn render_page(&self, campaign: &Campaign, mode: RenderMode) -> RenderedPage {
        let state = self.resolve_state(campaign, mode);
        let mut walk = Walk::default();

        tracing::debug!(
            campaign_id = %campaign.id,
            mode = %mode,
            rows = campaign.layout.rows.len(),
            "rendering campaign page"
        );

        let mut page = Element::new("div")
            .class("cb-page")
            .class(format!("cb-page-{mode}"))
            .data("campaign-id", campaign.id);
        for row in &campaign.layout.rows {
            page.push(self.render_row(row, campaign, &state, mode, &mut walk));
        }
        if campaign.layout.is_empty() && mode == RenderMode::Preview {
            page.push(drop_target(None));
        }

        RenderedPage {
            html: page.render(),
            stats: walk.stats,
        }
    }

    fn render_row(
        &self,
        row: &Row,
        campaign: &Campaign,
        state: &CampaignState,
        mode: RenderMode,
        walk: &mut Walk,
    ) -> Element {
        let row_number = walk.next_row();
        let mut element = Element::new("div")
            .class("cb-row")
            .class(format!("cb-row-{}", row.kind.as_str()))
            .class(format!("cb-columns-{}", row.columns.len()))
            .data("row", row_number);

        for column in &row.columns {
            let column_number = walk.next_column();
            let mut column_element = Element::new("div")
                .class("cb-column")
                .data("row", row_number)
                .data("column", column_number);
            for section in &column.sections {
                let address = FieldAddress {
                    row: row_number,
                    column: column_number,
                    section: walk.next_section(),
                    tab: None,
                };
                column_element
                    .push(self.render_section(section, address, campaign, state, mode, walk));
            }
            element.push(column_element);
        }
        element
    }

    fn render_section(
        &self,
        section: &Section,
        address: FieldAddress,
        campaign: &Campaign,
        state: &CampaignState,
        mode: RenderMode,
        walk: &mut Walk,
    ) -> Element {
        let container = Element::new("div")
            .class("cb-section")
            .class(format!("cb-section-{}", section.kind()))
            .data("row", address.row)
            .data("column", address.column)
            .data("section", address.section);

        match section {
            Section::Fields { fields } | Section::Header { fields } => {
                let (mut container, rendered) =
                    self.fill_field_list(container, fields, address, campaign, state, mode, walk);
                if rendered == 0 {
                    walk.stats.empty_sections += 1;
                    if mode == RenderMode::Preview {
                        container.push(drop_target(Some(&address)));
                    }
                }
                container
            }
            Section::Tabs { tabs } => {
                self.render_tabs(container, tabs, address, campaign, state, mode, walk)
            }
        }
    }

    /// Tab navigation followed by one pane per tab. A tabs section with no
    /// renderable field in any tab counts as one empty section and gets a
    /// single section-level drop target; otherwise empty panes get their own.
    #[allow(clippy::too_many_arguments)]
    fn render_tabs(
        &self,
        container: Element,
        tabs: &[Tab],
        address: FieldAddress,
        campaign: &Campaign,
        state: &CampaignState,
        mode: RenderMode,
        walk: &mut Walk,
    ) -> Element {
        let pane_id = |tab: usize| format!("cb-tab-{}-{tab}", address.section);

        let nav = Element::new("ul")
            .class("cb-tab-nav")
            .attr("role", "tablist")
            .children(tabs.iter().enumerate().map(|(i, tab)| {
                let number = i + 1;
                let title = if tab.title.trim().is_empty() {
                    format!("Tab {number}")
                } else {
                    tab.title.trim().to_string()
                };
                Element::new("li")
                    .class("cb-tab-link")
                    .class_if(i == 0, "cb-active")
                    .data("tab", number)
                    .child(
                        Element::new("a")
                            .attr("href", format!("#{}", pane_id(number)))
                            .attr("role", "tab")
                            .text(title),
                    )
            }));

        let mut panes = Vec::with_capacity(tabs.len());
        let mut total = 0;
        for (i, tab) in tabs.iter().enumerate() {
            let number = i + 1;
            let pane = Element::new("div")
                .class("cb-tab-pane")
                .class_if(i == 0, "cb-active")
                .attr("id", pane_id(number))
                .attr("role", "tabpanel")
                .data("tab", number);
            let tab_address = FieldAddress {
                tab: Some(number),
                ..address
            };
            let (pane, rendered) =
                self.fill_field_list(pane, &tab.fields, tab_address, campaign, state, mode, walk);
            total += rendered;
            panes.push((pane, rendered, tab_address));
        }

        let mut container = container.child(nav);
        for (mut pane, rendered, tab_address) in panes {
            if rendered == 0 && total > 0 && mode == RenderMode::Preview {
                pane.push(drop_target(Some(&tab_address)));
            }
            container.push(pane);
        }
        if total == 0 {
            walk.stats.empty_sections += 1;
            if mode == RenderMode::Preview {
                container.push(drop_target(Some(&address)));
            }
        }
        container
    }

    /// Render a list of references into `container`, returning it with the
    /// number of fields rendered through their registered type.
    ///
    /// A reference with no entry in the campaign's field map is skipped; the
    /// preview marks its position so the operator can remove it.
    #[allow(clippy::too_many_arguments)]
    fn fill_field_list(
        &self,
        mut container: Element,
        fields: &[FieldRef],
        address: FieldAddress,
        campaign: &Campaign,
        state: &CampaignState,
        mode: RenderMode,
        walk: &mut Walk,
    ) -> (Element, usize) {
        let mut rendered = 0;
        for field_ref in fields {
            if !campaign.fields.contains_key(&field_ref.id) {
                tracing::debug!(
                    field_id = %field_ref.id,
                    type_id = %field_ref.type_id,
                    "layout references a field without settings, skipping"
                );
                walk.stats.dangling += 1;
                if mode == RenderMode::Preview {
                    container.push_markup(missing_settings_placeholder(
                        field_ref.id,
                        &field_ref.type_id,
                        Some(&address),
                    ));
                }
                continue;
            }
            let (markup, resolved) =
                self.render_ref(field_ref, Some(&address), campaign, state, mode, &mut walk.stats);
            if resolved {
                rendered += 1;
            }
            container.push_markup(markup);
        }
        (container, rendered)
    }

    /// Render one reference. The flag is false when a placeholder stood in.
    fn render_ref(
        &self,
        field_ref: &FieldRef,
        address: Option<&FieldAddress>,
        campaign: &Campaign,
        state: &CampaignState,
        mode: RenderMode,
        stats: &mut RenderStats,
    ) -> (Markup, bool) {
        let Some(field_type) = self.registry.get(&field_ref.type_id) else {
            tracing::warn!(
                field_id = %field_ref.id,
                type_id = %field_ref.type_id,
                "no field type registered, rendering placeholder"
            );
            stats.placeholders += 1;
            return (
                unavailable_placeholder(field_ref.id, &field_ref.type_id, address, mode),
                false,
            );
        };

        let settings = campaign.field_settings(field_ref.id);
        stats.fields += 1;

        let definition = field_type.definition();
        let view = SettingsView::new(settings, &definition.defaults);
        let ctx = RenderContext {
            campaign,
            field_id: field_ref.id,
            state,
            config: self.config,
            mode,
        };
        let mut content = field_type.render(&view, &ctx);
        if mode == RenderMode::Display {
            content = self
                .hooks
                .apply_display(&definition.type_id, content, &view, &ctx);
        }
        (
            wrap_field(content, definition, &view, field_ref.id, address, mode),
            true,
        )
    }

    /// Render a single placed field outside of a page walk, as returned to the
    /// builder after adding a block
    pub fn render_field(
        &self,
        campaign: &Campaign,
        field_id: FieldId,
        mode: RenderMode,
    ) -> Option<Markup> {
        let instance = campaign.field(field_id)?;
        let state = self.resolve_state(campaign, mode);
        let field_ref = FieldRef::new(instance.id, instance.type_id);
        let mut stats = RenderStats::default();
        Some(self.render_ref(&field_ref, None, campaign, &state, mode, &mut stats).0)
    }
}

fn drop_target(address: Option<&FieldAddress>) -> Element {
    let target = Element::new("div")
        .class("cb-drop-target")
        .text("Drag a block here");
    match address {
        Some(address) => target
            .data("row", address.row)
            .data("column", address.column)
            .data("section", address.section)
            .attr_opt("data-tab", address.tab),
        None => target,
    }
}
