//! Page composition over whole campaign documents

use campaign_builder::{
    BuilderContext, Campaign, CampaignId, CampaignState, RenderMode, StaticStateProvider,
};
use campaign_builder_config::BuilderConfig;
use serde_json::json;
use tracing_test::traced_test;

fn campaign(doc: serde_json::Value) -> Campaign {
    serde_json::from_value(doc).unwrap()
}

fn two_column_campaign() -> Campaign {
    campaign(json!({
        "id": 0,
        "title": "Clean water for Kisumu",
        "settings": { "general": { "goal": 1000 } },
        "fields": {
            "0": {},
            "1": { "headline": "Why it matters", "content": "<p>Every <b>drop</b> counts</p>" },
            "2": {}
        },
        "layout": [
            {
                "type": "header",
                "columns": [
                    { "sections": [ { "type": "header", "fields": [ { "id": 0, "type": "campaign-title" } ] } ] }
                ]
            },
            {
                "type": "row",
                "columns": [
                    { "sections": [ { "type": "fields", "fields": [ { "id": 1, "type": "text" } ] } ] },
                    { "sections": [ { "type": "fields", "fields": [ { "id": 2, "type": "progress-bar" } ] } ] }
                ]
            }
        ]
    }))
}

#[test]
fn rendering_is_deterministic() {
    let ctx = BuilderContext::new(BuilderConfig::default());
    let campaign = two_column_campaign();

    for mode in [RenderMode::Preview, RenderMode::Display] {
        let first = ctx.render_page(&campaign, mode);
        let second = ctx.render_page(&campaign, mode);
        assert_eq!(first, second);
    }
}

#[test]
fn walk_assigns_addresses_in_order() {
    let ctx = BuilderContext::new(BuilderConfig::default());
    let page = ctx.render_page(&two_column_campaign(), RenderMode::Preview);
    let html = page.html.as_str();

    assert!(html.contains("cb-page-preview"));
    assert!(html.contains("cb-row-header"));
    assert!(html.contains("cb-columns-2"));
    assert!(html.contains("data-row=\"2\" data-column=\"3\" data-section=\"3\""));
    assert!(html.find("Clean water for Kisumu").unwrap() < html.find("Why it matters").unwrap());
    assert!(html.contains("<b>drop</b>"));

    assert_eq!(page.stats.rows, 2);
    assert_eq!(page.stats.columns, 3);
    assert_eq!(page.stats.sections, 3);
    assert_eq!(page.stats.fields, 3);
    assert_eq!(page.stats.placeholders, 0);
}

#[test]
fn unknown_type_renders_placeholder() {
    let ctx = BuilderContext::new(BuilderConfig::default());
    let doc = campaign(json!({
        "title": "x",
        "fields": { "0": {}, "1": { "headline": "Still here" } },
        "layout": [ { "columns": [ { "sections": [ { "type": "fields", "fields": [
            { "id": 0, "type": "carousel" },
            { "id": 1, "type": "text" }
        ] } ] } ] } ]
    }));

    let preview = ctx.render_page(&doc, RenderMode::Preview);
    assert!(preview.html.contains("cb-field-unavailable"));
    assert!(preview.html.contains("This block (carousel) is not available."));
    assert!(preview.html.contains("Still here"));
    assert_eq!(preview.stats.placeholders, 1);
    assert_eq!(preview.stats.fields, 1);

    let display = ctx.render_page(&doc, RenderMode::Display);
    assert!(display.html.contains("cb-field-unavailable"));
    assert!(!display.html.contains("not available"));
    assert!(display.html.contains("Still here"));
}

#[test]
#[traced_test]
fn placeholder_substitution_is_logged() {
    let ctx = BuilderContext::new(BuilderConfig::default());
    let doc = campaign(json!({
        "title": "x",
        "fields": { "0": {} },
        "layout": [ { "columns": [ { "sections": [ { "type": "fields", "fields": [
            { "id": 0, "type": "countdown" }
        ] } ] } ] } ]
    }));

    ctx.render_page(&doc, RenderMode::Display);
    assert!(logs_contain("no field type registered"));
    assert!(logs_contain("countdown"));
}

#[test]
fn empty_settings_fall_back_to_type_defaults() {
    let ctx = BuilderContext::new(BuilderConfig::default());
    let doc = campaign(json!({
        "title": "x",
        "fields": { "4": {} },
        "layout": [ { "columns": [ { "sections": [ { "type": "fields", "fields": [
            { "id": 4, "type": "donate-button" }
        ] } ] } ] } ]
    }));

    let page = ctx.render_page(&doc, RenderMode::Display);
    assert!(page.html.contains("Donate Now"));
    assert_eq!(page.stats.fields, 1);
}

#[test]
fn references_without_settings_are_skipped() {
    let ctx = BuilderContext::new(BuilderConfig::default());
    let doc = campaign(json!({
        "title": "x",
        "fields": { "1": { "headline": "Still here" } },
        "layout": [ { "columns": [ { "sections": [ { "type": "fields", "fields": [
            { "id": 4, "type": "donate-button" },
            { "id": 1, "type": "text" }
        ] } ] } ] } ]
    }));

    let display = ctx.render_page(&doc, RenderMode::Display);
    assert!(!display.html.contains("Donate Now"));
    assert!(display.html.contains("Still here"));
    assert_eq!(display.stats.fields, 1);
    assert_eq!(display.stats.dangling, 1);

    let preview = ctx.render_page(&doc, RenderMode::Preview);
    assert!(preview.html.contains("has no saved settings"));
    assert!(!preview.html.contains("Donate Now"));
}

#[test]
fn empty_sections_get_drop_targets_in_preview_only() {
    let ctx = BuilderContext::new(BuilderConfig::default());
    let doc = campaign(json!({
        "title": "x",
        "layout": [ { "columns": [
            { "sections": [ { "type": "fields", "fields": [] } ] },
            { "sections": [ { "type": "fields", "fields": [ { "id": 0, "type": "gone" } ] } ] }
        ] } ]
    }));

    let preview = ctx.render_page(&doc, RenderMode::Preview);
    assert_eq!(preview.html.as_str().matches("cb-drop-target").count(), 2);
    assert_eq!(preview.stats.empty_sections, 2);

    let display = ctx.render_page(&doc, RenderMode::Display);
    assert!(!display.html.contains("cb-drop-target"));

    let blank = ctx.render_page(&Campaign::new("blank"), RenderMode::Preview);
    assert!(blank.html.contains("Drag a block here"));
}

#[test]
fn empty_tabs_section_gets_one_drop_target() {
    let ctx = BuilderContext::new(BuilderConfig::default());
    for tabs in [json!([]), json!([ { "title": "A" }, { "title": "B" } ])] {
        let doc = campaign(json!({
            "title": "x",
            "layout": [ { "type": "tabs", "columns": [ { "sections": [
                { "type": "tabs", "tabs": tabs }
            ] } ] } ]
        }));

        let preview = ctx.render_page(&doc, RenderMode::Preview);
        assert_eq!(preview.stats.empty_sections, 1);
        assert_eq!(preview.html.as_str().matches("cb-drop-target").count(), 1);
        assert!(preview.html.contains("data-section=\"1\""));

        let display = ctx.render_page(&doc, RenderMode::Display);
        assert_eq!(display.stats.empty_sections, 1);
        assert!(!display.html.contains("cb-drop-target"));
    }
}

#[test]
fn deeply_nested_description_renders() {
    let ctx = BuilderContext::new(BuilderConfig::default());
    let mut doc = campaign(json!({
        "title": "x",
        "fields": { "0": {} },
        "layout": [ { "columns": [ { "sections": [ { "type": "fields", "fields": [
            { "id": 0, "type": "campaign-description" }
        ] } ] } ] } ]
    }));
    doc.settings.general.description = format!("{}Bottom of the well", "<span>".repeat(20_000));

    for mode in [RenderMode::Preview, RenderMode::Display] {
        let page = ctx.render_page(&doc, mode);
        assert_eq!(page.stats.fields, 1);
        assert!(page.html.contains("Bottom of the well"));
    }
}

#[test]
fn tabs_render_navigation_and_panes() {
    let ctx = BuilderContext::new(BuilderConfig::default());
    let doc = campaign(json!({
        "title": "x",
        "fields": { "0": { "headline": "Story" }, "1": { "headline": "Updates" } },
        "layout": [ { "type": "tabs", "columns": [ { "sections": [ { "type": "tabs", "tabs": [
            { "title": "About", "fields": [ { "id": 0, "type": "text" } ] },
            { "title": "", "fields": [ { "id": 1, "type": "text" } ] }
        ] } ] } ] } ]
    }));

    let html = ctx.render_page(&doc, RenderMode::Display).html.into_string();
    assert!(html.contains("cb-tab-nav"));
    assert!(html.contains("href=\"#cb-tab-1-1\""));
    assert!(html.contains(">About</a>"));
    assert!(html.contains(">Tab 2</a>"));
    assert!(html.contains("id=\"cb-tab-1-2\""));
    assert!(html.contains("data-tab=\"2\""));
    assert_eq!(html.matches("cb-tab-pane").count(), 2);
}

#[test]
fn saved_campaign_uses_provider_state() {
    let state = CampaignState {
        donated: 750.0,
        goal: 0.0,
        donor_count: 12,
        ..CampaignState::default()
    };
    let ctx = BuilderContext::new(BuilderConfig::default())
        .with_state_provider(StaticStateProvider::new().with_state(CampaignId(3), state));
    let mut doc = two_column_campaign();
    doc.id = CampaignId(3);

    // Provider has no goal, so the campaign's own goal of 1000 fills in.
    let html = ctx.render_page(&doc, RenderMode::Display).html.into_string();
    assert!(html.contains("$750 raised"));
    assert!(html.contains("of $1,000 goal"));
    assert!(html.contains("width: 75%;"));
}

#[test]
fn unsaved_campaign_display_is_zeroed() {
    let ctx = BuilderContext::new(BuilderConfig::default());
    let html = ctx
        .render_page(&two_column_campaign(), RenderMode::Display)
        .html
        .into_string();
    assert!(html.contains("$0 raised"));
    assert!(html.contains("of $1,000 goal"));

    let preview = ctx
        .render_page(&two_column_campaign(), RenderMode::Preview)
        .html
        .into_string();
    assert!(preview.contains("$500 raised"));
}
