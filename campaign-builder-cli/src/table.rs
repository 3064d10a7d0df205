//! Table output for the palette and type listings.

use campaign_builder::{FieldDefinition, PaletteEntry};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

pub fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(120);
    table
}

fn limit(max: Option<u32>) -> String {
    max.map_or_else(|| "-".to_string(), |max| max.to_string())
}

pub fn palette_table(entries: &[PaletteEntry]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Type", "Name", "Group", "Order", "Placed", "Max", "Addable"]);
    for entry in entries {
        table.add_row(vec![
            entry.type_id.clone(),
            entry.display_name.clone(),
            entry.group.as_str().to_string(),
            entry.default_order.to_string(),
            entry.count.to_string(),
            limit(entry.max_instances),
            if entry.add_disabled { "no" } else { "yes" }.to_string(),
        ]);
    }
    table
}

pub fn types_table(definitions: &[&FieldDefinition]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Type", "Name", "Group", "Max", "Min width", "Flags"]);
    for definition in definitions {
        let flags: Vec<&str> = [
            (!definition.editable, "fixed"),
            (!definition.deletable, "permanent"),
            (!definition.duplicable, "unique"),
        ]
        .into_iter()
        .filter_map(|(set, flag)| set.then_some(flag))
        .collect();
        table.add_row(vec![
            definition.type_id.clone(),
            definition.display_name.clone(),
            definition.group.as_str().to_string(),
            limit(definition.max_instances),
            format!("{}%", definition.min_width),
            flags.join(", "),
        ]);
    }
    table
}
