use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use csvstash_cli::pipeline::{DetectResult, PrepareResult, invocation_hints};

pub fn print_summary(result: &PrepareResult) {
    let normalized = &result.normalized;
    let generated = &result.generated;

    let mut table = Table::new();
    table.set_header(vec![header_cell("Item"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    table.add_row(vec![
        label_cell("Source"),
        Cell::new(normalized.source.display()),
    ]);
    table.add_row(vec![
        label_cell("Detected encoding"),
        Cell::new(normalized.detected),
    ]);
    table.add_row(vec![
        label_cell("UTF-8 file"),
        if normalized.rewritten() {
            Cell::new(normalized.path.display()).fg(Color::Green)
        } else {
            dim_cell("(source reused)")
        },
    ]);
    table.add_row(vec![label_cell("Records"), Cell::new(normalized.records)]);
    table.add_row(vec![
        label_cell("Pipeline encoding"),
        Cell::new(generated.encoding),
    ]);
    table.add_row(vec![
        label_cell("Columns"),
        Cell::new(generated.columns.join(", ")),
    ]);
    table.add_row(vec![
        label_cell("Pipeline"),
        Cell::new(generated.path.display()).fg(Color::Green),
    ]);
    println!("{table}");

    let hints = invocation_hints(&generated.path);
    println!();
    println!("To run Logstash with this configuration, use the following command:");
    println!();
    println!("  WINDOWS: {}", hints.windows);
    println!("  LINUX: {}", hints.linux);
    println!();
    println!("... Done!");
}

pub fn print_detection(result: &DetectResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Detected"),
        header_cell("Sniffed"),
        header_cell("Records"),
    ]);
    apply_summary_table_style(&mut table);
    table.add_row(vec![
        Cell::new(result.path.display()),
        Cell::new(result.detected).fg(Color::Green),
        match result.sniffed {
            Some(sniffed) => Cell::new(sniffed),
            None => dim_cell("unknown"),
        },
        Cell::new(result.records),
    ]);
    println!("{table}");
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn label_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
