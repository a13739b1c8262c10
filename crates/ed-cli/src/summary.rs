use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ed_transform::{CohortOutput, LinkReport, OutlierReport};

pub fn print_summary(cohort: &CohortOutput, output: Option<&Path>) {
    match output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }
    print_link_table(&cohort.link, cohort.observation_excluded);
    print_cohort_table(cohort);
    print_outlier_table(&cohort.outliers);
    if cohort.summary.is_empty {
        eprintln!("warning: cohort is empty");
    }
}

fn print_link_table(link: &LinkReport, observation_excluded: usize) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Rows")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("ED stays"), Cell::new(link.ed_stays)]);
    table.add_row(vec![Cell::new("with triage"), Cell::new(link.after_triage)]);
    let admissions = Cell::new(link.after_admissions);
    table.add_row(vec![
        Cell::new("with admissions"),
        if link.fanned_out() {
            admissions.fg(Color::Yellow)
        } else {
            admissions
        },
    ]);
    table.add_row(vec![Cell::new("with patients"), Cell::new(link.after_patients)]);
    table.add_row(vec![
        Cell::new("duplicate stays removed"),
        count_cell(link.duplicates_removed, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("observation admissions removed"),
        count_cell(observation_excluded, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("visits").add_attribute(Attribute::Bold),
        Cell::new(link.visits).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn print_cohort_table(cohort: &CohortOutput) {
    let summary = &cohort.summary;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Label"),
        header_cell("Visits"),
        header_cell("Patients"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("admitted (y = 1)"),
        Cell::new(summary.admitted),
        Cell::new(summary.patients_admitted),
    ]);
    table.add_row(vec![
        Cell::new("not admitted (y = 0)"),
        Cell::new(summary.not_admitted),
        Cell::new(summary.patients_not_admitted),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    println!(
        "Case rate: {:.1}% ({} columns)",
        summary.case_rate * 100.0,
        cohort.frame.width()
    );
}

fn print_outlier_table(outliers: &OutlierReport) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Vital sign"), header_cell("Values nulled")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (column, removed) in &outliers.removed {
        table.add_row(vec![Cell::new(column), count_cell(*removed, Color::Yellow)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(outliers.total()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
