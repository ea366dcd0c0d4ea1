//! Preparation summary rendered as a terminal table

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{Partition, PipelineDiagnostics};

/// Build the summary table for one pipeline run
pub fn summary_table(diag: &PipelineDiagnostics) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![Cell::new("📁 Rows loaded"), Cell::new(diag.rows_loaded)]);

    let removed = diag.duplicates_removed + diag.missing_target_removed;
    table.add_row(vec![
        Cell::new("🗑️  Rows removed (dup / no target)"),
        Cell::new(format!(
            "{} / {}",
            diag.duplicates_removed, diag.missing_target_removed
        ))
        .fg(if removed == 0 { Color::White } else { Color::Red }),
    ]);

    table.add_row(vec![
        Cell::new("🔤 Categorical columns"),
        Cell::new(diag.categorical_columns.len()),
    ]);
    table.add_row(vec![
        Cell::new("🔢 Numeric columns"),
        Cell::new(diag.numeric_columns.len()),
    ]);
    table.add_row(vec![
        Cell::new("✂️  Columns with collapsed levels"),
        Cell::new(diag.collapsed.len()).fg(if diag.collapsed.is_empty() {
            Color::White
        } else {
            Color::Yellow
        }),
    ]);
    table.add_row(vec![
        Cell::new("🧮 Encoded features"),
        Cell::new(diag.n_features)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);

    for partition in Partition::ALL {
        let (rows, cols) = *diag.shapes.get(partition);
        table.add_row(vec![
            Cell::new(format!("📐 Shape ({})", partition)),
            Cell::new(format!("{} × {}", rows, cols)),
        ]);
    }

    if let Some(prevalence) = &diag.prevalence {
        for partition in Partition::ALL {
            table.add_row(vec![
                Cell::new(format!("⚖️  Prevalence ({})", partition)),
                Cell::new(format!("{:.3}", prevalence.get(partition))).fg(Color::Cyan),
            ]);
        }
    }

    if let Some(summary) = &diag.target_summary {
        table.add_row(vec![
            Cell::new(format!("🎯 {} (train mean ± std)", diag.target)),
            Cell::new(format!("{:.2} ± {:.2}", summary.mean, summary.std)).fg(Color::Cyan),
        ]);
        table.add_row(vec![
            Cell::new(format!("🎯 {} (min / median / max)", diag.target)),
            Cell::new(format!(
                "{:.2} / {:.2} / {:.2}",
                summary.min, summary.median, summary.max
            ))
            .fg(Color::Cyan),
        ]);
    }

    table
}

/// Print the summary table followed by column and collapse details
pub fn display_summary(diag: &PipelineDiagnostics) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style(format!("PREPARATION SUMMARY ({})", diag.dataset.to_uppercase()))
            .white()
            .bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    // Indent the table
    for line in summary_table(diag).to_string().lines() {
        println!("    {}", line);
    }

    println!();
    print_list("Categorical columns", &diag.categorical_columns);
    print_list("Numeric columns", &diag.numeric_columns);
    if !diag.unsupported_columns.is_empty() {
        print_list("Unsupported columns (not encoded)", &diag.unsupported_columns);
    }

    let mut removed = diag.identifier_columns_dropped.clone();
    removed.extend(diag.leakage_columns_dropped.iter().cloned());
    if !removed.is_empty() {
        print_list("Identifier / leakage columns removed", &removed);
    }

    if !diag.collapsed.is_empty() {
        println!();
        println!(
            "      {} {}:",
            style("Collapsed into \"Other\"").yellow(),
            style(format!("({})", diag.collapsed.len())).dim()
        );
        for entry in &diag.collapsed {
            println!(
                "        {} {}: {} level(s), {} row(s)",
                style("•").dim(),
                entry.column,
                entry.collapsed_levels.len(),
                entry.rows_relabelled
            );
        }
    }
}

fn print_list(title: &str, items: &[String]) {
    println!(
        "      {} {}:",
        style(title).yellow(),
        style(format!("({})", items.len())).dim()
    );
    if items.is_empty() {
        println!("        {}", style("none").dim());
    }
    for item in items {
        println!("        {} {}", style("•").dim(), item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Partitioned;

    fn diagnostics() -> PipelineDiagnostics {
        PipelineDiagnostics {
            dataset: "job".to_string(),
            target: "status".to_string(),
            rows_loaded: 10,
            duplicates_removed: 1,
            missing_target_removed: 0,
            identifier_columns_dropped: vec!["sl_no".to_string()],
            leakage_columns_dropped: vec!["salary".to_string()],
            leakage_columns_absent: Vec::new(),
            categorical_columns: vec!["gender".to_string()],
            numeric_columns: vec!["ssc_p".to_string()],
            unsupported_columns: Vec::new(),
            collapsed: Vec::new(),
            n_features: 3,
            shapes: Partitioned {
                train: (6, 3),
                tune: (2, 3),
                test: (2, 3),
            },
            train_prevalence: Some(0.5),
            prevalence: Some(Partitioned {
                train: 0.5,
                tune: 0.5,
                test: 0.5,
            }),
            target_summary: None,
        }
    }

    #[test]
    fn test_summary_table_includes_shapes_and_prevalence() {
        let rendered = summary_table(&diagnostics()).to_string();
        assert!(rendered.contains("6 × 3"));
        assert!(rendered.contains("Prevalence (train)"));
        assert!(rendered.contains("0.500"));
    }
}
