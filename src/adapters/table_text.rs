//! Plain-text rendering of the four matrix tables for terminal output.

use std::fmt::Write;

use crate::domain::classification::classify_all;
use crate::domain::dataset::Dataset;

pub struct TextStyle {
    pub decimals: usize,
    pub show_icons: bool,
}

pub fn render_matrix(dataset: &Dataset, style: &TextStyle) -> String {
    let mut output = String::new();
    output.push_str(&render_sales(dataset, style));
    output.push('\n');
    output.push_str(&render_growth(dataset, style));
    output.push('\n');
    output.push_str(&render_competitors(dataset, style));
    output.push('\n');
    output.push_str(&render_bcg(dataset, style));
    output
}

pub fn render_sales(dataset: &Dataset, style: &TextStyle) -> String {
    let d = style.decimals;
    let total = dataset.total_sales();
    let mut out = String::from("== Sales Forecast ==\n");
    let _ = writeln!(out, "{:<14} {:<24} {:>14} {:>9}", "ID", "Product", "Sales", "Share");
    for p in dataset.products() {
        let share = if total > 0.0 { p.sales / total * 100.0 } else { 0.0 };
        let _ = writeln!(
            out,
            "{:<14} {:<24} {:>14.d$} {:>8.d$}%",
            p.id, p.name, p.sales, share
        );
    }
    let _ = writeln!(out, "{:<14} {:<24} {:>14.d$}", "", "Total", total);
    out
}

pub fn render_growth(dataset: &Dataset, style: &TextStyle) -> String {
    let d = style.decimals;
    let mut out = String::from("== Market Growth Rates (%) ==\n");
    if dataset.periods().is_empty() {
        out.push_str("(no periods)\n");
        return out;
    }
    let _ = write!(out, "{:<14} {:<16}", "ID", "Period");
    for p in dataset.products() {
        let _ = write!(out, " {:>12}", truncate(&p.name, 12));
    }
    out.push('\n');
    for period in dataset.periods() {
        let _ = write!(out, "{:<14} {:<16}", period.id, truncate(&period.name, 16));
        for p in dataset.products() {
            let value = period.value_for(p.id).unwrap_or(0.0);
            let _ = write!(out, " {:>12.d$}", value);
        }
        out.push('\n');
    }
    out
}

pub fn render_competitors(dataset: &Dataset, style: &TextStyle) -> String {
    let d = style.decimals;
    let mut out = String::from("== Competitor Sales ==\n");
    for entry in &dataset.competitor_sales.products {
        let _ = writeln!(
            out,
            "{} (max {:.d$})",
            dataset.product_name(entry.product_id),
            entry.max_competitor_sales
        );
        let cells: Vec<String> = entry
            .competitors
            .iter()
            .map(|c| format!("{}={:.d$}", c.name, c.sales))
            .collect();
        let _ = writeln!(out, "  {}", cells.join("  "));
    }
    out
}

pub fn render_bcg(dataset: &Dataset, style: &TextStyle) -> String {
    let d = style.decimals;
    let mut out = String::from("== BCG Table ==\n");
    let _ = writeln!(
        out,
        "{:<24} {:>10} {:>10} {:>10}  {}",
        "Product", "TCM", "PRM", "% S/VTAS", "Category"
    );
    for row in classify_all(dataset) {
        let category = if style.show_icons {
            format!("{} {}", row.classification.icon, row.classification.category)
        } else {
            row.classification.category.to_string()
        };
        let _ = writeln!(
            out,
            "{:<24} {:>10.d$} {:>10.d$} {:>9.d$}%  {}",
            truncate(&row.name, 24),
            row.metric.tcm,
            row.metric.prm,
            row.metric.sales_percentage,
            category
        );
    }
    out
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        s.chars().take(width).collect()
    }
}
