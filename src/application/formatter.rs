//! Output formatting for export and erase results.
//!
//! Supports multiple output formats: Markdown, JSON, and table view.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{EraseResult, ExportItem, ExportPage, ExportReport};

use super::registry::{in_registration_order, EraserRegistry, ExporterRegistry};

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable Markdown format.
    #[default]
    Markdown,
    /// JSON format for programmatic use.
    Json,
    /// Compact table listing.
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            _ => Err(format!("Unknown format: {s}. Use: markdown, json, table")),
        }
    }
}

/// Formats a full export report as Markdown.
pub fn format_report_markdown(report: &ExportReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Personal data export for {}\n\n", report.email));
    out.push_str(&format!(
        "**Generated:** {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("**Items:** {}\n\n", report.item_count()));
    out.push_str("---\n\n");

    for group in &report.groups {
        out.push_str(&format!(
            "## {} ({} item{}, {} page{})\n\n",
            group.friendly_name,
            group.items.len(),
            plural(group.items.len()),
            group.pages,
            plural(group.pages as usize)
        ));

        if group.items.is_empty() {
            out.push_str("*No personal data found.*\n\n");
            continue;
        }

        out.push_str(&format_items_markdown(&group.items));
    }

    out
}

/// Formats export items as Markdown sections.
pub fn format_items_markdown(items: &[ExportItem]) -> String {
    let mut out = String::new();

    for item in items {
        out.push_str(&format!("### {} ({})\n\n", item.group_label, item.item_id));
        for field in &item.data {
            out.push_str(&format!("- **{}:** {}\n", field.name, field.value));
        }
        out.push('\n');
    }

    out
}

/// Formats a single exporter page as Markdown.
pub fn format_page_markdown(page: &ExportPage) -> String {
    let mut out = format_items_markdown(&page.data);
    out.push_str(&format!("*done: {}*\n", page.done));
    out
}

/// Formats any serializable result as JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_json<T: serde::Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Formats export items as one table row per field.
pub fn format_items_table(items: &[ExportItem]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Group", "Item", "Field", "Value"]);

    for item in items {
        for field in &item.data {
            let value = truncate(&field.value, 60);
            table.add_row(vec![
                item.group_id.as_str(),
                item.item_id.as_str(),
                field.name.as_str(),
                value.as_str(),
            ]);
        }
    }

    table.to_string()
}

/// Formats a full export report as a table.
pub fn format_report_table(report: &ExportReport) -> String {
    let items: Vec<ExportItem> = report
        .groups
        .iter()
        .flat_map(|g| g.items.iter().cloned())
        .collect();
    format_items_table(&items)
}

/// Formats the registered exporters and erasers.
pub fn format_registry_table(exporters: &ExporterRegistry, erasers: &EraserRegistry) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Id", "Exporter", "Eraser"]);

    for (id, exporter) in in_registration_order(exporters) {
        let eraser = erasers.get(id).map_or("-", |e| e.friendly_name);
        table.add_row(vec![id, exporter.friendly_name, eraser]);
    }

    table.to_string()
}

/// Formats erase results for terminal display.
pub fn format_erase_results(results: &[EraseResult]) -> String {
    let mut out = String::new();

    for result in results {
        let status = if result.outcome.items_removed() {
            "removed".green()
        } else {
            "not implemented".yellow()
        };
        out.push_str(&format!(
            "{} [{}] {}\n    {}\n",
            result.friendly_name.bold(),
            status,
            result.eraser_id,
            result.outcome.message()
        ));
    }

    out
}

/// Formats a one-line summary of an export report.
pub fn format_summary(report: &ExportReport) -> String {
    let mut out = format!("{}", "📊 Export summary".bold());
    for group in &report.groups {
        out.push_str(&format!(
            "\n  {}: {} item(s)",
            group.friendly_name,
            group.items.len().to_string().cyan()
        ));
    }
    out
}

const fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Truncates a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExportField, ExportGroup};
    use chrono::Utc;

    fn sample_report() -> ExportReport {
        ExportReport {
            email: "a@x.com".into(),
            generated_at: Utc::now(),
            groups: vec![
                ExportGroup {
                    exporter_id: "wcb_speaker".into(),
                    friendly_name: "WordCamp Speaker Data".into(),
                    pages: 1,
                    items: vec![ExportItem {
                        group_id: "wcb_speaker".into(),
                        group_label: "WordCamp Speakers".into(),
                        item_id: "wcb_speaker-3".into(),
                        data: vec![ExportField {
                            name: "Speaker Name".into(),
                            value: "Jane".into(),
                        }],
                    }],
                },
                ExportGroup {
                    exporter_id: "wcb_sponsor".into(),
                    friendly_name: "WordCamp Sponsor Data".into(),
                    pages: 1,
                    items: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world!", 8), "hello...");
        assert_eq!(truncate("first\nsecond", 20), "first");
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!(
            "markdown".parse::<OutputFormat>(),
            Ok(OutputFormat::Markdown)
        ));
        assert!(matches!(
            "json".parse::<OutputFormat>(),
            Ok(OutputFormat::Json)
        ));
        assert!(matches!(
            "table".parse::<OutputFormat>(),
            Ok(OutputFormat::Table)
        ));
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_report_markdown() {
        let md = format_report_markdown(&sample_report());
        assert!(md.contains("# Personal data export for a@x.com"));
        assert!(md.contains("## WordCamp Speaker Data (1 item, 1 page)"));
        assert!(md.contains("- **Speaker Name:** Jane"));
        assert!(md.contains("*No personal data found.*"));
    }

    #[test]
    fn test_report_json() {
        let json = format_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["groups"][0]["items"][0]["item_id"], "wcb_speaker-3");
    }

    #[test]
    fn test_report_table_lists_fields() {
        let table = format_report_table(&sample_report());
        assert!(table.contains("wcb_speaker-3"));
        assert!(table.contains("Speaker Name"));
    }
}
