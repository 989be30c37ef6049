//! Markdown report generation
//!
//! A human-readable view of the inferred modules: one section per module
//! with its description, confidence and submodules.

use crate::output::record::ModuleRecord;

/// Formats module records as a markdown report
///
/// # Arguments
///
/// * `records` - Module records in output order
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(records: &[ModuleRecord]) -> String {
    let mut md = String::new();

    md.push_str("# Documentation Modules\n\n");

    let submodule_total: usize = records.iter().map(|r| r.submodules.len()).sum();
    md.push_str(&format!("- **Modules**: {}\n", records.len()));
    md.push_str(&format!("- **Submodules**: {}\n\n", submodule_total));

    if records.is_empty() {
        md.push_str("_No modules were inferred._\n");
        return md;
    }

    for record in records {
        md.push_str(&format!("## {}\n\n", record.module));
        md.push_str(&format!("{}\n\n", record.description));
        md.push_str(&format!("**Confidence**: {:.3}\n\n", record.confidence));

        if !record.submodules.is_empty() {
            md.push_str("### Submodules\n\n");
            for (name, description) in &record.submodules {
                md.push_str(&format!("- **{}**: {}\n", name, description));
            }
            md.push('\n');
        }
    }

    md
}
