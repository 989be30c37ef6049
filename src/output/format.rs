//! Serialization of module records

use crate::output::markdown::format_markdown_report;
use crate::output::record::ModuleRecord;
use crate::output::OutputResult;
use clap::ValueEnum;

/// Export format for the inferred modules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Csv,
    Markdown,
}

const CSV_HEADER: [&str; 5] = [
    "module",
    "description",
    "submodule",
    "sub_description",
    "confidence",
];

fn render_csv(records: &[ModuleRecord]) -> OutputResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for record in records {
        let confidence = record.confidence.to_string();
        if record.submodules.is_empty() {
            writer.write_record([
                record.module.as_str(),
                record.description.as_str(),
                "",
                "",
                confidence.as_str(),
            ])?;
            continue;
        }
        for (name, description) in &record.submodules {
            writer.write_record([
                record.module.as_str(),
                record.description.as_str(),
                name.as_str(),
                description.as_str(),
                confidence.as_str(),
            ])?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Renders records in the requested format
pub fn render(records: &[ModuleRecord], format: OutputFormat) -> OutputResult<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(records)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Yaml => Ok(serde_yaml::to_string(records)?),
        OutputFormat::Csv => render_csv(records),
        OutputFormat::Markdown => Ok(format_markdown_report(records)),
    }
}
