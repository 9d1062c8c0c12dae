//! @ai:module:intent Format extraction results for different formats (JSON, text)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_extraction, format_project_report, to_json
//! @ai:module:depends_on annotation
//! @ai:module:stateless true

use crate::annotation::{AnnotationBlock, BlockStyle, Extraction, FileReport, ProjectReport, Warning};
use colored::Colorize;
use serde::Serialize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Format a project report as a string
/// @ai:effects pure
pub fn format_project_report(report: &ProjectReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(report, false),
        OutputFormat::JsonPretty => to_json(report, true),
        OutputFormat::Text => format_project_report_text(report),
    }
}

/// @ai:intent Format the result of extracting a single in-memory input
/// @ai:effects pure
pub fn format_extraction(extraction: &Extraction, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(extraction, false),
        OutputFormat::JsonPretty => to_json(extraction, true),
        OutputFormat::Text => {
            let mut output = String::new();
            for block in &extraction.blocks {
                push_block(&mut output, block, "");
            }
            for warning in &extraction.warnings {
                push_warning(&mut output, warning, "");
            }
            output
        }
    }
}

fn format_project_report_text(report: &ProjectReport) -> String {
    let mut output = String::new();

    for file in &report.files {
        if file.blocks.is_empty() && file.warnings.is_empty() {
            continue;
        }
        push_file(&mut output, file);
    }

    for failure in &report.failures {
        output.push_str(&format!(
            "{} {} - {}\n",
            "ERROR".red().bold(),
            failure.path.display().to_string().dimmed(),
            failure.message
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "Scanned {} files, found {} annotations\n",
        report.files.len(),
        report.total_blocks
    ));

    if !report.failures.is_empty() {
        output.push_str(&format!(
            "{} files failed, {} warnings\n",
            report.failures.len().to_string().red().bold(),
            report.total_warnings.to_string().yellow()
        ));
    } else if report.total_warnings > 0 {
        output.push_str(&format!(
            "{} {} warnings\n",
            "OK".green().bold(),
            report.total_warnings.to_string().yellow()
        ));
    } else {
        output.push_str(&format!("{} No warnings\n", "OK".green().bold()));
    }

    output
}

fn push_file(output: &mut String, file: &FileReport) {
    output.push_str(&format!(
        "{} ({})\n",
        file.path.display().to_string().bold(),
        file.language
    ));
    for block in &file.blocks {
        push_block(output, block, "  ");
    }
    for warning in &file.warnings {
        push_warning(output, warning, "  ");
    }
    output.push('\n');
}

fn push_block(output: &mut String, block: &AnnotationBlock, indent: &str) {
    let keyword = match block.keyword.as_str() {
        "FIXME" | "XXX" => block.keyword.red().bold(),
        "HACK" => block.keyword.yellow().bold(),
        "NOTE" => block.keyword.blue().bold(),
        _ => block.keyword.cyan().bold(),
    };
    let range = format!("{}-{}", block.start, block.end);

    match block.style {
        BlockStyle::SingleLine => {
            output.push_str(&format!(
                "{}{} {} {}\n",
                indent,
                range.dimmed(),
                keyword,
                block.payload.first().map(String::as_str).unwrap_or("")
            ));
        }
        BlockStyle::BracedMultiline | BlockStyle::NamedRegion => {
            output.push_str(&format!(
                "{}{} {} ({})\n",
                indent,
                range.dimmed(),
                keyword,
                block.style.as_str().dimmed()
            ));
            for line in &block.payload {
                output.push_str(&format!("{}    {}\n", indent, line));
            }
        }
    }
}

fn push_warning(output: &mut String, warning: &Warning, indent: &str) {
    output.push_str(&format!(
        "{}{} {} - {}\n",
        indent,
        "WARN".yellow().bold(),
        warning.location.to_string().dimmed(),
        warning.message
    ));
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}
