//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Lists use `tabled`,
//! single resources use a `Key: value` detail view, structured formats use
//! serde, plain emits one identifier per line.

use std::fmt::Display;
use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(Table::new(rows).with(Style::rounded()).to_string())
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputFormat::Plain => Ok(data.iter().map(id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Status line on stderr, so stdout stays machine-readable.
pub fn print_status(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

// ── Detail views ─────────────────────────────────────────────────────

/// Builder for `Key: value` detail text with indented sections.
#[derive(Debug, Default)]
pub struct Detail {
    lines: Vec<String>,
    indent: usize,
}

impl Detail {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Key: value`, or `Key: -` when the value is missing.
    pub fn field(mut self, key: &str, value: Option<impl Display>) -> Self {
        let value = value.map_or_else(|| "-".to_owned(), |v| v.to_string());
        self.lines
            .push(format!("{:indent$}{key}: {value}", "", indent = self.indent));
        self
    }

    /// A `Title:` header; later fields are indented until `end_section`.
    pub fn section(mut self, title: &str) -> Self {
        self.lines
            .push(format!("{:indent$}{title}:", "", indent = self.indent));
        self.indent += 2;
        self
    }

    pub fn end_section(mut self) -> Self {
        self.indent = self.indent.saturating_sub(2);
        self
    }

    /// One indented line per item.
    pub fn items<S: AsRef<str>>(mut self, items: &[S]) -> Self {
        for item in items {
            self.lines
                .push(format!("{:indent$}{}", "", item.as_ref(), indent = self.indent));
        }
        self
    }

    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

/// Table cell text, empty when the value is missing.
pub fn cell(value: Option<impl Display>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn detail_view_indents_sections() {
        let text = Detail::new()
            .field("Model", Some("iLO 5"))
            .field("Serial number", None::<&str>)
            .section("Name servers")
            .items(&["1.1.1.1", "8.8.8.8"])
            .end_section()
            .field("Health", Some("OK"))
            .build();
        assert_eq!(
            text,
            "Model: iLO 5\nSerial number: -\nName servers:\n  1.1.1.1\n  8.8.8.8\nHealth: OK"
        );
    }

    #[test]
    fn structured_formats_serialize_data() {
        let data = serde_json::json!({"Id": "1"});
        let json = render_single(
            OutputFormat::JsonCompact,
            &data,
            |_| String::new(),
            |_| String::new(),
        )
        .unwrap();
        assert_eq!(json, r#"{"Id":"1"}"#);
        let plain = render_single(
            OutputFormat::Plain,
            &data,
            |_| String::new(),
            |d| d["Id"].to_string(),
        )
        .unwrap();
        assert_eq!(plain, "\"1\"");
    }
}
