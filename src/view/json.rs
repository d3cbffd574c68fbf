use std::io::Write;

use serde::Serialize;

use crate::model::Report;

#[derive(Serialize)]
struct JsonReport<'a> {
    repository: &'a str,
    #[serde(flatten)]
    report: &'a Report,
}

/// Write the report as one pretty-printed JSON document
pub fn render(report: &Report, repo_name: &str, out: &mut impl Write) -> serde_json::Result<()> {
    let doc = JsonReport {
        repository: repo_name,
        report,
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out).map_err(serde_json::Error::io)
}
