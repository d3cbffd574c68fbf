//! Plain-text tables
//!
//! Columns are right-aligned and separated by ` | `, with a `-+-` divider
//! under the header and a `=` rule under the title.

use std::io::{self, Write};

/// Widest the title rule gets, whatever the table width
pub const MAX_RULE_WIDTH: usize = 160;

pub struct Table {
    title: String,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(
        title: impl Into<String>,
        header: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            title: title.into(),
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells are rendered empty, extra cells dropped.
    pub fn row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) -> &mut Self {
        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        cells.resize(self.header.len(), String::new());
        self.rows.push(cells);
        self
    }

    fn widths(&self) -> Vec<usize> {
        self.header
            .iter()
            .enumerate()
            .map(|(i, name)| {
                self.rows
                    .iter()
                    .map(|row| width_of(&row[i]))
                    .fold(width_of(name), usize::max)
            })
            .collect()
    }

    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let widths = self.widths();

        let content_width = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
        let rule_width = content_width
            .max(width_of(&self.title))
            .min(MAX_RULE_WIDTH);
        writeln!(out)?;
        writeln!(out, "{}", self.title)?;
        writeln!(out, "{}", "=".repeat(rule_width))?;

        write_row(out, &self.header, &widths)?;
        let divider: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(out, "{}", divider.join("-+-"))?;

        for row in &self.rows {
            write_row(out, row, &widths)?;
        }
        Ok(())
    }
}

fn width_of(s: &str) -> usize {
    s.chars().count()
}

fn write_row(out: &mut impl Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:>width$}"))
        .collect();
    writeln!(out, "{}", line.join(" | "))
}
