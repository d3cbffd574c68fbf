use std::io::{self, Write};

use crate::model::{Report, SizeRecord, TopTable};

use super::table::Table;

const SIZE_COLUMNS: [&str; 4] = ["Count", "Disk Size", "Inflated Size", "Missing"];

/// Write the full survey report as plain-text tables
pub fn render(report: &Report, repo_name: &str, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "SURVEY for \"{repo_name}\"")?;
    writeln!(out, "{}", "-".repeat(53))?;

    refs_table(report).write_to(out)?;
    reachable_table(report).write_to(out)?;
    size_table("TOTAL OBJECT SIZES BY TYPE", "Object Type", &report.totals).write_to(out)?;

    for top in report.top_tables() {
        top_table(top).write_to(out)?;
    }
    Ok(())
}

/// Only the kinds the survey was asked about get a row
fn refs_table(report: &Report) -> Table {
    let refs = &report.refs;
    let selection = &report.selection;
    let mut table = Table::new("REFERENCES SUMMARY", ["Ref Type", "Count"]);

    if selection.wants_branches() {
        table.row(["Branches".to_owned(), refs.branches_nr.to_string()]);
    }
    if selection.wants_remotes() {
        table.row(["Remote refs".to_owned(), refs.remote_refs_nr.to_string()]);
    }
    if selection.wants_tags() {
        table.row(["Tags (all)".to_owned(), refs.tags_nr.to_string()]);
        table.row(["Tags (annotated)".to_owned(), refs.tags_annotated_nr.to_string()]);
    }
    table
}

fn reachable_table(report: &Report) -> Table {
    let objects = &report.reachable;
    let mut table = Table::new("REACHABLE OBJECT SUMMARY", ["Object Type", "Count"]);
    table
        .row(["Tags".to_owned(), objects.tags_nr.to_string()])
        .row(["Commits".to_owned(), objects.commits_nr.to_string()])
        .row(["Trees".to_owned(), objects.trees_nr.to_string()])
        .row(["Blobs".to_owned(), objects.blobs_nr.to_string()]);
    table
}

fn top_table(top: &TopTable) -> Table {
    size_table(top.name(), "Path", top.entries())
}

fn size_table(title: &str, category: &str, records: &[SizeRecord]) -> Table {
    let header = std::iter::once(category).chain(SIZE_COLUMNS);
    let mut table = Table::new(title, header);
    for record in records {
        let tally = &record.tally;
        table.row([
            record.label.clone(),
            tally.count.to_string(),
            tally.disk_size.to_string(),
            tally.inflated_size.to_string(),
            tally.missing_count.to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectKind, RefSelection, SizeTally};

    fn render_to_string(report: &Report) -> String {
        let mut out = Vec::new();
        render(report, "/tmp/repo", &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_section_order() {
        let report = Report::new(RefSelection::all_namespaces(), 3);
        let text = render_to_string(&report);

        assert!(text.starts_with("SURVEY for \"/tmp/repo\"\n"));
        let titles = [
            "REFERENCES SUMMARY",
            "REACHABLE OBJECT SUMMARY",
            "TOTAL OBJECT SIZES BY TYPE",
            "TOP DIRECTORIES BY COUNT",
            "TOP FILES BY COUNT",
            "TOP DIRECTORIES BY DISK SIZE",
            "TOP FILES BY DISK SIZE",
            "TOP DIRECTORIES BY INFLATED SIZE",
            "TOP FILES BY INFLATED SIZE",
        ];
        let positions: Vec<usize> = titles.iter().map(|t| text.find(t).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_refs_rows_follow_selection() {
        let selection = RefSelection {
            tags: true,
            ..RefSelection::default()
        };
        let table = refs_table(&Report::new(selection, 3));

        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Tags (all)"));
        assert!(text.contains("Tags (annotated)"));
        assert!(!text.contains("Branches"));
        assert!(!text.contains("Remote refs"));
    }

    #[test]
    fn test_totals_show_missing() {
        let mut report = Report::new(RefSelection::all_namespaces(), 3);
        let mut tally = SizeTally::default();
        tally.add_present(40, 100);
        tally.add_missing();
        report.total_mut(ObjectKind::Blob).merge(&tally);

        let text = render_to_string(&report);
        let blobs_row = text
            .lines()
            .find(|line| line.trim_start().starts_with("Blobs |") && line.matches('|').count() == 4)
            .unwrap();
        let cells: Vec<&str> = blobs_row.split('|').map(str::trim).collect();
        assert_eq!(cells, vec!["Blobs", "1", "40", "100", "1"]);
    }
}
