//! Panels, tables and the paginated log viewer.

use serde::Serialize;

use super::CliError;
use super::console::Console;
use crate::export::{CsvRecord, records_to_csv};

/// Log rows shown per page.
pub(super) const PAGE_SIZE: usize = 10;

/// Widest cell printed in a table; longer values are cut with `...`.
const MAX_CELL_CHARS: usize = 40;

pub(super) fn panel<S: AsRef<str>>(
    console: &mut dyn Console,
    title: &str,
    lines: &[S],
) -> Result<(), CliError> {
    let width = lines
        .iter()
        .map(|line| line.as_ref().chars().count())
        .chain([title.chars().count()])
        .max()
        .unwrap_or(0)
        + 2;
    let rule = "=".repeat(width);

    console.write_line("")?;
    console.write_line(&rule)?;
    console.write_line(&format!(" {title}"))?;
    console.write_line(&rule)?;
    for line in lines {
        console.write_line(&format!(" {}", line.as_ref()))?;
    }
    console.write_line(&rule)?;
    Ok(())
}

/// Aligned columns with a header underline. Prints a note instead when `rows` is empty.
pub(super) fn table(
    console: &mut dyn Console,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<(), CliError> {
    if rows.is_empty() {
        console.write_line("No records found.")?;
        return Ok(());
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| clip(cell)).collect())
        .collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    console.write_line(&pad_row(headers.iter().copied(), &widths))?;
    console.write_line(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    )?;
    for row in &cells {
        console.write_line(&pad_row(row.iter().map(String::as_str), &widths))?;
    }
    Ok(())
}

fn pad_row<'a>(fields: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    fields
        .zip(widths.iter().copied())
        .map(|(field, width)| format!("{field:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_owned()
}

fn clip(value: &str) -> String {
    let single_line = value.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= MAX_CELL_CHARS {
        return single_line;
    }
    let cut: String = single_line.chars().take(MAX_CELL_CHARS - 3).collect();
    format!("{cut}...")
}

/// Page cursor over `total` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Pager {
    total: usize,
    page: usize,
}

impl Pager {
    pub(super) fn new(total: usize) -> Self {
        Self { total, page: 0 }
    }

    pub(super) fn pages(&self) -> usize {
        self.total.div_ceil(PAGE_SIZE).max(1)
    }

    /// Zero-based page index.
    pub(super) fn page(&self) -> usize {
        self.page
    }

    pub(super) fn range(&self) -> std::ops::Range<usize> {
        let start = self.page * PAGE_SIZE;
        start.min(self.total)..(start + PAGE_SIZE).min(self.total)
    }

    /// Returns false when already on the last page.
    pub(super) fn next_page(&mut self) -> bool {
        if self.page + 1 < self.pages() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub(super) fn prev_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }
}

/// Page through `records` ten at a time; `j` and `c` print the full set as JSON or CSV.
pub(super) async fn browse<T>(
    console: &mut dyn Console,
    title: &str,
    records: &[T],
) -> Result<(), CliError>
where
    T: CsvRecord + Serialize,
{
    if records.is_empty() {
        panel(console, title, &["No records found."])?;
        return Ok(());
    }

    let mut pager = Pager::new(records.len());
    loop {
        let range = pager.range();
        panel(
            console,
            title,
            &[format!(
                "Showing {}-{} of {} (page {}/{})",
                range.start + 1,
                range.end,
                records.len(),
                pager.page() + 1,
                pager.pages()
            )],
        )?;
        let rows: Vec<Vec<String>> = records[range].iter().map(T::fields).collect();
        table(console, T::HEADERS, &rows)?;

        let Some(choice) = console
            .read_line("[n]ext  [p]revious  [j]son  [c]sv  [0] back: ")
            .await?
        else {
            return Err(CliError::InputClosed);
        };
        match choice.trim().to_ascii_lowercase().as_str() {
            "n" => {
                if !pager.next_page() {
                    console.write_line("Already on the last page.")?;
                }
            }
            "p" => {
                if !pager.prev_page() {
                    console.write_line("Already on the first page.")?;
                }
            }
            "j" => console.write_line(&serde_json::to_string_pretty(records)?)?,
            "c" => console.write_line(records_to_csv(records).trim_end())?,
            "0" | "" => return Ok(()),
            _ => console.write_line("Invalid selection. Please try again.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::console::ScriptedConsole;
    use super::*;
    use crate::domain::SystemEvent;

    fn event(n: usize) -> SystemEvent {
        SystemEvent {
            timestamp: format!("2024-01-{:02}T00:00:00Z", n + 1),
            event_type: format!("event.{n}"),
            description: String::new(),
            actor_type: "account".to_owned(),
            actor_sid: "AC123".to_owned(),
            resource_type: "phone-number".to_owned(),
            resource_sid: format!("PN{n}"),
        }
    }

    #[test]
    fn pager_walks_pages_and_clamps() {
        let mut pager = Pager::new(23);
        assert_eq!(pager.pages(), 3);
        assert_eq!(pager.range(), 0..10);
        assert!(!pager.prev_page());
        assert!(pager.next_page());
        assert!(pager.next_page());
        assert_eq!(pager.range(), 20..23);
        assert!(!pager.next_page());
        assert!(pager.prev_page());
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn empty_pager_has_one_page() {
        let pager = Pager::new(0);
        assert_eq!(pager.pages(), 1);
        assert_eq!(pager.range(), 0..0);
    }

    #[test]
    fn table_aligns_and_clips() {
        let mut console = ScriptedConsole::default();
        table(
            &mut console,
            &["SID", "Body"],
            &[
                vec!["SM1".to_owned(), "x".repeat(60)],
                vec!["SM22".to_owned(), "short".to_owned()],
            ],
        )
        .unwrap();
        let lines: Vec<_> = console.output().lines().collect();
        assert_eq!(lines[0], "SID   Body");
        assert_eq!(lines[2], format!("SM1   {}...", "x".repeat(37)));
        assert_eq!(lines[3], "SM22  short");
    }

    #[tokio::test]
    async fn browse_pages_and_exports() {
        let records: Vec<_> = (0..12).map(event).collect();
        let mut console = ScriptedConsole::new(["n", "n", "c", "j", "0"]);
        browse(&mut console, "System Logs", &records).await.unwrap();

        let output = console.output();
        assert!(output.contains("Showing 1-10 of 12 (page 1/2)"));
        assert!(output.contains("Showing 11-12 of 12 (page 2/2)"));
        assert!(output.contains("Already on the last page."));
        assert!(output.contains("timestamp,event_type,description"));
        assert!(output.contains("\"event_type\": \"event.11\""));
        assert_eq!(console.remaining(), 0);
    }

    #[tokio::test]
    async fn browse_reports_closed_input() {
        let records = vec![event(0)];
        let mut console = ScriptedConsole::default();
        let err = browse(&mut console, "System Logs", &records)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::InputClosed));
    }
}
