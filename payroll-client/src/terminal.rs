//! Plain-text rendering of results, history and scenarios.

use std::io::{self, Write};

use payroll_core::render::{ComparisonRow, PresentationSurface, RenderedView};
use payroll_core::{HistoryEntry, SavedScenario};

/// Writes everything it is shown to `out`, one `caption: value` per line.
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_view(&mut self, view: &RenderedView) -> io::Result<()> {
        for (field, text) in &view.fields {
            writeln!(self.out, "{:<28} {text}", format!("{}:", field.caption()))?;
        }
        if !view.chart.segments.is_empty() {
            writeln!(self.out)?;
            for segment in &view.chart.segments {
                let degrees = segment.sweep().to_degrees();
                let bar = "#".repeat((degrees / 10.0).round() as usize);
                writeln!(
                    self.out,
                    "{:<22} {:>6.1}° {bar}",
                    segment.kind.label(),
                    degrees
                )?;
            }
        }
        Ok(())
    }

    pub fn history(&mut self, entries: &[HistoryEntry]) -> io::Result<()> {
        if entries.is_empty() {
            return writeln!(self.out, "Keine gespeicherten Berechnungen.");
        }
        for entry in entries {
            writeln!(self.out, "{}  {}", entry.timestamp.to_rfc3339(), entry.name)?;
        }
        Ok(())
    }

    pub fn scenarios(&mut self, scenarios: &[SavedScenario]) -> io::Result<()> {
        if scenarios.is_empty() {
            return writeln!(self.out, "Keine gespeicherten Szenarien.");
        }
        for scenario in scenarios {
            writeln!(
                self.out,
                "{}  {} ({})",
                scenario.timestamp.to_rfc3339(),
                scenario.name,
                scenario.request.gross_pay
            )?;
        }
        Ok(())
    }

    pub fn comparison(&mut self, rows: &[ComparisonRow]) -> io::Result<()> {
        let mut widths = ComparisonRow::HEADERS.map(|header| header.chars().count());
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_row(&mut self.out, &ComparisonRow::HEADERS, &widths)?;
        for row in rows {
            write_row(&mut self.out, &row.cells(), &widths)?;
        }
        Ok(())
    }

    pub fn message(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }
}

fn write_row(out: &mut impl Write, cells: &[&str; 6], widths: &[usize; 6]) -> io::Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            // name column left-aligned, amounts right-aligned
            if i == 0 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())
}

impl<W: Write> PresentationSurface for TerminalSurface<W> {
    fn show(&mut self, view: &RenderedView) {
        if let Err(error) = self.write_view(view) {
            tracing::warn!(%error, "could not write result");
        }
    }

    fn show_error(&mut self, message: &str) {
        if let Err(error) = writeln!(self.out, "{message}") {
            tracing::warn!(%error, "could not write error message");
        }
    }
}
