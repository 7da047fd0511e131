use std::io::{self, Write};

use sct_core::{MonitorViewModel, SliceUpdate, SystemStatus};

/// Terminal view of the three slices. Console updates are full snapshots;
/// only entries not yet printed are written.
#[derive(Debug, Default)]
pub struct Renderer {
    printed_console: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, out: &mut impl Write, update: &SliceUpdate) -> io::Result<()> {
        match update {
            SliceUpdate::Status(status) => writeln!(out, "status   {}", describe_status(status)),
            SliceUpdate::TestRecords(records) => writeln!(out, "records  {}", records.len()),
            SliceUpdate::Console(entries) => {
                if entries.len() < self.printed_console {
                    writeln!(out, "console  cleared")?;
                    self.printed_console = 0;
                }
                for entry in &entries[self.printed_console..] {
                    writeln!(
                        out,
                        "console  [{}] {:<7} {}",
                        entry.date,
                        entry.kind.to_uppercase(),
                        entry.description
                    )?;
                }
                self.printed_console = entries.len();
                Ok(())
            }
        }
    }
}

pub fn render_summary(out: &mut impl Write, view: &MonitorViewModel) -> io::Result<()> {
    writeln!(
        out,
        "summary  state={} records={} console_entries={}",
        view.state.as_deref().unwrap_or("-"),
        view.record_count,
        view.console.len()
    )?;
    if let Some(error) = view.error_message.as_deref().filter(|e| !e.is_empty()) {
        writeln!(out, "summary  error={error}")?;
    }
    Ok(())
}

fn describe_status(status: &SystemStatus) -> String {
    match status.state() {
        Some(state) => {
            let mut text = format!("state={state}");
            if let Some(sites) = status.sites() {
                text.push_str(&format!(" sites={}", sites.join(",")));
            }
            if let Some(error) = status.error_message().filter(|e| !e.is_empty()) {
                text.push_str(&format!(" error={error}"));
            }
            text
        }
        // Unvalidated payloads are shown as received.
        None => format!("raw={}", status.0),
    }
}
