use std::io::{self, Write};

use reader_core::{AppViewModel, ExtractionRow, JobRowView};

use crate::platform::input::HELP;

const BAR_WIDTH: usize = 20;
const NO_ACTIVE_JOBS: &str = "No active jobs.";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Clear the terminal and draw the whole frame on every render.
    Redraw,
    /// Print the jobs panel and only the result rows not printed yet.
    Append,
}

pub struct TerminalRenderer {
    base_url: String,
    mode: RenderMode,
    printed_rows: usize,
    printed_notices: String,
}

impl TerminalRenderer {
    pub fn new(base_url: impl Into<String>, mode: RenderMode) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            mode,
            printed_rows: 0,
            printed_notices: String::new(),
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        let mut out = io::stdout().lock();
        match self.mode {
            RenderMode::Redraw => {
                out.write_all(CLEAR_SCREEN.as_bytes())?;
                out.write_all(header(view).as_bytes())?;
                out.write_all(jobs_panel(view, &self.base_url).as_bytes())?;
                out.write_all(results_table(&view.results, 0).as_bytes())?;
            }
            RenderMode::Append => {
                let pending = notices(view);
                if pending != self.printed_notices {
                    out.write_all(pending.as_bytes())?;
                    self.printed_notices = pending;
                }
                out.write_all(jobs_panel(view, &self.base_url).as_bytes())?;
                if view.results.len() > self.printed_rows {
                    out.write_all(results_table(&view.results, self.printed_rows).as_bytes())?;
                }
            }
        }
        self.printed_rows = view.results.len();
        out.flush()
    }
}

/// Limits, local queue and upload controls.
pub fn header(view: &AppViewModel) -> String {
    let mut text = String::from("Aztec Reader\n");
    if !view.limits_label.is_empty() {
        text.push_str(&view.limits_label);
        text.push('\n');
    }
    let queued = if view.queued_files.is_empty() {
        "(none)".to_string()
    } else {
        view.queued_files.join(", ")
    };
    text.push_str(&format!(
        "Queued: {queued}\nOnly Aztec: {} | Upload: {}\n\n",
        if view.only_aztec { "on" } else { "off" },
        if view.upload_enabled { "ready" } else { "sending..." }
    ));
    text.push_str(&notices(view));
    text
}

/// Alert and help text; both stay until the next command dismisses them.
pub fn notices(view: &AppViewModel) -> String {
    let mut text = String::new();
    if let Some(alert) = &view.alert {
        text.push_str(&format!("!! {alert}\n\n"));
    }
    if view.show_help {
        text.push_str(HELP);
        text.push_str("\n\n");
    }
    text
}

/// The active-jobs panel. Pure: equal views give equal text.
pub fn jobs_panel(view: &AppViewModel, base_url: &str) -> String {
    let mut text = String::from("== Active jobs ==\n");
    if view.jobs.is_empty() {
        text.push_str(NO_ACTIVE_JOBS);
        text.push('\n');
    }
    for job in &view.jobs {
        text.push_str(&job_block(job, base_url));
    }
    text.push('\n');
    text
}

fn job_block(job: &JobRowView, base_url: &str) -> String {
    let links = job
        .downloads
        .iter()
        .map(|link| format!("{}: {base_url}{}", link.format.label(), link.path))
        .collect::<Vec<_>>()
        .join("  ");
    let mut block = format!(
        "{} [{}]\n  {} {:>3}%\n",
        job.job_id,
        job.status,
        progress_bar(job.percent),
        job.percent
    );
    if !job.note.is_empty() {
        block.push_str(&format!("  {}\n", job.note));
    }
    block.push_str(&format!("  {links}\n"));
    block
}

fn progress_bar(percent: u64) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Results table rows from `start` on, numbered from 1 for the `copy` command.
pub fn results_table(rows: &[ExtractionRow], start: usize) -> String {
    let mut text = String::new();
    if start == 0 {
        text.push_str("== Results ==\n#\tfile\tpage\tformat\ttext\n");
    }
    for (index, row) in rows.iter().enumerate().skip(start) {
        text.push_str(&result_line(index, row));
    }
    text
}

fn result_line(index: usize, row: &ExtractionRow) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\n",
        index + 1,
        row.file,
        row.page,
        row.format,
        row.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_core::{DownloadFormat, DownloadLink};

    fn job(id: &str, status: &str, percent: u64, note: &str) -> JobRowView {
        JobRowView {
            job_id: id.to_string(),
            status: status.to_string(),
            percent,
            note: note.to_string(),
            downloads: [
                DownloadLink::new(id, DownloadFormat::Json),
                DownloadLink::new(id, DownloadFormat::Csv),
            ],
        }
    }

    fn row(text: &str) -> ExtractionRow {
        ExtractionRow {
            file: "a.pdf".to_string(),
            page: "1".to_string(),
            format: "AZTEC".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn empty_registry_renders_placeholder_only() {
        let panel = jobs_panel(&AppViewModel::default(), "http://svc");
        assert_eq!(panel, "== Active jobs ==\nNo active jobs.\n\n");
    }

    #[test]
    fn job_block_shows_badge_bar_note_and_links() {
        let view = AppViewModel {
            jobs: vec![job("j1", "started", 75, "Page 3/4")],
            ..AppViewModel::default()
        };
        let panel = jobs_panel(&view, "http://svc");

        assert!(panel.contains("j1 [started]"));
        assert!(panel.contains("[###############.....]  75%"));
        assert!(panel.contains("  Page 3/4\n"));
        assert!(panel.contains("JSON: http://svc/api/jobs/j1/download?fmt=json"));
        assert!(panel.contains("CSV: http://svc/api/jobs/j1/download?fmt=csv"));
        assert!(!panel.contains(NO_ACTIVE_JOBS));
    }

    #[test]
    fn rendering_is_idempotent() {
        let view = AppViewModel {
            jobs: vec![job("a", "queued", 0, ""), job("b", "started", 50, "")],
            results: vec![row("x")],
            ..AppViewModel::default()
        };
        assert_eq!(jobs_panel(&view, "http://svc"), jobs_panel(&view, "http://svc"));
        assert_eq!(header(&view), header(&view));
        assert_eq!(
            results_table(&view.results, 0),
            results_table(&view.results, 0)
        );
    }

    #[test]
    fn progress_bar_bounds() {
        assert_eq!(progress_bar(0), format!("[{}]", ".".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(100), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(250), format!("[{}]", "#".repeat(BAR_WIDTH)));
    }

    #[test]
    fn results_continue_numbering_after_printed_rows() {
        let rows = vec![row("first"), row("second")];
        assert_eq!(results_table(&rows, 1), "2\ta.pdf\t1\tAZTEC\tsecond\n");
        assert!(results_table(&rows, 0).starts_with("== Results =="));
    }

    #[test]
    fn header_keeps_alert_and_help_on_every_redraw() {
        let view = AppViewModel {
            alert: Some("Select PDF files.".to_string()),
            show_help: true,
            ..AppViewModel::default()
        };
        let first = header(&view);
        assert!(first.contains("!! Select PDF files.\n"));
        assert!(first.contains("upload            submit the queued files"));
        assert_eq!(first, header(&view));

        assert_eq!(notices(&AppViewModel::default()), "");
    }

    #[test]
    fn header_reports_queue_and_controls() {
        let view = AppViewModel {
            limits_label: "Limit: 30MB, 120 pages, timeout 300s".to_string(),
            queued_files: vec!["a.pdf".to_string(), "b.pdf".to_string()],
            only_aztec: true,
            upload_enabled: false,
            ..AppViewModel::default()
        };
        assert_eq!(
            header(&view),
            "Aztec Reader\nLimit: 30MB, 120 pages, timeout 300s\n\
             Queued: a.pdf, b.pdf\nOnly Aztec: on | Upload: sending...\n\n"
        );
    }
}
