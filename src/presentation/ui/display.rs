use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use crate::domain::entities::sync_task::{SyncReport, SyncResult, SyncStatus};

/// Output format for per-repository lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Formats sync results and repository listings, one line per repository
#[derive(Debug, Clone)]
pub struct ResultFormatter {
    pub format: OutputFormat,
    pub verbose: bool,
    pub use_color: bool,
}

/// Checkout state of a repository as reported by `list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Cloned,
    Missing,
    /// The path could not be inspected
    Unreadable(String),
}

impl CheckoutState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Cloned => "cloned",
            CheckoutState::Missing => "missing",
            CheckoutState::Unreadable(_) => "unreadable",
        }
    }
}

/// A repository entry printed by `list`
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    pub name: String,
    pub path: String,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultFormatter {
    /// Create a new ResultFormatter
    pub fn new(format: OutputFormat, verbose: bool, use_color: bool) -> Self {
        Self {
            format,
            verbose,
            use_color,
        }
    }

    /// Format a single sync result as one line (without trailing newline)
    pub fn format_result(&self, result: &SyncResult) -> String {
        match self.format {
            OutputFormat::Json => Self::to_json_line(result),
            OutputFormat::Text => self.format_result_text(result),
        }
    }

    fn format_result_text(&self, result: &SyncResult) -> String {
        match result.status {
            SyncStatus::Success => format!(
                "{} {}",
                self.paint_status(
                    &format!("Successfully {}", result.operation.past_tense()),
                    &result.status
                ),
                result.name
            ),
            SyncStatus::Skipped => {
                let mut line = format!(
                    "{} {} ({})",
                    self.paint_status("Skipped", &result.status),
                    result.name,
                    result.message
                );
                if self.verbose {
                    if let Some(ref hint) = result.hint {
                        line.push_str(&format!(" - {}", hint));
                    }
                }
                line
            }
            SyncStatus::Failed => {
                let detail = result.message.trim();
                let detail = if detail.is_empty() {
                    match (&result.failed_command, result.exit_code) {
                        (Some(command), Some(code)) => {
                            format!("{} exited with status {}", command, code)
                        }
                        (Some(command), None) => format!("{} failed", command),
                        _ => "unknown error".to_string(),
                    }
                } else {
                    detail.to_string()
                };
                format!(
                    "{} {}: {}",
                    self.paint_status("Failed", &result.status),
                    result.name,
                    detail
                )
            }
        }
    }

    /// Format the end-of-run summary (verbose text format only, written to stderr)
    pub fn format_summary(&self, report: &SyncReport) -> Option<String> {
        if self.format != OutputFormat::Text || !self.verbose {
            return None;
        }

        Some(format!(
            "{} {} {} succeeded, {} skipped, {} failed (started {}, {:.2}s)",
            self.paint("::", Paint::Info),
            report.operation,
            report.succeeded(),
            report.skipped(),
            report.failed(),
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.elapsed.as_secs_f64()
        ))
    }

    /// Format a `list` entry
    pub fn format_list_entry(&self, name: &str, path: &Path, state: &CheckoutState) -> String {
        match self.format {
            OutputFormat::Json => {
                let entry = ListEntry {
                    name: name.to_string(),
                    path: path.display().to_string(),
                    state: state.as_str(),
                    error: match state {
                        CheckoutState::Unreadable(reason) => Some(reason.clone()),
                        _ => None,
                    },
                };
                serde_json::to_string(&entry)
                    .unwrap_or_else(|_| format!("{{\"name\":\"{}\"}}", name))
            }
            OutputFormat::Text => {
                let label = match state {
                    CheckoutState::Cloned => self.paint(state.as_str(), Paint::Success),
                    CheckoutState::Missing => self.paint(state.as_str(), Paint::Warning),
                    CheckoutState::Unreadable(reason) => format!(
                        "{} ({})",
                        self.paint(state.as_str(), Paint::Error),
                        reason
                    ),
                };
                format!("{} {} {}", name, path.display(), label)
            }
        }
    }

    fn to_json_line(result: &SyncResult) -> String {
        // SyncResult only holds strings and enums, serialization cannot fail
        serde_json::to_string(result)
            .unwrap_or_else(|e| format!("{{\"name\":\"{}\",\"error\":\"{}\"}}", result.name, e))
    }

    fn paint_status(&self, text: &str, status: &SyncStatus) -> String {
        let paint = match status {
            SyncStatus::Success => Paint::Success,
            SyncStatus::Skipped => Paint::Warning,
            SyncStatus::Failed => Paint::Error,
        };
        self.paint(text, paint)
    }

    fn paint(&self, text: &str, paint: Paint) -> String {
        if !self.use_color {
            return text.to_string();
        }
        match paint {
            Paint::Success => text.green().bold().to_string(),
            Paint::Warning => text.yellow().to_string(),
            Paint::Error => text.red().bold().to_string(),
            Paint::Info => text.blue().bold().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Paint {
    Success,
    Warning,
    Error,
    Info,
}
