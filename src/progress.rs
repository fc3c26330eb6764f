//! Comparison-phase progress reporting.
//!
//! The pairwise comparison is the long-running stage of a run (O(n²) over
//! the record count), so it reports coarse percentage milestones. Progress
//! is emitted on **stderr** so stdout remains parseable for scripts. This
//! is a side effect for operators, not a correctness requirement.

use std::io::Write;

/// A single progress event for the comparison phase.
#[derive(Clone, Debug)]
pub enum DedupeProgressEvent {
    /// `done` of `total` unordered pairs compared.
    Comparing { done: u64, total: u64, percent: u8 },
}

/// Reports comparison progress. Implementations write to stderr.
pub trait ProgressReporter: Send + Sync {
    /// Emit a progress event. Called from the comparison loop at
    /// coarse-grained milestones only.
    fn report(&self, event: DedupeProgressEvent);
}

/// Human-friendly progress: "dedupe  comparing  12,345 / 49,995 pairs (25%)".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: DedupeProgressEvent) {
        let DedupeProgressEvent::Comparing {
            done,
            total,
            percent,
        } = event;
        let line = format!(
            "dedupe  comparing  {} / {} pairs ({}%)\n",
            format_number(done),
            format_number(total),
            percent
        );
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, event: DedupeProgressEvent) {
        let DedupeProgressEvent::Comparing {
            done,
            total,
            percent,
        } = event;
        let obj = serde_json::json!({
            "event": "progress",
            "phase": "comparing",
            "done": done,
            "total": total,
            "percent": percent
        });
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: DedupeProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Build a reporter for this mode. Caller passes it to the comparator.
    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
