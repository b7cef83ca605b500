//! Bounded console log and the timed script runner that feeds it.

use std::collections::VecDeque;
use std::time::Duration;

use bevy::prelude::*;
use chrono::{DateTime, Local};
use constants::narration::{ALERT_KEYWORDS, BOOTSTRAP_LINES, LOG_CAPACITY, ScriptLine};

/// A single console line. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub message: String,
    pub emitted_at: DateTime<Local>,
}

impl LogEntry {
    /// Wall-clock time formatted for the console, e.g. `14:03:27`.
    pub fn time_label(&self) -> String {
        self.emitted_at.format("%H:%M:%S").to_string()
    }

    /// Alert lines are highlighted in the console.
    pub fn is_alert(&self) -> bool {
        let lower = self.message.to_lowercase();
        ALERT_KEYWORDS.iter().any(|k| lower.contains(k))
    }
}

/// Append-only log keeping the most recent `capacity` entries.
#[derive(Debug, Clone)]
pub struct NarrationLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    /// Entries ever appended, including evicted ones. Lets observers find new lines.
    appended_total: u64,
}

impl Default for NarrationLog {
    fn default() -> Self {
        let mut log = Self::with_capacity(LOG_CAPACITY);
        log.restore_bootstrap();
        log
    }
}

impl NarrationLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            appended_total: 0,
        }
    }

    /// Append a line stamped with the current local time.
    pub fn append(&mut self, message: impl Into<String>) {
        self.append_at(message, Local::now());
    }

    pub fn append_at(&mut self, message: impl Into<String>, emitted_at: DateTime<Local>) {
        let message = message.into();
        info!(target: "narration", "{message}");
        self.entries.push_back(LogEntry {
            message,
            emitted_at,
        });
        self.appended_total += 1;
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Drop everything and start over with the bootstrap lines.
    pub fn restore_bootstrap(&mut self) {
        self.entries.clear();
        for line in BOOTSTRAP_LINES {
            self.append(line);
        }
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn appended_total(&self) -> u64 {
        self.appended_total
    }
}

/// Plays one narration script: emits lines in order and suspends on waits.
///
/// The runner never blocks. It is advanced by [`ScriptRunner::tick`] with
/// whatever duration the caller measured, so tests can drive it with
/// synthetic time.
#[derive(Debug)]
pub struct ScriptRunner {
    target_step: u8,
    lines: &'static [ScriptLine],
    cursor: usize,
    wait: Option<Timer>,
}

impl ScriptRunner {
    /// Start a script. Lines before the first wait are emitted immediately.
    pub fn start(target_step: u8, lines: &'static [ScriptLine], log: &mut NarrationLog) -> Self {
        let mut runner = Self {
            target_step,
            lines,
            cursor: 0,
            wait: None,
        };
        runner.run_until_wait(log);
        runner
    }

    pub fn target_step(&self) -> u8 {
        self.target_step
    }

    pub fn is_finished(&self) -> bool {
        self.wait.is_none() && self.cursor >= self.lines.len()
    }

    /// Advance by `delta`. Returns `true` once the last line has been emitted.
    pub fn tick(&mut self, delta: Duration, log: &mut NarrationLog) -> bool {
        let mut remaining = delta;
        loop {
            if let Some(timer) = self.wait.as_mut() {
                let left = timer.remaining();
                timer.tick(remaining);
                if !timer.finished() {
                    return false;
                }
                remaining = remaining.saturating_sub(left);
                self.wait = None;
            }

            self.run_until_wait(log);
            if self.wait.is_none() {
                return self.is_finished();
            }
        }
    }

    fn run_until_wait(&mut self, log: &mut NarrationLog) {
        while self.wait.is_none() {
            let Some(line) = self.lines.get(self.cursor) else {
                return;
            };
            self.cursor += 1;
            match *line {
                ScriptLine::Emit(message) => log.append(message),
                ScriptLine::Wait(millis) => {
                    self.wait = Some(Timer::new(Duration::from_millis(millis), TimerMode::Once));
                }
            }
        }
    }
}
