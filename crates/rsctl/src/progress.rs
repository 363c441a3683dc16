//! Terminal rendering of task progress events.
//!
//! Events drive an `indicatif` spinner on stderr. A message replaces the
//! spinner's text in place; when the message text changes, the old line is
//! printed above the spinner so the history stays on screen.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use rsctl_core::{NoProgress, ProgressEvent, ProgressSink};

/// Tracks the last rendered line and decides when it becomes history.
#[derive(Debug, Default)]
struct LineHistory {
    previous_message: String,
    previous_line: String,
}

/// What a message event renders: the current line, plus the previous line
/// when it has to be kept above the spinner.
#[derive(Debug, PartialEq, Eq)]
struct LineUpdate {
    line: String,
    keep: Option<String>,
}

impl LineHistory {
    fn next(&mut self, text: &str, percent: Option<u64>) -> LineUpdate {
        let mut line = percent.map(|p| format!("{p}%")).unwrap_or_default();
        if !text.is_empty() {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str("- ");
            line.push_str(text);
        }

        let keep = (!text.is_empty()
            && !self.previous_message.is_empty()
            && self.previous_message != text)
            .then(|| self.previous_line.clone());

        if !text.is_empty() {
            text.clone_into(&mut self.previous_message);
        }
        line.clone_into(&mut self.previous_line);
        LineUpdate { line, keep }
    }
}

/// Spinner-backed renderer. One bar per task: `Finished` completes it and
/// the next event starts a fresh one.
pub struct TerminalProgress {
    target: fn() -> ProgressDrawTarget,
    bar: Option<ProgressBar>,
    history: LineHistory,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr)
    }

    fn with_target(target: fn() -> ProgressDrawTarget) -> Self {
        Self {
            target,
            bar: None,
            history: LineHistory::default(),
        }
    }

    fn bar(&mut self) -> &ProgressBar {
        let target = self.target;
        self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::with_draw_target(None, target());
            bar.set_style(ProgressStyle::default_spinner());
            bar
        })
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalProgress {
    fn event(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Tick => {
                let bar = self.bar();
                bar.inc(1);
                bar.tick();
            }
            ProgressEvent::Message { text, percent } => {
                let update = self.history.next(text, *percent);
                let bar = self.bar();
                if let Some(previous) = update.keep {
                    bar.println(previous);
                }
                bar.set_message(update.line);
            }
            ProgressEvent::Finished => {
                if let Some(bar) = self.bar.take() {
                    if bar.message().is_empty() {
                        bar.finish_and_clear();
                    } else {
                        bar.finish();
                    }
                }
                self.history = LineHistory::default();
            }
        }
    }
}

/// The sink for this invocation: stderr spinner, or nothing when quiet.
pub fn sink(quiet: bool) -> Box<dyn ProgressSink + Send> {
    if quiet {
        Box::new(NoProgress)
    } else {
        Box::new(TerminalProgress::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn message(percent: u64, text: &str) -> ProgressEvent {
        ProgressEvent::Message {
            text: text.into(),
            percent: Some(percent),
        }
    }

    fn hidden() -> TerminalProgress {
        TerminalProgress::with_target(ProgressDrawTarget::hidden)
    }

    #[test]
    fn history_is_kept_once_when_the_message_changes() {
        let mut history = LineHistory::default();
        let kept: Vec<_> = [(50, "Step A"), (75, "Step A"), (90, "Step B")]
            .into_iter()
            .filter_map(|(p, text)| history.next(text, Some(p)).keep)
            .collect();
        assert_eq!(kept, vec!["75% - Step A".to_string()]);
    }

    #[test]
    fn lines_without_text_show_only_the_percentage() {
        let mut history = LineHistory::default();
        assert_eq!(
            history.next("", Some(100)),
            LineUpdate {
                line: "100%".into(),
                keep: None,
            }
        );
        assert_eq!(history.next("Flashing image", None).line, "- Flashing image");
        assert_eq!(history.next("", Some(7)).keep, None);
    }

    #[test]
    fn messages_overwrite_the_bar_in_place() {
        let mut progress = hidden();
        progress.event(&message(5, "Flashing image"));
        progress.event(&message(100, "Flashing image"));
        let bar = progress.bar.clone().unwrap();
        assert_eq!(bar.message(), "100% - Flashing image");

        progress.event(&ProgressEvent::Finished);
        assert!(bar.is_finished());
        assert!(progress.bar.is_none());
    }

    #[test]
    fn ticks_advance_the_spinner() {
        let mut progress = hidden();
        progress.event(&ProgressEvent::Tick);
        progress.event(&ProgressEvent::Tick);
        let bar = progress.bar.clone().unwrap();
        assert_eq!(bar.position(), 2);

        progress.event(&ProgressEvent::Finished);
        assert!(bar.is_finished());
    }

    #[test]
    fn finish_without_events_creates_no_bar() {
        let mut progress = hidden();
        progress.event(&ProgressEvent::Finished);
        assert!(progress.bar.is_none());
    }

    #[test]
    fn a_new_task_starts_a_fresh_bar_and_history() {
        let mut progress = hidden();
        progress.event(&message(100, "Step A"));
        progress.event(&ProgressEvent::Finished);

        progress.event(&message(10, "Step B"));
        let bar = progress.bar.clone().unwrap();
        assert!(!bar.is_finished());
        assert_eq!(bar.message(), "10% - Step B");
        let update = progress.history.next("Step C", Some(20));
        assert_eq!(update.keep.as_deref(), Some("10% - Step B"));
    }
}
