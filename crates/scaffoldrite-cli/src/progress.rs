//! Terminal progress for reconcile runs.

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use scaffoldrite_core::application::{ProgressEvent, ProgressObserver};

const TEMPLATE: &str = "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}";

/// Renders reconcile progress as an indicatif bar and keeps every event.
pub struct ProgressBarObserver {
    bar: ProgressBar,
    events: Vec<ProgressEvent>,
}

impl ProgressBarObserver {
    /// The bar is hidden when `quiet` or when stderr is not a terminal.
    pub fn new(quiet: bool) -> Self {
        let bar = ProgressBar::no_length();
        if quiet || !std::io::stderr().is_terminal() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self {
            bar,
            events: Vec::new(),
        }
    }

    /// Clear the bar and hand back the recorded events.
    pub fn finish(self) -> Vec<ProgressEvent> {
        self.bar.finish_and_clear();
        self.events
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_start(&mut self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn on_progress(&mut self, event: &ProgressEvent) {
        self.bar.set_message(format!("{} {}", event.kind, event.path));
        self.bar.set_position(event.count as u64);
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaffoldrite_core::application::OperationKind;
    use scaffoldrite_core::domain::LogicalPath;

    #[test]
    fn records_events_in_order() {
        let mut observer = ProgressBarObserver::new(true);
        observer.on_start(2);
        for (count, path) in [(1, "src"), (2, "src/main.rs")] {
            observer.on_progress(&ProgressEvent {
                kind: OperationKind::CreateFile,
                path: LogicalPath::parse(path),
                count,
            });
        }
        let counts: Vec<_> = observer.finish().iter().map(|e| e.count).collect();
        assert_eq!(counts, [1, 2]);
    }
}
