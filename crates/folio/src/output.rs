//! Terminal output.
//!
//! Status lines go to stderr, colored by tone. Command results (JSON
//! documents) go to stdout uncolored so they can be piped.

use std::fmt::Display;

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    status: Term,
    results: Term,
}

#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Good,
    Caution,
    Bad,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Plain => Style::new(),
            Self::Good => Style::new().green(),
            Self::Caution => Style::new().yellow(),
            Self::Bad => Style::new().red().bold(),
        }
    }
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            results: Term::stdout(),
        }
    }

    fn status_line(&self, tone: Tone, msg: &str) {
        let _ = self.status.write_line(&tone.style().apply_to(msg).to_string());
    }

    pub(crate) fn info(&self, msg: &str) {
        self.status_line(Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.status_line(Tone::Good, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.status_line(Tone::Caution, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.status_line(Tone::Bad, msg);
    }

    /// Print one caution line per merge warning.
    pub(crate) fn merge_warnings<W: Display>(&self, warnings: &[W]) {
        for warning in warnings {
            self.warning(&format!("merge: {warning}"));
        }
    }

    /// Write a command result to stdout.
    pub(crate) fn data(&self, text: &str) {
        let _ = self.results.write_line(text);
    }
}
