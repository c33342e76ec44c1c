pub mod archive_run;

use serde::Serialize;

/// Summary of one command invocation, printed at the end of the run
/// (as plain text or JSON).
#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub archived: usize,
    pub skipped: usize,
    pub missing: usize,
    pub details: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            archived: 0,
            skipped: 0,
            missing: 0,
            details: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }
}
