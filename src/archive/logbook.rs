use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::archive::util::now_stamp;

/// In-memory trace of one archiving run. Lines are echoed to stdout as
/// they are pushed (unless muted) and persisted in one append to the
/// run log under the archive root.
#[derive(Debug)]
pub struct RunLog {
    lines: Vec<String>,
    echo: bool,
}

impl RunLog {
    pub fn new(echo: bool) -> Self {
        let mut log = Self {
            lines: Vec::new(),
            echo,
        };
        log.push(format!("--- archive-run {} ---", now_stamp()));
        log
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        if self.echo {
            println!("{line}");
        }
        self.lines.push(line);
    }

    pub fn warn(&mut self, line: impl Into<String>) {
        self.push(format!("WARNING: {}", line.into()));
    }

    /// Append the accumulated trace to `path`, creating the file on
    /// first use.
    pub fn flush_to(&self, path: &Path) -> Result<()> {
        let mut block = self.lines.join("\n");
        block.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        file.write_all(block.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}
