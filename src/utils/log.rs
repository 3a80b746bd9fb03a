// src/utils/log.rs

//! Console presentation helpers on top of the `log` facade.
//!
//! Provides the banner and summary layout used by the CLI reports, and a
//! writer that copies log output into a file as well as stderr.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

const WIDTH: usize = 60;

/// Log sink that writes every record to a file and to stderr.
#[derive(Debug)]
pub struct LogTee<W: Write = io::Stderr> {
    file: File,
    console: W,
}

impl LogTee {
    /// Create (or truncate) the log file at `path`.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::with_console(File::create(path)?, io::stderr()))
    }
}

impl<W: Write> LogTee<W> {
    pub fn with_console(file: File, console: W) -> Self {
        Self { file, console }
    }
}

impl<W: Write> Write for LogTee<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        self.console.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.console.flush()
    }
}

/// Log a separator line
pub fn separator() {
    log::info!("{}", "─".repeat(WIDTH));
}

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(WIDTH);
    log::info!("{border}");
    log::info!("  {title}");
    log::info!("{border}");
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    log::info!("    {message}");
}

/// Log a summary section with aligned values
pub fn summary(title: &str, items: &[(&str, String)]) {
    let key_width = items.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    log::info!("[SUMMARY] {title}");
    for line in summary_lines(items, key_width) {
        log::info!("{line}");
    }
}

fn summary_lines(items: &[(&str, String)], key_width: usize) -> Vec<String> {
    items
        .iter()
        .map(|(key, value)| {
            let label = format!("{key}:");
            format!("    {label:<width$}  {value}", width = key_width + 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_tee_writes_both_sinks() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("comparison.log");

        let mut tee = LogTee::with_console(File::create(&path).unwrap(), Vec::new());
        writeln!(tee, "[INFO] New entries: 2").unwrap();
        tee.flush().unwrap();

        assert_eq!(tee.console, b"[INFO] New entries: 2\n");
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[INFO] New entries: 2\n"
        );
    }

    #[test]
    fn test_summary_lines_are_aligned() {
        let items = [("New", "2".to_string()), ("Unchanged", "10".to_string())];
        let lines = summary_lines(&items, 9);
        assert_eq!(lines[0], "    New:        2");
        assert_eq!(lines[1], "    Unchanged:  10");
    }
}
