//! JSONL block-event logging
//!
//! Records blocked tool calls to a JSONL file for later analysis. Reasons
//! are already secret-free by construction; raw parameter values are never
//! written.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// A block log entry
#[derive(Debug, Serialize)]
pub struct BlockEntry {
    /// Timestamp of the block
    pub timestamp: DateTime<Utc>,

    /// Canonical tool name
    pub tool: String,

    /// Rule ID that caused the block
    pub rule: String,

    /// Reason returned to the host
    pub reason: String,
}

impl BlockEntry {
    /// Create a new entry stamped with the current time
    pub fn new(tool: &str, rule: &str, reason: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            tool: tool.to_string(),
            rule: rule.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Block event logger
pub struct BlockLog {
    writer: Option<BufWriter<File>>,
}

impl BlockLog {
    /// Create a new block logger
    pub fn new(path: Option<&Path>) -> Self {
        let writer = path.and_then(|p| {
            if let Some(parent) = p.parent() {
                let _ = std::fs::create_dir_all(parent);
            }

            OpenOptions::new()
                .create(true)
                .append(true)
                .open(p)
                .ok()
                .map(BufWriter::new)
        });

        Self { writer }
    }

    /// Log a block entry
    pub fn log(&mut self, entry: &BlockEntry) -> Result<(), std::io::Error> {
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}

/// Create a disabled logger (for when block logging is off)
impl Default for BlockLog {
    fn default() -> Self {
        Self { writer: None }
    }
}
