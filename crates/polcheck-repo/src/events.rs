use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use polcheck_domain::ports::EventStore;
use polcheck_types::EventRecord;
use std::fs::OpenOptions;
use std::io::Write;

/// Append-only event log with one JSON object per line.
///
/// Every append opens the file, writes a single complete line, and closes it again, so events
/// from earlier rules stay on disk even if a later rule aborts the check.
#[derive(Clone, Debug)]
pub struct JsonlEventStore {
    path: Utf8PathBuf,
}

impl JsonlEventStore {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl EventStore for JsonlEventStore {
    fn append(&self, event: &EventRecord) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory: {parent}"))?;
        }

        let mut line = serde_json::to_string(event).context("serialize event")?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open event log: {}", self.path))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("append event: {}", self.path))?;
        Ok(())
    }
}

/// Read every event from a JSON Lines log; a missing file reads as empty.
pub fn read_events(path: &Utf8Path) -> anyhow::Result<Vec<EventRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path).with_context(|| format!("read event log: {path}"))?;
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("parse event log {path}, line {}", idx + 1))
        })
        .collect()
}
