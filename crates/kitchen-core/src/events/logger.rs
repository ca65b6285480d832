//! Decision Logger
//!
//! `TurnEvents` collects what the fleet decided during one turn;
//! `DecisionLog` appends those records to a JSONL file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use kitchen_events::{DecisionEvent, DecisionKind, UnitId};

/// Decision records produced during the current turn
#[derive(Debug)]
pub struct TurnEvents {
    events: Vec<DecisionEvent>,
    next_event_id: u64,
}

impl TurnEvents {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_event_id: 1,
        }
    }

    pub fn generate_id(&mut self) -> String {
        let id = format!("dec_{:08}", self.next_event_id);
        self.next_event_id += 1;
        id
    }

    /// Record one decision
    pub fn record(&mut self, turn: u32, unit: Option<UnitId>, kind: DecisionKind) {
        let event = DecisionEvent {
            event_id: self.generate_id(),
            turn,
            unit,
            kind,
        };
        self.events.push(event);
    }

    pub fn events(&self) -> &[DecisionEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<DecisionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for TurnEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Append-only JSONL sink for decision records
pub struct DecisionLog {
    writer: Option<BufWriter<File>>,
    event_count: u64,
}

impl DecisionLog {
    /// Create a log writing to the specified path, truncating it
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            event_count: 0,
        })
    }

    /// Create a log that discards records
    pub fn null() -> Self {
        Self {
            writer: None,
            event_count: 0,
        }
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Log a single decision record
    pub fn log(&mut self, event: &DecisionEvent) -> std::io::Result<()> {
        self.event_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(event)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Log multiple decision records
    pub fn log_batch(&mut self, events: &[DecisionEvent]) -> std::io::Result<()> {
        for event in events {
            self.log(event)?;
        }
        Ok(())
    }

    /// Flush buffered records to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for DecisionLog {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush decision log: {}", e);
        }
    }
}
