//! CSV event writer.
//!
//! Writes one row per event with the columns
//! `time,type,person,vehicle,link,mode,act_type`; fields that do not apply to
//! an event kind are left empty.  Times are written as raw seconds so
//! downstream tooling never has to parse clock strings.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::{Event, EventKind, EventsError};

/// Streams events to a CSV file (or any `Write` sink).
pub struct EventWriter<W: Write> {
    inner:    Writer<W>,
    finished: bool,
}

impl EventWriter<File> {
    /// Create `path` and write the header row.
    pub fn create(path: &Path) -> Result<Self, EventsError> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> EventWriter<W> {
    /// Wrap any `Write` sink and write the header row.
    pub fn from_writer(sink: W) -> Result<Self, EventsError> {
        let mut inner = Writer::from_writer(sink);
        inner.write_record(["time", "type", "person", "vehicle", "link", "mode", "act_type"])?;
        Ok(Self { inner, finished: false })
    }

    /// Append one event row.
    pub fn write(&mut self, event: &Event) -> Result<(), EventsError> {
        let time = event.time.0.to_string();
        let link = event.kind.link().0.to_string();

        let (person, vehicle, mode, act_type) = match &event.kind {
            EventKind::ActivityEnd { person, act_type, .. }
            | EventKind::ActivityStart { person, act_type, .. } => {
                (person.0.to_string(), String::new(), "", act_type.as_str())
            }
            EventKind::LinkLeave { vehicle, .. } | EventKind::LinkEnter { vehicle, .. } => {
                (String::new(), vehicle.0.to_string(), "", "")
            }
            EventKind::Departure { person, mode, .. }
            | EventKind::Arrival { person, mode, .. } => {
                (person.0.to_string(), String::new(), mode.as_str(), "")
            }
            EventKind::Stuck { person, .. } => {
                (person.0.to_string(), String::new(), "", "")
            }
        };

        self.inner.write_record([
            time.as_str(),
            event.kind.label(),
            person.as_str(),
            vehicle.as_str(),
            link.as_str(),
            mode,
            act_type,
        ])?;
        Ok(())
    }

    /// Append a batch of event rows.
    pub fn write_all(&mut self, events: &[Event]) -> Result<(), EventsError> {
        for event in events {
            self.write(event)?;
        }
        Ok(())
    }

    /// Flush the underlying sink.  Idempotent.
    pub fn finish(&mut self) -> Result<(), EventsError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.inner.flush()?;
        Ok(())
    }
}
