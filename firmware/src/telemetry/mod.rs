#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Forwards controller telemetry to the debug log.

use headarray_core::telemetry::{EventId, TelemetryRecord, TelemetryRecorder};

/// Tracks which records have already been logged.
#[derive(Debug, Default)]
pub struct TelemetryLogger {
    last_seen: Option<EventId>,
}

impl TelemetryLogger {
    pub const fn new() -> Self {
        Self { last_seen: None }
    }

    /// Logs every record newer than the previous drain and returns how many
    /// were emitted. Records overwritten in the ring before a drain are lost.
    pub fn drain(&mut self, recorder: &TelemetryRecorder) -> usize {
        let mut emitted = 0;
        for record in recorder.records_since(self.last_seen) {
            emit_log(record);
            self.last_seen = Some(record.id);
            emitted += 1;
        }
        emitted
    }

    pub const fn last_seen(&self) -> Option<EventId> {
        self.last_seen
    }
}

#[cfg(target_os = "none")]
fn emit_log(record: &TelemetryRecord) {
    defmt::info!(
        "telemetry #{} t={}ms {}",
        record.id,
        u64::try_from(record.timestamp.as_millis()).unwrap_or(u64::MAX),
        defmt::Display2Format(&record.event)
    );
}

#[cfg(not(target_os = "none"))]
fn emit_log(record: &TelemetryRecord) {
    println!(
        "telemetry #{} t={}ms {}",
        record.id,
        record.timestamp.as_millis(),
        record.event
    );
}
