//! Telemetry event catalog and ring buffer shared by firmware and host targets.
//!
//! The core never logs directly. Components append structured records here
//! and the firmware (or emulator) drains them into defmt or stdout.

use core::{fmt, time::Duration};

use heapless::{HistoryBuf, OldestOrdered};

use crate::controller::MainState;
use crate::head_array::{PadPair, Sensor};
use crate::sequences::PulseSequenceKind;

/// Monotonic identifier assigned to each record.
pub type EventId = u32;

/// Total number of telemetry entries retained in memory.
pub const TELEMETRY_RING_CAPACITY: usize = 64;

/// Discriminated telemetry events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TelemetryEventKind {
    StateChanged { from: MainState, to: MainState },
    PadActivated(Sensor),
    PadReleased(Sensor),
    SensingFault(PadPair),
    /// A table was armed; `duration_ms` is its scheduled length.
    SequenceStarted {
        kind: PulseSequenceKind,
        duration_ms: u32,
    },
    SequenceComplete(PulseSequenceKind),
}

impl fmt::Display for TelemetryEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryEventKind::StateChanged { from, to } => write!(f, "state {from} -> {to}"),
            TelemetryEventKind::PadActivated(sensor) => write!(f, "pad-active {sensor}"),
            TelemetryEventKind::PadReleased(sensor) => write!(f, "pad-released {sensor}"),
            TelemetryEventKind::SensingFault(pair) => write!(f, "sensing-fault {pair}"),
            TelemetryEventKind::SequenceStarted { kind, duration_ms } => {
                write!(f, "sequence-started {kind} {duration_ms}ms")
            }
            TelemetryEventKind::SequenceComplete(kind) => write!(f, "sequence-complete {kind}"),
        }
    }
}

/// Telemetry record stored in the ring buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TelemetryRecord {
    pub id: EventId,
    /// Time since boot.
    pub timestamp: Duration,
    pub event: TelemetryEventKind,
}

/// Telemetry ring buffer type alias.
pub type TelemetryRing = HistoryBuf<TelemetryRecord, TELEMETRY_RING_CAPACITY>;

/// Records telemetry events into a fixed-size ring buffer.
pub struct TelemetryRecorder {
    ring: TelemetryRing,
    next_event_id: EventId,
}

impl TelemetryRecorder {
    /// Creates a new telemetry recorder with an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
            next_event_id: 0,
        }
    }

    /// Appends an event, overwriting the oldest record once full.
    pub fn record(&mut self, event: TelemetryEventKind, timestamp: Duration) -> EventId {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);
        self.ring.write(TelemetryRecord {
            id,
            timestamp,
            event,
        });
        id
    }

    /// Returns an iterator over the recorded telemetry in chronological order.
    pub fn oldest_first(&self) -> OldestOrdered<'_, TelemetryRecord> {
        self.ring.oldest_ordered()
    }

    /// Records newer than `last_seen`, oldest first.
    ///
    /// Ids wrap, so "newer" means less than half the id space ahead.
    pub fn records_since(
        &self,
        last_seen: Option<EventId>,
    ) -> impl Iterator<Item = &TelemetryRecord> + '_ {
        self.oldest_first().filter(move |record| {
            last_seen.is_none_or(|seen| {
                let ahead = record.id.wrapping_sub(seen);
                ahead != 0 && ahead <= EventId::MAX / 2
            })
        })
    }

    /// Returns the number of records currently stored.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns `true` when no telemetry records are stored.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}
