//! Head-array pad sampling.
//!
//! Once per input tick the four pads are sampled, opposing pads that read
//! active together are both forced inactive, edges drive the per-pad LEDs and
//! the "pad active" beep, and the resolved snapshot is kept for the main
//! state machine to read on its own schedule.

use core::fmt;
use core::time::Duration;

use crate::board::{Cue, CueSink, OutputId, OutputSink, PadReader};
use crate::telemetry::{TelemetryEventKind, TelemetryRecorder};

/// Number of pads on the head array.
pub const SENSOR_COUNT: usize = 4;

/// Physical pads on the head array.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Sensor {
    Left,
    Right,
    /// Forward pad behind the head.
    Center,
    /// Reverse pad.
    Back,
}

impl Sensor {
    /// Every pad in index order.
    pub const ALL: [Sensor; SENSOR_COUNT] = [Sensor::Left, Sensor::Right, Sensor::Center, Sensor::Back];

    /// Deterministic index for lookups into [`Sensor::ALL`].
    #[must_use]
    pub const fn as_index(self) -> usize {
        match self {
            Sensor::Left => 0,
            Sensor::Right => 1,
            Sensor::Center => 2,
            Sensor::Back => 3,
        }
    }

    /// LED that lights while the pad is held.
    #[must_use]
    pub const fn indicator(self) -> OutputId {
        match self {
            Sensor::Left => OutputId::LeftPadLed,
            Sensor::Right => OutputId::RightPadLed,
            Sensor::Center => OutputId::ForwardPadLed,
            Sensor::Back => OutputId::ReversePadLed,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Sensor::Left => "left",
            Sensor::Right => "right",
            Sensor::Center => "center",
            Sensor::Back => "back",
        }
    }

    /// Parses the labels produced by [`Sensor::label`], plus a few aliases.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Sensor::ALL
            .into_iter()
            .find(|sensor| sensor.label().eq_ignore_ascii_case(label))
            .or_else(|| {
                if label.eq_ignore_ascii_case("forward") {
                    Some(Sensor::Center)
                } else if label.eq_ignore_ascii_case("reverse") {
                    Some(Sensor::Back)
                } else {
                    None
                }
            })
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opposing pad pairs that must never read active together.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PadPair {
    ForwardReverse,
    LeftRight,
}

impl PadPair {
    pub const ALL: [PadPair; 2] = [PadPair::ForwardReverse, PadPair::LeftRight];

    #[must_use]
    pub const fn sensors(self) -> (Sensor, Sensor) {
        match self {
            PadPair::ForwardReverse => (Sensor::Center, Sensor::Back),
            PadPair::LeftRight => (Sensor::Left, Sensor::Right),
        }
    }

    const fn as_index(self) -> usize {
        match self {
            PadPair::ForwardReverse => 0,
            PadPair::LeftRight => 1,
        }
    }
}

impl fmt::Display for PadPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadPair::ForwardReverse => f.write_str("forward/reverse"),
            PadPair::LeftRight => f.write_str("left/right"),
        }
    }
}

/// Read-only view of resolved pad state.
///
/// The main state machine only sees pads through this trait, so alternative
/// sampling strategies can sit behind it without touching the controller.
pub trait PadInputs {
    /// Returns the resolved state of one pad.
    fn digital_input_value(&self, sensor: Sensor) -> bool;

    /// Returns `true` when no pad is active.
    fn pads_in_neutral_state(&self) -> bool {
        Sensor::ALL
            .into_iter()
            .all(|sensor| !self.digital_input_value(sensor))
    }
}

/// Resolved pad levels from one input tick.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PadSnapshot {
    active: [bool; SENSOR_COUNT],
}

impl PadSnapshot {
    /// Snapshot with every pad released.
    pub const NEUTRAL: Self = Self {
        active: [false; SENSOR_COUNT],
    };

    /// Builds a snapshot from raw levels without applying mutual exclusion.
    #[must_use]
    pub const fn from_levels(active: [bool; SENSOR_COUNT]) -> Self {
        Self { active }
    }

}

impl PadInputs for PadSnapshot {
    fn digital_input_value(&self, sensor: Sensor) -> bool {
        self.active[sensor.as_index()]
    }
}

/// Outcome of applying mutual exclusion to one set of raw samples.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Resolution {
    pub snapshot: PadSnapshot,
    /// Pairs that were both active and have been forced inactive.
    pub faults: [bool; 2],
}

impl Resolution {
    #[must_use]
    pub const fn is_faulted(&self, pair: PadPair) -> bool {
        self.faults[pair.as_index()]
    }
}

/// Forces both pads of a pair inactive when they read active together.
#[must_use]
pub fn resolve(raw: [bool; SENSOR_COUNT]) -> Resolution {
    let mut active = raw;
    let mut faults = [false; 2];
    for pair in PadPair::ALL {
        let (first, second) = pair.sensors();
        if active[first.as_index()] && active[second.as_index()] {
            active[first.as_index()] = false;
            active[second.as_index()] = false;
            faults[pair.as_index()] = true;
        }
    }
    Resolution {
        snapshot: PadSnapshot::from_levels(active),
        faults,
    }
}

/// Per-pad debounce state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct SensorState {
    current_active: bool,
    previous_active: bool,
    indicator_output: OutputId,
}

impl SensorState {
    const fn new(sensor: Sensor) -> Self {
        Self {
            current_active: false,
            previous_active: false,
            indicator_output: sensor.indicator(),
        }
    }
}

/// Digital-only head-array input processor.
#[derive(Clone, Debug)]
pub struct HeadArray {
    sensors: [SensorState; SENSOR_COUNT],
    faulted: [bool; 2],
}

impl HeadArray {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sensors: [
                SensorState::new(Sensor::Left),
                SensorState::new(Sensor::Right),
                SensorState::new(Sensor::Center),
                SensorState::new(Sensor::Back),
            ],
            faulted: [false; 2],
        }
    }

    /// Samples every pad once and publishes the resolved snapshot.
    pub fn tick<B>(
        &mut self,
        board: &mut B,
        telemetry: &mut TelemetryRecorder,
        now: Duration,
    ) -> PadSnapshot
    where
        B: PadReader + OutputSink + CueSink + ?Sized,
    {
        let raw = Sensor::ALL.map(|sensor| board.pad_is_active(sensor));
        let resolution = resolve(raw);

        for pair in PadPair::ALL {
            let faulted = resolution.is_faulted(pair);
            if faulted && !self.faulted[pair.as_index()] {
                telemetry.record(TelemetryEventKind::SensingFault(pair), now);
            }
            self.faulted[pair.as_index()] = faulted;
        }

        for sensor in Sensor::ALL {
            let state = &mut self.sensors[sensor.as_index()];
            state.current_active = resolution.snapshot.digital_input_value(sensor);

            match (state.previous_active, state.current_active) {
                (false, true) => {
                    board.set_output(state.indicator_output, true);
                    board.request_cue(Cue::PadActive);
                    telemetry.record(TelemetryEventKind::PadActivated(sensor), now);
                }
                (true, false) => {
                    board.set_output(state.indicator_output, false);
                    telemetry.record(TelemetryEventKind::PadReleased(sensor), now);
                }
                _ => {}
            }

            state.previous_active = state.current_active;
        }

        resolution.snapshot
    }
}

impl Default for HeadArray {
    fn default() -> Self {
        Self::new()
    }
}

impl PadInputs for HeadArray {
    fn digital_input_value(&self, sensor: Sensor) -> bool {
        self.sensors[sensor.as_index()].current_active
    }
}
