//! Timed step tables shared by firmware and host targets.
//!
//! A table is an ordered list of steps terminated by a sentinel whose hold
//! time is zero. The [`crate::sequencer::PulseSequencer`] walks a table one
//! step at a time; nothing in this module knows about hardware.

use core::fmt;

use crate::board::OutputId;

pub mod disable;
pub mod enable;
pub mod version;

pub use disable::{DISABLE_STEPS, DISABLE_TABLE};
pub use enable::{ENABLE_STEPS, ENABLE_TABLE};
pub use version::{VERSION_STEPS, VERSION_TABLE};

/// Step types that carry a hold time.
pub trait TimedStep: Copy {
    /// Milliseconds the step is held before advancing. Zero marks the sentinel.
    fn hold_ms(self) -> u16;

    /// Returns `true` for the table terminator.
    fn is_sentinel(self) -> bool {
        self.hold_ms() == 0
    }
}

/// One step of a wireless hand-off pulse train.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PulseStep {
    pub hold_ms: u16,
    pub active: bool,
}

impl PulseStep {
    /// Table terminator.
    pub const SENTINEL: Self = Self::new(0, false);

    #[must_use]
    pub const fn new(hold_ms: u16, active: bool) -> Self {
        Self { hold_ms, active }
    }
}

impl TimedStep for PulseStep {
    fn hold_ms(self) -> u16 {
        self.hold_ms
    }
}

/// One step of an indicator blink pattern. `None` leaves every pad LED dark.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct IndicatorStep {
    pub hold_ms: u16,
    pub led: Option<OutputId>,
}

impl IndicatorStep {
    /// Table terminator.
    pub const SENTINEL: Self = Self::new(0, None);

    #[must_use]
    pub const fn new(hold_ms: u16, led: Option<OutputId>) -> Self {
        Self { hold_ms, led }
    }
}

impl TimedStep for IndicatorStep {
    fn hold_ms(self) -> u16 {
        self.hold_ms
    }
}

/// The job a table performs.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PulseSequenceKind {
    WirelessEnable,
    WirelessDisable,
    VersionAnnounce,
}

impl fmt::Display for PulseSequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PulseSequenceKind::WirelessEnable => "wireless-enable",
            PulseSequenceKind::WirelessDisable => "wireless-disable",
            PulseSequenceKind::VersionAnnounce => "version-announce",
        };
        f.write_str(label)
    }
}

/// Structural problems detected in a step table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SequenceError {
    /// The table has no steps at all.
    Empty,
    /// The first step is already the sentinel.
    NoSteps,
    /// The last step is not the sentinel.
    MissingSentinel,
    /// A sentinel appears before the end of the table.
    EarlySentinel { index: usize },
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Immutable step table shared across targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StepTable<S: 'static> {
    pub kind: PulseSequenceKind,
    pub steps: &'static [S],
}

/// Table driving a single boolean output.
pub type PulseTable = StepTable<PulseStep>;

/// Table driving the pad indicator LEDs.
pub type IndicatorTable = StepTable<IndicatorStep>;

impl<S: 'static> StepTable<S> {
    #[must_use]
    pub const fn new(kind: PulseSequenceKind, steps: &'static [S]) -> Self {
        Self { kind, steps }
    }

    /// Returns every step, sentinel included.
    #[must_use]
    pub const fn steps(&self) -> &'static [S] {
        self.steps
    }
}

impl<S: TimedStep + 'static> StepTable<S> {
    /// Checks the sentinel invariants.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found.
    pub fn validate(&self) -> Result<(), SequenceError> {
        let (last, body) = self.steps.split_last().ok_or(SequenceError::Empty)?;
        if !last.is_sentinel() {
            return Err(SequenceError::MissingSentinel);
        }
        if body.is_empty() {
            return Err(SequenceError::NoSteps);
        }
        match body.iter().position(|step| step.is_sentinel()) {
            Some(index) => Err(SequenceError::EarlySentinel { index }),
            None => Ok(()),
        }
    }

    /// Sum of every hold time in the table.
    #[must_use]
    pub fn total_ms(&self) -> u32 {
        self.steps.iter().map(|step| u32::from(step.hold_ms())).sum()
    }
}

/// Compile-time check that a pulse table ends in exactly one sentinel.
#[must_use]
pub const fn pulse_steps_well_formed(steps: &[PulseStep]) -> bool {
    if steps.len() < 2 || steps[steps.len() - 1].hold_ms != 0 {
        return false;
    }
    let mut index = 0;
    while index < steps.len() - 1 {
        if steps[index].hold_ms == 0 {
            return false;
        }
        index += 1;
    }
    true
}

/// Compile-time check that an indicator table ends in exactly one sentinel.
#[must_use]
pub const fn indicator_steps_well_formed(steps: &[IndicatorStep]) -> bool {
    if steps.len() < 2 || steps[steps.len() - 1].hold_ms != 0 {
        return false;
    }
    let mut index = 0;
    while index < steps.len() - 1 {
        if steps[index].hold_ms == 0 {
            return false;
        }
        index += 1;
    }
    true
}
