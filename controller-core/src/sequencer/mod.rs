//! Table-driven pulse sequencer.
//!
//! The sequencer knows nothing about why a table is being played. It keeps a
//! step index and an elapsed-time accumulator, applies each step to a
//! caller-supplied [`StepOutput`], and reports completion when it reaches the
//! sentinel so the caller can change state.

use crate::sequences::{PulseSequenceKind, StepTable, TimedStep};

/// Destination for the steps of a table.
pub trait StepOutput<S> {
    /// Applies the level (or pattern) carried by `step`.
    fn apply(&mut self, step: S);
}

/// Result of advancing the sequencer by one tick.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SequenceProgress<S> {
    /// The current step is still holding.
    Holding,
    /// A new step started and was applied to the output.
    Stepped(S),
    /// The sentinel was reached; nothing was applied.
    Complete,
}

impl<S> SequenceProgress<S> {
    /// Returns `true` once the table is exhausted.
    pub const fn is_complete(&self) -> bool {
        matches!(self, SequenceProgress::Complete)
    }
}

/// Walks a [`StepTable`] in wall-clock ticks.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PulseSequencer<S: 'static> {
    kind: Option<PulseSequenceKind>,
    steps: &'static [S],
    step_index: usize,
    elapsed_ms: u16,
}

impl<S: TimedStep + 'static> PulseSequencer<S> {
    /// Creates an unarmed sequencer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kind: None,
            steps: &[],
            step_index: 0,
            elapsed_ms: 0,
        }
    }

    /// Starts `table` from its first step and applies that step immediately.
    pub fn arm<O>(&mut self, table: &StepTable<S>, output: &mut O)
    where
        O: StepOutput<S> + ?Sized,
    {
        debug_assert!(table.validate().is_ok(), "malformed step table");
        self.kind = Some(table.kind);
        self.steps = table.steps();
        self.step_index = 0;
        self.elapsed_ms = 0;
        if let Some(first) = self.current() {
            output.apply(first);
        }
    }

    /// Accumulates `delta_ms` and moves to the next step once the current one
    /// has been held long enough. At most one step is taken per call.
    pub fn advance<O>(&mut self, delta_ms: u16, output: &mut O) -> SequenceProgress<S>
    where
        O: StepOutput<S> + ?Sized,
    {
        let current = self.current();
        debug_assert!(current.is_some(), "advanced an unarmed sequencer");
        debug_assert!(
            !current.is_some_and(TimedStep::is_sentinel),
            "advanced past the sentinel"
        );
        let Some(step) = current.filter(|step| !step.is_sentinel()) else {
            return SequenceProgress::Complete;
        };

        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        if self.elapsed_ms < step.hold_ms() {
            return SequenceProgress::Holding;
        }

        self.elapsed_ms = 0;
        self.step_index += 1;
        match self.current() {
            Some(next) if !next.is_sentinel() => {
                output.apply(next);
                SequenceProgress::Stepped(next)
            }
            _ => SequenceProgress::Complete,
        }
    }

    /// Step currently holding, or the sentinel once complete.
    fn current(&self) -> Option<S> {
        self.steps.get(self.step_index).copied()
    }

    /// Kind of the most recently armed table.
    #[must_use]
    pub const fn kind(&self) -> Option<PulseSequenceKind> {
        self.kind
    }

    /// Returns `true` when a table has been armed.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        !self.steps.is_empty()
    }
}

impl<S: TimedStep + 'static> Default for PulseSequencer<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequences::{DISABLE_TABLE, ENABLE_TABLE, PulseStep, PulseTable};
    use heapless::Vec;

    #[derive(Default)]
    struct LevelLog {
        levels: Vec<bool, 16>,
    }

    impl StepOutput<PulseStep> for LevelLog {
        fn apply(&mut self, step: PulseStep) {
            self.levels.push(step.active).expect("level log overflow");
        }
    }

    #[test]
    fn arm_applies_first_level_immediately() {
        let mut sequencer = PulseSequencer::new();
        let mut log = LevelLog::default();
        sequencer.arm(&ENABLE_TABLE, &mut log);

        assert_eq!(log.levels.as_slice(), &[false]);
        assert_eq!(sequencer.step_index, 0);
        assert_eq!(sequencer.elapsed_ms, 0);
        assert_eq!(sequencer.kind(), Some(PulseSequenceKind::WirelessEnable));
    }

    #[test]
    fn holds_until_duration_reached() {
        const STEPS: [PulseStep; 3] = [
            PulseStep::new(30, true),
            PulseStep::new(10, false),
            PulseStep::SENTINEL,
        ];
        const TABLE: PulseTable = PulseTable::new(PulseSequenceKind::WirelessEnable, &STEPS);

        let mut sequencer = PulseSequencer::new();
        let mut log = LevelLog::default();
        sequencer.arm(&TABLE, &mut log);

        assert_eq!(sequencer.advance(10, &mut log), SequenceProgress::Holding);
        assert_eq!(sequencer.advance(10, &mut log), SequenceProgress::Holding);
        assert_eq!(sequencer.elapsed_ms, 20);
        assert_eq!(
            sequencer.advance(10, &mut log),
            SequenceProgress::Stepped(STEPS[1])
        );
        assert_eq!(sequencer.elapsed_ms, 0);
        assert_eq!(sequencer.advance(10, &mut log), SequenceProgress::Complete);
        assert_eq!(sequencer.current(), Some(PulseStep::SENTINEL));
        assert_eq!(log.levels.as_slice(), &[true, false]);
    }

    #[test]
    fn enable_table_completes_exactly_once_at_total_duration() {
        let mut sequencer = PulseSequencer::new();
        let mut log = LevelLog::default();
        sequencer.arm(&ENABLE_TABLE, &mut log);

        let ticks = ENABLE_TABLE.total_ms() / 10;
        let mut completions = 0;
        for tick in 1..=ticks {
            let progress = sequencer.advance(10, &mut log);
            if progress.is_complete() {
                completions += 1;
                assert_eq!(tick, ticks, "completed early");
            }
        }

        assert_eq!(completions, 1);
        let expected: Vec<bool, 16> = ENABLE_TABLE
            .steps()
            .iter()
            .take_while(|step| !step.is_sentinel())
            .map(|step| step.active)
            .collect();
        assert_eq!(log.levels, expected);
    }

    #[test]
    fn rearming_restarts_from_first_step() {
        let mut sequencer = PulseSequencer::new();
        let mut log = LevelLog::default();
        sequencer.arm(&ENABLE_TABLE, &mut log);
        // 100 ms lead-in, then one 10 ms pulse.
        for _ in 0..11 {
            sequencer.advance(10, &mut log);
        }
        assert_eq!(sequencer.step_index, 2);

        sequencer.arm(&DISABLE_TABLE, &mut log);
        assert_eq!(sequencer.step_index, 0);
        assert_eq!(sequencer.elapsed_ms, 0);
        assert_eq!(sequencer.current(), Some(DISABLE_TABLE.steps()[0]));
        assert_eq!(sequencer.kind(), Some(PulseSequenceKind::WirelessDisable));
    }

    #[test]
    #[should_panic(expected = "advanced past the sentinel")]
    #[cfg(debug_assertions)]
    fn advancing_after_completion_asserts() {
        const STEPS: [PulseStep; 2] = [PulseStep::new(10, true), PulseStep::SENTINEL];
        const TABLE: PulseTable = PulseTable::new(PulseSequenceKind::WirelessDisable, &STEPS);

        let mut sequencer = PulseSequencer::new();
        let mut log = LevelLog::default();
        sequencer.arm(&TABLE, &mut log);
        assert!(sequencer.advance(10, &mut log).is_complete());
        let _ = sequencer.advance(10, &mut log);
    }
}
