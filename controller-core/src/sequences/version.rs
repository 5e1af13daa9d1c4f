//! Boot-time firmware version blink.
//!
//! The major number is blinked on the forward pad LED and the minor number on
//! the left pad LED, long pulses first, so 2.2 reads as two long forward
//! blinks followed by two short left blinks.

use super::{IndicatorStep, IndicatorTable, PulseSequenceKind, indicator_steps_well_formed};
use crate::board::OutputId;

pub const VERSION_LONG_MS: u16 = 350;
pub const VERSION_SHORT_MS: u16 = 100;
pub const VERSION_GAP_MS: u16 = 200;

/// Ordered steps of the version announcement.
pub const VERSION_STEPS: [IndicatorStep; 9] = [
    IndicatorStep::new(VERSION_LONG_MS, None),
    IndicatorStep::new(VERSION_LONG_MS, Some(OutputId::ForwardPadLed)),
    IndicatorStep::new(VERSION_GAP_MS, None),
    IndicatorStep::new(VERSION_LONG_MS, Some(OutputId::ForwardPadLed)),
    IndicatorStep::new(VERSION_GAP_MS, None),
    IndicatorStep::new(VERSION_SHORT_MS, Some(OutputId::LeftPadLed)),
    IndicatorStep::new(VERSION_GAP_MS, None),
    IndicatorStep::new(VERSION_SHORT_MS, Some(OutputId::LeftPadLed)),
    IndicatorStep::SENTINEL,
];

const _: () = assert!(indicator_steps_well_formed(&VERSION_STEPS));

/// Table played once at power-up.
pub const VERSION_TABLE: IndicatorTable =
    IndicatorTable::new(PulseSequenceKind::VersionAnnounce, &VERSION_STEPS);
