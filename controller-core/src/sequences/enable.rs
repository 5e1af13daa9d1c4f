//! Pulse train that asks the wireless module to take over driving.
//!
//! The module listens on its pad inputs for a double burst: two short
//! 10 ms pulses followed by two 50 ms pulses, after a 100 ms quiet lead-in.

use super::{PulseSequenceKind, PulseStep, PulseTable, pulse_steps_well_formed};

/// Quiet time before the first pulse.
pub const ENABLE_LEAD_IN_MS: u16 = 100;
/// Width of the short pulses and the gaps between them.
pub const ENABLE_SHORT_PULSE_MS: u16 = 10;
/// Width of the long pulses and the gaps between them.
pub const ENABLE_LONG_PULSE_MS: u16 = 50;

/// Ordered steps of the enable handshake.
pub const ENABLE_STEPS: [PulseStep; 10] = [
    PulseStep::new(ENABLE_LEAD_IN_MS, false),
    PulseStep::new(ENABLE_SHORT_PULSE_MS, true),
    PulseStep::new(ENABLE_SHORT_PULSE_MS, false),
    PulseStep::new(ENABLE_SHORT_PULSE_MS, true),
    PulseStep::new(ENABLE_SHORT_PULSE_MS, false),
    PulseStep::new(ENABLE_LONG_PULSE_MS, true),
    PulseStep::new(ENABLE_LONG_PULSE_MS, false),
    PulseStep::new(ENABLE_LONG_PULSE_MS, true),
    PulseStep::new(ENABLE_LONG_PULSE_MS, false),
    PulseStep::SENTINEL,
];

const _: () = assert!(pulse_steps_well_formed(&ENABLE_STEPS));

/// Table used when entering wireless control.
pub const ENABLE_TABLE: PulseTable = PulseTable::new(PulseSequenceKind::WirelessEnable, &ENABLE_STEPS);
