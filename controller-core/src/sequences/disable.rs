//! Pulse train that hands driving back from the wireless module.
//!
//! Same lead-in and short burst as the enable handshake, but only a single
//! long pulse.

use super::enable::{ENABLE_LEAD_IN_MS, ENABLE_LONG_PULSE_MS, ENABLE_SHORT_PULSE_MS};
use super::{PulseSequenceKind, PulseStep, PulseTable, pulse_steps_well_formed};

/// Ordered steps of the disable handshake.
pub const DISABLE_STEPS: [PulseStep; 8] = [
    PulseStep::new(ENABLE_LEAD_IN_MS, false),
    PulseStep::new(ENABLE_SHORT_PULSE_MS, true),
    PulseStep::new(ENABLE_SHORT_PULSE_MS, false),
    PulseStep::new(ENABLE_SHORT_PULSE_MS, true),
    PulseStep::new(ENABLE_SHORT_PULSE_MS, false),
    PulseStep::new(ENABLE_LONG_PULSE_MS, true),
    PulseStep::new(ENABLE_LONG_PULSE_MS, false),
    PulseStep::SENTINEL,
];

const _: () = assert!(pulse_steps_well_formed(&DISABLE_STEPS));

/// Table used when leaving wireless control.
pub const DISABLE_TABLE: PulseTable =
    PulseTable::new(PulseSequenceKind::WirelessDisable, &DISABLE_STEPS);
