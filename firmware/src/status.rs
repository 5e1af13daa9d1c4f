#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Shared status storage for the firmware target.
//!
//! The control task publishes the beeper gate after every pass so the cue
//! task can read it without borrowing the system.

use headarray_core::HeadArraySystem;
use portable_atomic::{AtomicBool, Ordering};

/// Whether pad chirps may sound.
static BEEPING_PERMITTED: AtomicBool = AtomicBool::new(false);

/// Stores the outcome of a scheduler pass.
pub fn publish(system: &HeadArraySystem) {
    BEEPING_PERMITTED.store(system.is_beeping_permitted(), Ordering::Relaxed);
}

pub fn beeping_permitted() -> bool {
    BEEPING_PERMITTED.load(Ordering::Relaxed)
}
