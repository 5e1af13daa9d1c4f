#![no_std]

#[cfg(test)]
extern crate std;

// Control logic for the head-array alternative input.
//
// This crate stays portable across MCU firmware and host tooling by avoiding the
// Rust standard library and reaching hardware only through the traits in
// `board`.

pub mod board;
pub mod config;
pub mod controller;
pub mod delay;
pub mod head_array;
pub mod scheduler;
pub mod sequencer;
pub mod sequences;
pub mod system;
pub mod telemetry;

pub use board::{Board, Cue, DipSwitches, NoopBoard, OutputId, SwitchStatus};
pub use config::{ConfigError, ControllerConfig};
pub use controller::{MainController, MainState, ModeSwitchPhase};
pub use delay::DelayTimeConverter;
pub use head_array::{HeadArray, PadInputs, PadSnapshot, Sensor};
pub use sequencer::{PulseSequencer, SequenceProgress};
pub use system::{HeadArraySystem, SystemError};
