#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Beeper cue queue shared between the control loop and the cue task.

#[cfg(not(target_os = "none"))]
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
#[cfg(target_os = "none")]
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender, TrySendError};
use headarray_core::Cue;

/// Cues buffered before new requests are dropped.
pub const CUE_QUEUE_DEPTH: usize = 4;

/// Gap between chirps of a multi-chirp cue.
pub const CHIRP_GAP_MS: u64 = 80;

#[cfg(target_os = "none")]
type CueMutex = ThreadModeRawMutex;
#[cfg(not(target_os = "none"))]
type CueMutex = NoopRawMutex;

pub type CueQueue = Channel<CueMutex, Cue, CUE_QUEUE_DEPTH>;
pub type CueSender<'a> = Sender<'a, CueMutex, Cue, CUE_QUEUE_DEPTH>;
pub type CueReceiver<'a> = Receiver<'a, CueMutex, Cue, CUE_QUEUE_DEPTH>;

/// Beeper timing for one cue.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChirpPattern {
    pub chirps: u8,
    pub on_ms: u64,
}

impl ChirpPattern {
    #[must_use]
    pub const fn for_cue(cue: Cue) -> Self {
        match cue {
            Cue::PadActive => Self { chirps: 1, on_ms: 30 },
            Cue::GotoIdle => Self { chirps: 1, on_ms: 400 },
            Cue::PowerOn => Self { chirps: 2, on_ms: 120 },
            Cue::Bluetooth => Self { chirps: 3, on_ms: 60 },
            Cue::ResumeDriving => Self { chirps: 2, on_ms: 60 },
            Cue::RnetSleep => Self { chirps: 1, on_ms: 800 },
        }
    }
}

/// Pad chirps are muted while the controller waits in idle; state-machine
/// cues always play.
#[must_use]
pub fn should_play(cue: Cue, beeping_permitted: bool) -> bool {
    beeping_permitted || cue != Cue::PadActive
}

/// Queues a cue, dropping it when the beeper is already backed up.
///
/// Returns `false` when the cue was dropped.
pub fn post(sender: &CueSender<'_>, cue: Cue) -> bool {
    match sender.try_send(cue) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => false,
    }
}
