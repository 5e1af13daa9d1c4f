use embassy_stm32::gpio::Output;
use embassy_time::Timer;

use crate::cues::{self, CHIRP_GAP_MS, ChirpPattern, CueReceiver};
use crate::status;

/// Plays queued cues on the beeper.
#[embassy_executor::task]
pub async fn run(receiver: CueReceiver<'static>, mut beeper: Output<'static>) -> ! {
    loop {
        let cue = receiver.receive().await;
        if !cues::should_play(cue, status::beeping_permitted()) {
            continue;
        }

        let pattern = ChirpPattern::for_cue(cue);
        for chirp in 0..pattern.chirps {
            if chirp > 0 {
                Timer::after_millis(CHIRP_GAP_MS).await;
            }
            beeper.set_high();
            Timer::after_millis(pattern.on_ms).await;
            beeper.set_low();
        }
    }
}
