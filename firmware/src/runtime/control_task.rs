use core::time::Duration;

use embassy_time::{Instant, Timer};
use headarray_core::HeadArraySystem;

use crate::hw::HardwareBoard;
use crate::status;
use crate::telemetry::TelemetryLogger;

/// Drives scheduler passes off the Embassy monotonic clock.
#[embassy_executor::task]
pub async fn run(system: &'static mut HeadArraySystem, mut board: HardwareBoard<'static>) -> ! {
    let epoch = Instant::now();
    let mut logger = TelemetryLogger::new();
    defmt::info!("head array controller started");

    loop {
        let now = Duration::from_micros(epoch.elapsed().as_micros());
        let report = system.run_pass(&mut board, now);
        if !report.ran.is_empty() {
            status::publish(system);
            logger.drain(system.telemetry());
        }

        match system.next_wake() {
            Some(wake) => {
                let micros = u64::try_from(wake.as_micros()).unwrap_or(u64::MAX);
                Timer::at(epoch + embassy_time::Duration::from_micros(micros)).await;
            }
            None => Timer::after_millis(10).await,
        }
    }
}
