//! Delay potentiometer sampling on ADC1.

use embassy_stm32::adc::{Adc, AnyAdcChannel, SampleTime};
use embassy_stm32::peripherals::ADC1;
use headarray_core::delay::MAX_POT_SAMPLE;

/// Bits dropped to bring the 12-bit conversion onto the 10-bit pot scale.
const RESOLUTION_SHIFT: u16 = 2;

/// Blocking reader for the delay potentiometer wiper.
pub struct DelayPotAdc<'d> {
    adc: Adc<'d, ADC1>,
    channel: AnyAdcChannel<ADC1>,
}

impl<'d> DelayPotAdc<'d> {
    pub fn new(mut adc: Adc<'d, ADC1>, channel: AnyAdcChannel<ADC1>) -> Self {
        adc.set_sample_time(SampleTime::CYCLES79_5);
        Self { adc, channel }
    }

    /// Returns a sample in `0..=MAX_POT_SAMPLE`.
    pub fn read(&mut self) -> u16 {
        let raw = self.adc.blocking_read(&mut self.channel);
        (raw >> RESOLUTION_SHIFT).min(MAX_POT_SAMPLE)
    }
}
