//! Board wiring for the STM32G0 head-array interface.
//!
//! Pads, switch jacks, DIP switches and the wireless module status LED are
//! active-low inputs with pull-ups. The four wireless pad mirrors are
//! active-low outputs; every other output is active-high.

mod pot;

use embassy_stm32::gpio::{Input, Level, Output};
use headarray_core::board::{CueSink, DelayPot, OutputSink, PadReader, SwitchReader};
use headarray_core::{Cue, DipSwitches, OutputId, Sensor, SwitchStatus};

use crate::cues::{self, CueSender};

pub use pot::DelayPotAdc;

/// Pad inputs indexed by [`Sensor::as_index`].
pub struct PadPins<'d> {
    pub pads: [Input<'d>; 4],
}

/// Switch jacks, DIP switches and the wireless status LED.
pub struct SwitchPins<'d> {
    pub user: Input<'d>,
    pub mode: Input<'d>,
    pub dip_sw1: Input<'d>,
    pub dip_sw3: Input<'d>,
    pub wireless_led: Input<'d>,
}

/// Concrete [`headarray_core::Board`] over Embassy GPIO and ADC drivers.
pub struct HardwareBoard<'d> {
    pads: PadPins<'d>,
    switches: SwitchPins<'d>,
    pot: DelayPotAdc<'d>,
    /// Outputs indexed by [`OutputId::as_index`].
    outputs: [Output<'d>; headarray_core::board::OUTPUT_COUNT],
    /// Wireless pad mirrors indexed by [`Sensor::as_index`].
    mirrors: [Output<'d>; 4],
    cues: CueSender<'d>,
}

impl<'d> HardwareBoard<'d> {
    pub fn new(
        pads: PadPins<'d>,
        switches: SwitchPins<'d>,
        pot: DelayPotAdc<'d>,
        outputs: [Output<'d>; headarray_core::board::OUTPUT_COUNT],
        mirrors: [Output<'d>; 4],
        cues: CueSender<'d>,
    ) -> Self {
        Self {
            pads,
            switches,
            pot,
            outputs,
            mirrors,
            cues,
        }
    }
}

impl PadReader for HardwareBoard<'_> {
    fn pad_is_active(&mut self, sensor: Sensor) -> bool {
        self.pads.pads[sensor.as_index()].is_low()
    }
}

impl SwitchReader for HardwareBoard<'_> {
    fn switch_status(&mut self) -> SwitchStatus {
        SwitchStatus::new(self.switches.user.is_low(), self.switches.mode.is_low())
    }

    fn dip_switches(&mut self) -> DipSwitches {
        DipSwitches::new(self.switches.dip_sw1.is_low(), self.switches.dip_sw3.is_low())
    }

    fn wireless_led_active(&mut self) -> bool {
        self.switches.wireless_led.is_low()
    }
}

impl DelayPot for HardwareBoard<'_> {
    fn read_delay_pot(&mut self) -> u16 {
        self.pot.read()
    }
}

impl OutputSink for HardwareBoard<'_> {
    fn set_output(&mut self, id: OutputId, active: bool) {
        self.outputs[id.as_index()].set_level(Level::from(active));
    }

    fn set_wireless_pad_mirror(&mut self, sensor: Sensor, active: bool) {
        self.mirrors[sensor.as_index()].set_level(Level::from(!active));
    }
}

impl CueSink for HardwareBoard<'_> {
    fn request_cue(&mut self, cue: Cue) {
        if !cues::post(&self.cues, cue) {
            defmt::warn!("cue dropped: {}", defmt::Display2Format(&cue));
        }
    }
}

