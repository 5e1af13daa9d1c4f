#![allow(dead_code)]

use core::time::Duration;

use headarray_core::board::{
    CueSink, DelayPot, OUTPUT_COUNT, OutputSink, PadReader, SwitchReader,
};
use headarray_core::{
    ControllerConfig, Cue, DipSwitches, HeadArraySystem, MainState, OutputId, Sensor,
    SwitchStatus,
};

/// Board double that records every output and cue.
#[derive(Default)]
pub struct MockBoard {
    pub raw_pads: [bool; 4],
    pub switches: SwitchStatus,
    pub dip: DipSwitches,
    pub pot: u16,
    pub module_led: bool,
    pub outputs: [bool; OUTPUT_COUNT],
    pub mirrors: [bool; 4],
    pub mirror_writes: Vec<[bool; 4]>,
    pub cues: Vec<Cue>,
}

impl MockBoard {
    pub fn press(&mut self, sensor: Sensor) {
        self.raw_pads[sensor.as_index()] = true;
    }

    pub fn release(&mut self, sensor: Sensor) {
        self.raw_pads[sensor.as_index()] = false;
    }

    pub fn user(&mut self, active: bool) {
        self.switches = SwitchStatus::new(active, self.switches.mode_active());
    }

    pub fn mode(&mut self, active: bool) {
        self.switches = SwitchStatus::new(self.switches.user_active(), active);
    }

    pub fn output(&self, id: OutputId) -> bool {
        self.outputs[id.as_index()]
    }
}

impl PadReader for MockBoard {
    fn pad_is_active(&mut self, sensor: Sensor) -> bool {
        self.raw_pads[sensor.as_index()]
    }
}

impl SwitchReader for MockBoard {
    fn switch_status(&mut self) -> SwitchStatus {
        self.switches
    }

    fn dip_switches(&mut self) -> DipSwitches {
        self.dip
    }

    fn wireless_led_active(&mut self) -> bool {
        self.module_led
    }
}

impl DelayPot for MockBoard {
    fn read_delay_pot(&mut self) -> u16 {
        self.pot
    }
}

impl OutputSink for MockBoard {
    fn set_output(&mut self, id: OutputId, active: bool) {
        self.outputs[id.as_index()] = active;
    }

    fn set_wireless_pad_mirror(&mut self, sensor: Sensor, active: bool) {
        self.mirrors[sensor.as_index()] = active;
        if sensor == Sensor::Back {
            self.mirror_writes.push(self.mirrors);
        }
    }
}

impl CueSink for MockBoard {
    fn request_cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}

/// Drives a [`HeadArraySystem`] one main period at a time.
pub struct Harness {
    pub system: HeadArraySystem,
    pub board: MockBoard,
    pub now: Duration,
    period: Duration,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        Self {
            system: HeadArraySystem::new(config).expect("system setup"),
            board: MockBoard::default(),
            now: Duration::ZERO,
            period: config.main_period(),
        }
    }

    pub fn state(&self) -> MainState {
        self.system.state()
    }

    /// Runs one scheduler pass and advances the clock by one main period.
    pub fn step(&mut self) -> MainState {
        let report = self.system.run_pass(&mut self.board, self.now);
        self.now += self.period;
        report.state
    }

    pub fn steps(&mut self, count: usize) -> MainState {
        for _ in 0..count {
            self.step();
        }
        self.state()
    }

    pub fn run_until(&mut self, target: MainState, limit: usize) -> usize {
        for taken in 1..=limit {
            if self.step() == target {
                return taken;
            }
        }
        panic!("never reached {target}, stuck in {}", self.state());
    }

    pub fn boot_to_idle(&mut self) {
        self.board.dip.power_on_at_startup = false;
        self.run_until(MainState::Idle, 400);
    }

    pub fn boot_to_driving(&mut self) {
        self.board.dip.power_on_at_startup = true;
        self.run_until(MainState::Driving, 400);
    }
}
