//! Main control state machine.
//!
//! The controller owns the single answer to "what should the chair do right
//! now". It is ticked at the main period with the latest resolved pad
//! snapshot and drives the demand outputs, the power LED, the reset line,
//! and the wireless module's pad inputs. All timing is plain countdown state
//! measured in main ticks; nothing here blocks.
//!
//! Work for a transition (cues, LED changes, arming a sequencer) happens in
//! the tick that decides it, and the new state's own behavior starts on the
//! following tick.

use core::time::Duration;

use crate::board::{Board, Cue, DipSwitches, OutputId, OutputSink, SwitchStatus};
use crate::config::ControllerConfig;
use crate::delay::DELAY_CEILING_MS;
use crate::head_array::{PadInputs, Sensor};
use crate::sequencer::{PulseSequencer, SequenceProgress, StepOutput};
use crate::sequences::{
    DISABLE_TABLE, ENABLE_TABLE, IndicatorStep, PulseStep, PulseTable, VERSION_TABLE,
};
use crate::telemetry::{TelemetryEventKind, TelemetryRecorder};

mod drive;
mod state;

pub use drive::{Direction, DriveDemand, Speed};
pub use state::{MainState, ModeSwitchPhase};

/// Startup settle time before the first state decision.
pub const STARTUP_DELAY_MS: u16 = 1_000;
/// Ceiling applied to the startup and neutral-guard counters.
pub const NEUTRAL_GUARD_MS: u16 = 500;
/// Width of the short reset pulses.
pub const RESET_PULSE_MS: u16 = 100;
/// Low time between the second and third reset pulses.
pub const RESET_GAP_MS: u16 = 200;
/// Width of the final reset pulse that sleeps the chair bus.
pub const SLEEP_PULSE_MS: u16 = 3_000;
/// Shortest hold required at each mode-switch checkpoint.
pub const MODE_HOLD_MIN_MS: u16 = 1_000;

/// Drives every wireless mirror input to the same level.
struct WirelessPads<'a, B: ?Sized>(&'a mut B);

impl<B: OutputSink + ?Sized> StepOutput<PulseStep> for WirelessPads<'_, B> {
    fn apply(&mut self, step: PulseStep) {
        for sensor in Sensor::ALL {
            self.0.set_wireless_pad_mirror(sensor, step.active);
        }
    }
}

/// Lights at most one pad LED per step.
struct PadIndicators<'a, B: ?Sized>(&'a mut B);

impl<B: OutputSink + ?Sized> StepOutput<IndicatorStep> for PadIndicators<'_, B> {
    fn apply(&mut self, step: IndicatorStep) {
        clear_pad_leds(self.0);
        if let Some(led) = step.led {
            self.0.set_output(led, true);
        }
    }
}

fn clear_pad_leds<B: OutputSink + ?Sized>(board: &mut B) {
    for led in OutputId::PAD_LEDS {
        board.set_output(led, false);
    }
}

fn mirror_pads<B, P>(board: &mut B, pads: &P)
where
    B: OutputSink + ?Sized,
    P: PadInputs + ?Sized,
{
    for sensor in Sensor::ALL {
        board.set_wireless_pad_mirror(sensor, pads.digital_input_value(sensor));
    }
}

/// The main control state machine and its countdown state.
#[derive(Clone, Debug)]
pub struct MainController {
    config: ControllerConfig,
    state: MainState,
    switches: SwitchStatus,
    dip: DipSwitches,
    startup_ticks: u16,
    switch_delay: u16,
    pulse_ticks: u16,
    handoff: PulseSequencer<PulseStep>,
    version: PulseSequencer<IndicatorStep>,
    demand: DriveDemand,
}

impl MainController {
    /// Creates a controller that will announce the firmware version first.
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: MainState::VersionAnnounce,
            switches: SwitchStatus::NONE,
            dip: DipSwitches::default(),
            startup_ticks: config.ticks_for(STARTUP_DELAY_MS),
            switch_delay: 0,
            pulse_ticks: 0,
            handoff: PulseSequencer::new(),
            version: PulseSequencer::new(),
            demand: DriveDemand::NEUTRAL,
        }
    }

    #[must_use]
    pub const fn state(&self) -> MainState {
        self.state
    }

    #[must_use]
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Switch status sampled on the most recent tick.
    #[must_use]
    pub const fn switches(&self) -> SwitchStatus {
        self.switches
    }

    /// Demand written on the most recent driving tick.
    #[must_use]
    pub const fn drive_demand(&self) -> DriveDemand {
        self.demand
    }

    /// Remaining long-press (or mode hold) ticks.
    #[must_use]
    pub const fn switch_delay(&self) -> u16 {
        self.switch_delay
    }

    /// Beeps are suppressed only while waiting in idle.
    #[must_use]
    pub fn is_beeping_permitted(&self) -> bool {
        self.state != MainState::Idle
    }

    /// Runs one main period and returns the state for the next tick.
    pub fn tick<B, P>(
        &mut self,
        board: &mut B,
        pads: &P,
        telemetry: &mut TelemetryRecorder,
        now: Duration,
    ) -> MainState
    where
        B: Board + ?Sized,
        P: PadInputs + ?Sized,
    {
        self.dip = board.dip_switches();
        self.switches = board
            .switch_status()
            .with_back_pad_as_mode(self.dip, pads.digital_input_value(Sensor::Back));

        let next = match self.state {
            MainState::VersionAnnounce => self.announce_version(board, telemetry, now),
            MainState::Startup => self.startup(board),
            MainState::OonapuSetup => {
                self.startup_ticks = self.config.ticks_for(NEUTRAL_GUARD_MS);
                Some(MainState::Oonapu)
            }
            MainState::Oonapu => self.neutral_guard(board, pads),
            MainState::DrivingSetup => {
                board.set_output(OutputId::PowerLed, true);
                (!self.switches.any_active()).then_some(MainState::Driving)
            }
            MainState::Driving => self.drive(board, pads),
            MainState::NoSwitchesThenDisabled => {
                (!self.switches.user_active()).then_some(MainState::Idle)
            }
            MainState::DrivingUserSwitch => {
                self.await_long_press(board, telemetry, now, MainState::Idle)
            }
            MainState::Idle => self.idle(board),
            MainState::ExitIdle => {
                self.await_long_press(board, telemetry, now, MainState::DrivingSetup)
            }
            MainState::BluetoothEnable => {
                self.run_handoff(board, telemetry, now, MainState::BluetoothSetup)
            }
            MainState::BluetoothSetup => {
                if self.switches.user_active() {
                    None
                } else {
                    board.set_output(OutputId::PowerLed, true);
                    Some(MainState::DoBluetooth)
                }
            }
            MainState::DoBluetooth => self.wireless_drive(board, pads, telemetry, now),
            MainState::BluetoothDisable => {
                self.run_handoff(board, telemetry, now, MainState::DrivingUserSwitch)
            }
            MainState::DrivingModeSwitch(phase) => self.mode_switch(board, phase),
        };

        if let Some(next) = next {
            self.transition(next, telemetry, now);
        }
        self.state
    }

    fn transition(&mut self, next: MainState, telemetry: &mut TelemetryRecorder, now: Duration) {
        if next != self.state {
            telemetry.record(
                TelemetryEventKind::StateChanged {
                    from: self.state,
                    to: next,
                },
                now,
            );
        }
        self.state = next;
    }

    fn announce_version<B>(
        &mut self,
        board: &mut B,
        telemetry: &mut TelemetryRecorder,
        now: Duration,
    ) -> Option<MainState>
    where
        B: Board + ?Sized,
    {
        if !self.version.is_armed() {
            self.version
                .arm(&VERSION_TABLE, &mut PadIndicators(&mut *board));
            telemetry.record(
                TelemetryEventKind::SequenceStarted {
                    kind: VERSION_TABLE.kind,
                    duration_ms: VERSION_TABLE.total_ms(),
                },
                now,
            );
            return None;
        }

        let period = self.config.main_period_ms();
        match self.version.advance(period, &mut PadIndicators(&mut *board)) {
            SequenceProgress::Complete => {
                clear_pad_leds(board);
                telemetry.record(TelemetryEventKind::SequenceComplete(VERSION_TABLE.kind), now);
                Some(MainState::Startup)
            }
            SequenceProgress::Holding | SequenceProgress::Stepped(_) => None,
        }
    }

    fn startup<B>(&mut self, board: &mut B) -> Option<MainState>
    where
        B: Board + ?Sized,
    {
        self.startup_ticks = self
            .startup_ticks
            .min(self.config.ticks_for(NEUTRAL_GUARD_MS))
            .saturating_sub(1);
        if self.startup_ticks > 0 {
            return None;
        }

        if self.dip.power_on_at_startup {
            board.set_output(OutputId::PowerLed, true);
            Some(MainState::OonapuSetup)
        } else {
            board.set_output(OutputId::PowerLed, false);
            Some(MainState::Idle)
        }
    }

    fn neutral_guard<B, P>(&mut self, board: &mut B, pads: &P) -> Option<MainState>
    where
        B: Board + ?Sized,
        P: PadInputs + ?Sized,
    {
        let ceiling = self.config.ticks_for(NEUTRAL_GUARD_MS);
        if !pads.pads_in_neutral_state() {
            self.startup_ticks = ceiling;
            return None;
        }

        mirror_pads(board, pads);
        self.startup_ticks = self.startup_ticks.min(ceiling).saturating_sub(1);
        (self.startup_ticks == 0).then_some(MainState::DrivingSetup)
    }

    fn drive<B, P>(&mut self, board: &mut B, pads: &P) -> Option<MainState>
    where
        B: Board + ?Sized,
        P: PadInputs + ?Sized,
    {
        let mut demand = DriveDemand::from_pads(pads, self.dip.reverse_suppressed);
        let mut next = None;

        if self.switches.user_active() {
            demand = DriveDemand::NEUTRAL;
            board.set_output(OutputId::PowerLed, false);
            board.request_cue(Cue::GotoIdle);
            self.switch_delay = self.long_press_ticks(board);
            next = Some(if self.switch_delay == 0 {
                MainState::NoSwitchesThenDisabled
            } else {
                MainState::DrivingUserSwitch
            });
        }

        // Evaluated second so the mode switch wins a simultaneous press.
        if self.switches.mode_active() {
            demand = DriveDemand::NEUTRAL;
            board.request_cue(Cue::ResumeDriving);
            self.start_reset_pulse(board, RESET_PULSE_MS);
            next = Some(MainState::DrivingModeSwitch(ModeSwitchPhase::Pulse1));
        }

        demand.apply(board);
        self.demand = demand;
        next
    }

    fn idle<B>(&mut self, board: &mut B) -> Option<MainState>
    where
        B: Board + ?Sized,
    {
        if !self.switches.user_active() {
            return None;
        }

        board.set_output(OutputId::PowerLed, true);
        board.request_cue(Cue::PowerOn);
        self.switch_delay = self.long_press_ticks(board);
        Some(if self.switch_delay == 0 {
            MainState::DrivingSetup
        } else {
            MainState::ExitIdle
        })
    }

    /// Counts down a held user switch. Expiry starts the wireless hand-off;
    /// an early release goes to `on_release`.
    fn await_long_press<B>(
        &mut self,
        board: &mut B,
        telemetry: &mut TelemetryRecorder,
        now: Duration,
        on_release: MainState,
    ) -> Option<MainState>
    where
        B: Board + ?Sized,
    {
        if !self.switches.user_active() {
            if on_release == MainState::Idle {
                board.set_output(OutputId::PowerLed, false);
            }
            return Some(on_release);
        }

        self.switch_delay = self.clamped_switch_delay().saturating_sub(1);
        if self.switch_delay > 0 {
            return None;
        }

        board.request_cue(Cue::Bluetooth);
        self.arm_handoff(board, &ENABLE_TABLE, telemetry, now);
        Some(MainState::BluetoothEnable)
    }

    fn arm_handoff<B>(
        &mut self,
        board: &mut B,
        table: &PulseTable,
        telemetry: &mut TelemetryRecorder,
        now: Duration,
    ) where
        B: Board + ?Sized,
    {
        self.handoff.arm(table, &mut WirelessPads(&mut *board));
        telemetry.record(
            TelemetryEventKind::SequenceStarted {
                kind: table.kind,
                duration_ms: table.total_ms(),
            },
            now,
        );
    }

    fn run_handoff<B>(
        &mut self,
        board: &mut B,
        telemetry: &mut TelemetryRecorder,
        now: Duration,
        on_complete: MainState,
    ) -> Option<MainState>
    where
        B: Board + ?Sized,
    {
        let period = self.config.main_period_ms();
        let progress = self.handoff.advance(period, &mut WirelessPads(&mut *board));
        if !progress.is_complete() {
            return None;
        }
        if let Some(kind) = self.handoff.kind() {
            telemetry.record(TelemetryEventKind::SequenceComplete(kind), now);
        }
        Some(on_complete)
    }

    fn wireless_drive<B, P>(
        &mut self,
        board: &mut B,
        pads: &P,
        telemetry: &mut TelemetryRecorder,
        now: Duration,
    ) -> Option<MainState>
    where
        B: Board + ?Sized,
        P: PadInputs + ?Sized,
    {
        if self.switches.user_active() {
            board.request_cue(Cue::GotoIdle);
            self.switch_delay = self.long_press_ticks(board);
            self.arm_handoff(board, &DISABLE_TABLE, telemetry, now);
            board.set_output(OutputId::PowerLed, false);
            return Some(MainState::BluetoothDisable);
        }

        let module_led = board.wireless_led_active();
        board.set_output(OutputId::PowerLed, !module_led);
        mirror_pads(board, pads);
        None
    }

    fn mode_switch<B>(&mut self, board: &mut B, phase: ModeSwitchPhase) -> Option<MainState>
    where
        B: Board + ?Sized,
    {
        if phase.is_hold_check() {
            if !self.switches.mode_active() {
                return Some(MainState::DrivingSetup);
            }
            self.switch_delay = self.clamped_switch_delay();
            if self.switch_delay > 0 {
                self.switch_delay -= 1;
                return None;
            }
            return Some(match phase {
                ModeSwitchPhase::HoldCheck1 => {
                    board.request_cue(Cue::ResumeDriving);
                    self.start_reset_pulse(board, RESET_PULSE_MS);
                    MainState::DrivingModeSwitch(ModeSwitchPhase::Pulse2)
                }
                _ => {
                    board.request_cue(Cue::RnetSleep);
                    self.start_reset_pulse(board, SLEEP_PULSE_MS);
                    MainState::DrivingModeSwitch(ModeSwitchPhase::SleepPulse)
                }
            });
        }

        if self.pulse_ticks == 0 {
            return Some(MainState::DrivingSetup);
        }
        self.pulse_ticks -= 1;
        if self.pulse_ticks > 0 {
            return None;
        }

        let next = match phase {
            ModeSwitchPhase::Pulse1 => {
                board.set_output(OutputId::ResetOut, false);
                self.switch_delay = self.mode_hold_ticks(board);
                MainState::DrivingModeSwitch(ModeSwitchPhase::HoldCheck1)
            }
            ModeSwitchPhase::Pulse2 => {
                board.set_output(OutputId::ResetOut, false);
                self.pulse_ticks = self.config.ticks_for(RESET_GAP_MS);
                MainState::DrivingModeSwitch(ModeSwitchPhase::Gap)
            }
            ModeSwitchPhase::Gap => {
                board.request_cue(Cue::ResumeDriving);
                self.start_reset_pulse(board, RESET_PULSE_MS);
                MainState::DrivingModeSwitch(ModeSwitchPhase::Pulse3)
            }
            ModeSwitchPhase::Pulse3 => {
                board.set_output(OutputId::ResetOut, false);
                self.switch_delay = self.mode_hold_ticks(board);
                MainState::DrivingModeSwitch(ModeSwitchPhase::HoldCheck2)
            }
            ModeSwitchPhase::SleepPulse
            | ModeSwitchPhase::HoldCheck1
            | ModeSwitchPhase::HoldCheck2 => {
                board.set_output(OutputId::ResetOut, false);
                MainState::DrivingSetup
            }
        };
        Some(next)
    }

    fn start_reset_pulse<B>(&mut self, board: &mut B, width_ms: u16)
    where
        B: Board + ?Sized,
    {
        self.pulse_ticks = self.config.ticks_for(width_ms);
        board.set_output(OutputId::ResetOut, true);
    }

    fn long_press_ticks<B>(&self, board: &mut B) -> u16
    where
        B: Board + ?Sized,
    {
        let delay = self.config.delay_converter().convert(board.read_delay_pot());
        self.config.ticks_for(delay)
    }

    /// Countdown bounded by the longest delay the pot can select.
    fn clamped_switch_delay(&self) -> u16 {
        self.switch_delay
            .min(self.config.ticks_for(DELAY_CEILING_MS))
    }

    fn mode_hold_ticks<B>(&self, board: &mut B) -> u16
    where
        B: Board + ?Sized,
    {
        let delay = self.config.delay_converter().convert(board.read_delay_pot());
        self.config.ticks_for(delay.max(MODE_HOLD_MIN_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CueSink, DelayPot, PadReader, SwitchReader};
    use crate::head_array::PadSnapshot;
    use crate::sequences::PulseSequenceKind;
    use heapless::Vec;

    #[derive(Default)]
    struct Bench {
        switches: SwitchStatus,
        dip: DipSwitches,
        pot: u16,
        module_led: bool,
        outputs: [bool; crate::board::OUTPUT_COUNT],
        mirrors: [bool; 4],
        cues: Vec<Cue, 32>,
    }

    impl Bench {
        fn output(&self, id: OutputId) -> bool {
            self.outputs[id.as_index()]
        }
    }

    impl PadReader for Bench {
        fn pad_is_active(&mut self, _: Sensor) -> bool {
            false
        }
    }

    impl SwitchReader for Bench {
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

    impl DelayPot for Bench {
        fn read_delay_pot(&mut self) -> u16 {
            self.pot
        }
    }

    impl OutputSink for Bench {
        fn set_output(&mut self, id: OutputId, active: bool) {
            self.outputs[id.as_index()] = active;
        }

        fn set_wireless_pad_mirror(&mut self, sensor: Sensor, active: bool) {
            self.mirrors[sensor.as_index()] = active;
        }
    }

    impl CueSink for Bench {
        fn request_cue(&mut self, cue: Cue) {
            let _ = self.cues.push(cue);
        }
    }

    struct Rig {
        controller: MainController,
        bench: Bench,
        pads: PadSnapshot,
        telemetry: TelemetryRecorder,
        now: Duration,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                controller: MainController::new(ControllerConfig::default()),
                bench: Bench::default(),
                pads: PadSnapshot::NEUTRAL,
                telemetry: TelemetryRecorder::new(),
                now: Duration::ZERO,
            }
        }

        fn tick(&mut self) -> MainState {
            self.now += self.controller.config().main_period();
            self.controller
                .tick(&mut self.bench, &self.pads, &mut self.telemetry, self.now)
        }

        fn run_until(&mut self, target: MainState, limit: usize) {
            for _ in 0..limit {
                if self.tick() == target {
                    return;
                }
            }
            panic!(
                "never reached {target}, stuck in {}",
                self.controller.state()
            );
        }

        fn boot_to_driving(&mut self) {
            self.bench.dip.power_on_at_startup = true;
            self.run_until(MainState::Driving, 400);
        }
    }

    #[test]
    fn version_announcement_blinks_then_clears() {
        let mut rig = Rig::new();
        rig.tick();
        assert_eq!(rig.controller.state(), MainState::VersionAnnounce);

        for _ in 0..35 {
            rig.tick();
        }
        assert!(rig.bench.output(OutputId::ForwardPadLed));

        rig.run_until(MainState::Startup, 200);
        assert!(OutputId::PAD_LEDS.iter().all(|led| !rig.bench.output(*led)));
    }

    #[test]
    fn startup_counter_is_clamped_to_guard_window() {
        let mut rig = Rig::new();
        rig.run_until(MainState::Startup, 200);

        let mut ticks = 0;
        while rig.controller.state() == MainState::Startup {
            rig.tick();
            ticks += 1;
        }
        assert_eq!(ticks, 50);
        assert_eq!(rig.controller.state(), MainState::Idle);
        assert!(!rig.bench.output(OutputId::PowerLed));
        assert!(!rig.controller.is_beeping_permitted());
    }

    #[test]
    fn neutral_guard_restarts_while_a_pad_is_held() {
        let mut rig = Rig::new();
        rig.bench.dip.power_on_at_startup = true;
        rig.run_until(MainState::Oonapu, 400);

        rig.pads = PadSnapshot::from_levels([true, false, false, false]);
        for _ in 0..100 {
            assert_eq!(rig.tick(), MainState::Oonapu);
        }

        rig.pads = PadSnapshot::NEUTRAL;
        for _ in 0..49 {
            assert_eq!(rig.tick(), MainState::Oonapu);
        }
        assert_eq!(rig.tick(), MainState::DrivingSetup);
        assert!(rig.bench.output(OutputId::PowerLed));
    }

    #[test]
    fn driving_setup_waits_for_switches_to_clear() {
        let mut rig = Rig::new();
        rig.bench.dip.power_on_at_startup = true;
        rig.run_until(MainState::DrivingSetup, 400);

        rig.bench.switches = SwitchStatus::new(false, true);
        assert_eq!(rig.tick(), MainState::DrivingSetup);
        rig.bench.switches = SwitchStatus::NONE;
        assert_eq!(rig.tick(), MainState::Driving);
    }

    #[test]
    fn mode_press_outranks_user_press() {
        let mut rig = Rig::new();
        rig.boot_to_driving();
        rig.bench.pot = 500;
        rig.pads = PadSnapshot::from_levels([false, false, true, false]);
        rig.bench.switches = SwitchStatus::new(true, true);

        assert_eq!(
            rig.tick(),
            MainState::DrivingModeSwitch(ModeSwitchPhase::Pulse1)
        );
        assert!(rig.bench.output(OutputId::ResetOut));
        assert!(!rig.bench.output(OutputId::ForwardDemand));
        assert!(rig.controller.drive_demand().is_neutral());
        assert_eq!(
            &rig.bench.cues[rig.bench.cues.len() - 2..],
            &[Cue::GotoIdle, Cue::ResumeDriving]
        );
    }

    #[test]
    fn back_pad_acts_as_mode_switch_with_sw1() {
        let mut rig = Rig::new();
        rig.bench.dip.reverse_suppressed = true;
        rig.boot_to_driving();

        rig.pads = PadSnapshot::from_levels([false, false, false, true]);
        assert_eq!(
            rig.tick(),
            MainState::DrivingModeSwitch(ModeSwitchPhase::Pulse1)
        );
        assert!(!rig.bench.output(OutputId::ReverseDemand));
    }

    #[test]
    fn full_mode_switch_pattern_with_switch_held() {
        let mut rig = Rig::new();
        rig.boot_to_driving();
        rig.bench.switches = SwitchStatus::new(false, true);

        let mut reset_high_ticks = 0;
        let mut ticks = 0;
        loop {
            let state = rig.tick();
            ticks += 1;
            if rig.bench.output(OutputId::ResetOut) {
                reset_high_ticks += 1;
            }
            if state == MainState::DrivingSetup {
                break;
            }
            assert!(ticks < 1_000, "mode switch pattern never finished");
        }

        // 100 + 100 + 100 + 3000 ms high at 10 ms per tick.
        assert_eq!(reset_high_ticks, 330);
        assert!(!rig.bench.output(OutputId::ResetOut));
        let cues: Vec<Cue, 4> = rig
            .bench
            .cues
            .iter()
            .copied()
            .filter(|cue| *cue != Cue::PadActive)
            .collect();
        assert_eq!(
            cues.as_slice(),
            &[
                Cue::ResumeDriving,
                Cue::ResumeDriving,
                Cue::ResumeDriving,
                Cue::RnetSleep
            ]
        );
    }

    #[test]
    fn releasing_mode_switch_at_checkpoint_returns_to_driving() {
        let mut rig = Rig::new();
        rig.boot_to_driving();
        rig.bench.switches = SwitchStatus::new(false, true);
        rig.run_until(MainState::DrivingModeSwitch(ModeSwitchPhase::HoldCheck1), 20);
        assert!(!rig.bench.output(OutputId::ResetOut));

        rig.bench.switches = SwitchStatus::NONE;
        assert_eq!(rig.tick(), MainState::DrivingSetup);
        assert_eq!(rig.tick(), MainState::Driving);
    }

    #[test]
    fn releasing_mode_switch_at_second_checkpoint_skips_sleep_pulse() {
        let mut rig = Rig::new();
        rig.boot_to_driving();
        rig.bench.switches = SwitchStatus::new(false, true);
        rig.run_until(MainState::DrivingModeSwitch(ModeSwitchPhase::HoldCheck2), 400);
        assert!(!rig.bench.output(OutputId::ResetOut));

        rig.bench.switches = SwitchStatus::NONE;
        assert_eq!(rig.tick(), MainState::DrivingSetup);
        assert!(!rig.bench.output(OutputId::ResetOut));
        assert!(!rig.bench.cues.contains(&Cue::RnetSleep));
        assert_eq!(rig.tick(), MainState::Driving);
    }

    #[test]
    fn hold_counters_are_clamped_to_pot_ceiling() {
        let ceiling = ControllerConfig::default().ticks_for(DELAY_CEILING_MS);

        let mut rig = Rig::new();
        rig.boot_to_driving();
        rig.bench.pot = 500;
        rig.bench.switches = SwitchStatus::new(true, false);
        assert_eq!(rig.tick(), MainState::DrivingUserSwitch);
        rig.controller.switch_delay = u16::MAX;
        assert_eq!(rig.tick(), MainState::DrivingUserSwitch);
        assert_eq!(rig.controller.switch_delay(), ceiling - 1);

        let mut rig = Rig::new();
        rig.boot_to_driving();
        rig.bench.switches = SwitchStatus::new(false, true);
        rig.run_until(MainState::DrivingModeSwitch(ModeSwitchPhase::HoldCheck1), 20);
        rig.controller.switch_delay = u16::MAX;
        assert_eq!(
            rig.tick(),
            MainState::DrivingModeSwitch(ModeSwitchPhase::HoldCheck1)
        );
        assert_eq!(rig.controller.switch_delay(), ceiling - 1);
    }

    #[test]
    fn wireless_mode_blinks_power_led_against_module_led() {
        let mut rig = Rig::new();
        rig.bench.pot = 200;
        rig.bench.switches = SwitchStatus::new(true, false);
        rig.run_until(MainState::BluetoothSetup, 800);

        rig.bench.switches = SwitchStatus::NONE;
        assert_eq!(rig.tick(), MainState::DoBluetooth);

        rig.bench.module_led = true;
        rig.pads = PadSnapshot::from_levels([false, true, false, false]);
        rig.tick();
        assert!(!rig.bench.output(OutputId::PowerLed));
        assert_eq!(rig.bench.mirrors, [false, true, false, false]);

        rig.bench.module_led = false;
        rig.tick();
        assert!(rig.bench.output(OutputId::PowerLed));
    }

    #[test]
    fn leaving_wireless_runs_disable_then_rearms_long_press() {
        let mut rig = Rig::new();
        rig.bench.pot = 200;
        rig.bench.switches = SwitchStatus::new(true, false);
        rig.run_until(MainState::BluetoothSetup, 800);
        rig.bench.switches = SwitchStatus::NONE;
        rig.run_until(MainState::DoBluetooth, 2);

        rig.bench.switches = SwitchStatus::new(true, false);
        assert_eq!(rig.tick(), MainState::BluetoothDisable);
        assert!(!rig.bench.output(OutputId::PowerLed));
        assert_eq!(rig.controller.switch_delay(), 120);

        rig.bench.switches = SwitchStatus::NONE;
        for _ in 0..23 {
            assert_eq!(rig.tick(), MainState::BluetoothDisable);
        }
        assert_eq!(rig.tick(), MainState::DrivingUserSwitch);
        assert_eq!(rig.tick(), MainState::Idle);

        let completed: Vec<PulseSequenceKind, 4> = rig
            .telemetry
            .oldest_first()
            .filter_map(|record| match record.event {
                TelemetryEventKind::SequenceComplete(kind) => Some(kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            completed.as_slice(),
            &[
                PulseSequenceKind::VersionAnnounce,
                PulseSequenceKind::WirelessEnable,
                PulseSequenceKind::WirelessDisable,
            ]
        );
    }
}
