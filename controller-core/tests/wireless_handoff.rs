mod common;

use common::Harness;
use headarray_core::sequences::{DISABLE_TABLE, ENABLE_TABLE, PulseSequenceKind};
use headarray_core::telemetry::TelemetryEventKind;
use headarray_core::{Cue, MainState, OutputId, Sensor};

/// Long-presses the user switch from idle until the enable sequence is armed.
fn enter_bluetooth_enable(harness: &mut Harness) {
    harness.boot_to_idle();
    harness.board.pot = 200;
    harness.board.user(true);
    harness.run_until(MainState::BluetoothEnable, 200);
}

fn collapse(levels: &[[bool; 4]]) -> Vec<bool> {
    let mut collapsed: Vec<bool> = Vec::new();
    for mirrors in levels {
        assert!(
            mirrors.iter().all(|level| *level == mirrors[0]),
            "every mirror carries the same level during a hand-off"
        );
        if collapsed.last() != Some(&mirrors[0]) {
            collapsed.push(mirrors[0]);
        }
    }
    collapsed
}

#[test]
fn enable_sequence_completes_then_waits_for_release() {
    let mut harness = Harness::new();
    enter_bluetooth_enable(&mut harness);
    assert_eq!(harness.board.cues.last(), Some(&Cue::Bluetooth));
    harness.board.user(false);

    let ticks = ENABLE_TABLE.total_ms() / 10;
    for _ in 1..ticks {
        assert_eq!(harness.step(), MainState::BluetoothEnable);
    }
    assert_eq!(harness.step(), MainState::BluetoothSetup);
    assert_eq!(harness.step(), MainState::DoBluetooth);
    assert!(harness.board.output(OutputId::PowerLed));
}

#[test]
fn enable_pulses_reach_every_mirror_in_order() {
    let mut harness = Harness::new();
    enter_bluetooth_enable(&mut harness);
    let armed_at = harness.board.mirror_writes.len() - 1;
    harness.board.user(false);
    harness.run_until(MainState::BluetoothSetup, 40);

    let written = collapse(&harness.board.mirror_writes[armed_at..]);
    assert_eq!(
        written,
        vec![false, true, false, true, false, true, false, true, false]
    );
}

#[test]
fn setup_holds_while_user_switch_is_still_pressed() {
    let mut harness = Harness::new();
    enter_bluetooth_enable(&mut harness);

    harness.run_until(MainState::BluetoothSetup, 40);
    harness.steps(25);
    assert_eq!(harness.state(), MainState::BluetoothSetup);

    harness.board.user(false);
    assert_eq!(harness.step(), MainState::DoBluetooth);
}

#[test]
fn wireless_mode_mirrors_resolved_pads() {
    let mut harness = Harness::new();
    enter_bluetooth_enable(&mut harness);
    harness.board.user(false);
    harness.run_until(MainState::DoBluetooth, 40);

    harness.board.press(Sensor::Center);
    harness.steps(2);
    assert_eq!(harness.board.mirrors, [false, false, true, false]);
    assert!(!harness.board.output(OutputId::ForwardDemand));

    harness.board.press(Sensor::Back);
    harness.steps(2);
    assert_eq!(harness.board.mirrors, [false; 4]);
}

#[test]
fn disable_sequence_hands_back_to_long_press_detection() {
    let mut harness = Harness::new();
    enter_bluetooth_enable(&mut harness);
    harness.board.user(false);
    harness.run_until(MainState::DoBluetooth, 40);
    let armed_at = harness.board.mirror_writes.len();

    harness.board.user(true);
    assert_eq!(harness.step(), MainState::BluetoothDisable);
    assert_eq!(harness.board.cues.last(), Some(&Cue::GotoIdle));
    assert!(!harness.board.output(OutputId::PowerLed));

    let ticks = DISABLE_TABLE.total_ms() / 10;
    for _ in 1..ticks {
        assert_eq!(harness.step(), MainState::BluetoothDisable);
    }
    assert_eq!(harness.step(), MainState::DrivingUserSwitch);
    assert_eq!(
        collapse(&harness.board.mirror_writes[armed_at..]),
        vec![false, true, false, true, false, true, false]
    );

    // Still held: the long-press counter taken when leaving wireless runs out
    // and re-enters wireless control.
    harness.run_until(MainState::BluetoothEnable, 200);
}

#[test]
fn hand_off_sequences_are_recorded() {
    let mut harness = Harness::new();
    enter_bluetooth_enable(&mut harness);
    harness.board.user(false);
    harness.run_until(MainState::DoBluetooth, 40);

    let sequences: Vec<TelemetryEventKind> = harness
        .system
        .telemetry()
        .oldest_first()
        .map(|record| record.event)
        .filter(|event| {
            matches!(
                event,
                TelemetryEventKind::SequenceStarted {
                    kind: PulseSequenceKind::WirelessEnable,
                    ..
                } | TelemetryEventKind::SequenceComplete(PulseSequenceKind::WirelessEnable)
            )
        })
        .collect();
    assert_eq!(
        sequences,
        vec![
            TelemetryEventKind::SequenceStarted {
                kind: PulseSequenceKind::WirelessEnable,
                duration_ms: ENABLE_TABLE.total_ms(),
            },
            TelemetryEventKind::SequenceComplete(PulseSequenceKind::WirelessEnable),
        ]
    );
}

#[test]
fn beeping_is_permitted_everywhere_but_idle() {
    let mut harness = Harness::new();
    harness.boot_to_idle();
    assert!(!harness.system.is_beeping_permitted());

    harness.board.pot = 200;
    harness.board.user(true);
    harness.step();
    assert_eq!(harness.state(), MainState::ExitIdle);
    assert!(harness.system.is_beeping_permitted());
}
