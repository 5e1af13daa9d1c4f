//! State tags for the main control state machine.

use core::fmt;

/// Phases of the reset-line pattern sent while the mode switch is held.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ModeSwitchPhase {
    /// Reset high for 100 ms.
    Pulse1,
    /// Reset low while the switch must stay held for the hold delay.
    HoldCheck1,
    /// Reset high for 100 ms.
    Pulse2,
    /// Reset low for 200 ms.
    Gap,
    /// Reset high for 100 ms.
    Pulse3,
    /// Reset low while the switch must stay held for the hold delay.
    HoldCheck2,
    /// Reset high for 3000 ms to put the chair bus to sleep.
    SleepPulse,
}

impl ModeSwitchPhase {
    /// Returns `true` for the phases gated on the switch staying held.
    #[must_use]
    pub const fn is_hold_check(self) -> bool {
        matches!(self, ModeSwitchPhase::HoldCheck1 | ModeSwitchPhase::HoldCheck2)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ModeSwitchPhase::Pulse1 => "pulse-1",
            ModeSwitchPhase::HoldCheck1 => "hold-check-1",
            ModeSwitchPhase::Pulse2 => "pulse-2",
            ModeSwitchPhase::Gap => "gap",
            ModeSwitchPhase::Pulse3 => "pulse-3",
            ModeSwitchPhase::HoldCheck2 => "hold-check-2",
            ModeSwitchPhase::SleepPulse => "sleep-pulse",
        }
    }
}

/// Current state of the main controller.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MainState {
    VersionAnnounce,
    Startup,
    /// Arms the out-of-neutral-at-power-up guard.
    OonapuSetup,
    /// Waits for the pads to sit in neutral before allowing drive.
    Oonapu,
    DrivingSetup,
    Driving,
    NoSwitchesThenDisabled,
    DrivingUserSwitch,
    Idle,
    ExitIdle,
    BluetoothEnable,
    BluetoothSetup,
    DoBluetooth,
    BluetoothDisable,
    DrivingModeSwitch(ModeSwitchPhase),
}

impl MainState {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            MainState::VersionAnnounce => "version-announce",
            MainState::Startup => "startup",
            MainState::OonapuSetup => "oonapu-setup",
            MainState::Oonapu => "oonapu",
            MainState::DrivingSetup => "driving-setup",
            MainState::Driving => "driving",
            MainState::NoSwitchesThenDisabled => "no-switches-then-disabled",
            MainState::DrivingUserSwitch => "driving-user-switch",
            MainState::Idle => "idle",
            MainState::ExitIdle => "exit-idle",
            MainState::BluetoothEnable => "bluetooth-enable",
            MainState::BluetoothSetup => "bluetooth-setup",
            MainState::DoBluetooth => "do-bluetooth",
            MainState::BluetoothDisable => "bluetooth-disable",
            MainState::DrivingModeSwitch(_) => "driving-mode-switch",
        }
    }
}

impl fmt::Display for MainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MainState::DrivingModeSwitch(phase) => {
                write!(f, "{}/{}", self.label(), phase.label())
            }
            _ => f.write_str(self.label()),
        }
    }
}
