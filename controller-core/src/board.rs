//! Board-facing capability traits and the value types that cross them.
//!
//! Everything the core needs from the outside world (pad contacts, switch
//! jacks, the delay pot, indicator and demand outputs, the wireless module's
//! input lines, and the beeper) is reached through these traits so the same
//! logic runs on the STM32 target, in the emulator, and in host tests.

use core::fmt;

use crate::head_array::Sensor;

/// Logical outputs driven by the core.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OutputId {
    LeftPadLed,
    RightPadLed,
    ForwardPadLed,
    ReversePadLed,
    PowerLed,
    ForwardDemand,
    ReverseDemand,
    LeftDemand,
    RightDemand,
    /// Reset line into the chair's control module, pulsed by the mode switch.
    ResetOut,
}

/// Number of distinct [`OutputId`] values.
pub const OUTPUT_COUNT: usize = 10;

impl OutputId {
    /// Every output in index order.
    pub const ALL: [OutputId; OUTPUT_COUNT] = [
        OutputId::LeftPadLed,
        OutputId::RightPadLed,
        OutputId::ForwardPadLed,
        OutputId::ReversePadLed,
        OutputId::PowerLed,
        OutputId::ForwardDemand,
        OutputId::ReverseDemand,
        OutputId::LeftDemand,
        OutputId::RightDemand,
        OutputId::ResetOut,
    ];

    /// The four per-pad indicator LEDs.
    pub const PAD_LEDS: [OutputId; 4] = [
        OutputId::LeftPadLed,
        OutputId::RightPadLed,
        OutputId::ForwardPadLed,
        OutputId::ReversePadLed,
    ];

    /// Deterministic index for table lookups.
    #[must_use]
    pub const fn as_index(self) -> usize {
        match self {
            OutputId::LeftPadLed => 0,
            OutputId::RightPadLed => 1,
            OutputId::ForwardPadLed => 2,
            OutputId::ReversePadLed => 3,
            OutputId::PowerLed => 4,
            OutputId::ForwardDemand => 5,
            OutputId::ReverseDemand => 6,
            OutputId::LeftDemand => 7,
            OutputId::RightDemand => 8,
            OutputId::ResetOut => 9,
        }
    }

    /// Short label used by logs and the emulator.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            OutputId::LeftPadLed => "led-left",
            OutputId::RightPadLed => "led-right",
            OutputId::ForwardPadLed => "led-forward",
            OutputId::ReversePadLed => "led-reverse",
            OutputId::PowerLed => "led-power",
            OutputId::ForwardDemand => "demand-forward",
            OutputId::ReverseDemand => "demand-reverse",
            OutputId::LeftDemand => "demand-left",
            OutputId::RightDemand => "demand-right",
            OutputId::ResetOut => "reset-out",
        }
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Audible feedback patterns requested from the beeper.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Cue {
    PadActive,
    GotoIdle,
    PowerOn,
    Bluetooth,
    ResumeDriving,
    RnetSleep,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Cue::PadActive => "pad-active",
            Cue::GotoIdle => "goto-idle",
            Cue::PowerOn => "power-on",
            Cue::Bluetooth => "bluetooth",
            Cue::ResumeDriving => "resume-driving",
            Cue::RnetSleep => "rnet-sleep",
        };
        f.write_str(label)
    }
}

/// Bitmask of the external user and mode switch jacks.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SwitchStatus(u8);

impl SwitchStatus {
    pub const USER: u8 = 0x01;
    pub const MODE: u8 = 0x02;

    /// Neither switch pressed.
    pub const NONE: Self = Self(0);

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & (Self::USER | Self::MODE))
    }

    #[must_use]
    pub const fn new(user: bool, mode: bool) -> Self {
        let mut bits = 0;
        if user {
            bits |= Self::USER;
        }
        if mode {
            bits |= Self::MODE;
        }
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn user_active(self) -> bool {
        self.0 & Self::USER != 0
    }

    #[must_use]
    pub const fn mode_active(self) -> bool {
        self.0 & Self::MODE != 0
    }

    /// Returns `true` when either switch is pressed.
    #[must_use]
    pub const fn any_active(self) -> bool {
        self.0 != 0
    }

    /// Folds the back pad into the mode bit when the board is configured to
    /// use it as a mode switch.
    #[must_use]
    pub const fn with_back_pad_as_mode(self, dip: DipSwitches, back_pad_active: bool) -> Self {
        if dip.reverse_suppressed && back_pad_active {
            Self(self.0 | Self::MODE)
        } else {
            self
        }
    }
}

/// Installer-set configuration switches on the controller board.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DipSwitches {
    /// SW1: suppress reverse drive and treat the back pad as the mode switch.
    pub reverse_suppressed: bool,
    /// SW3: power up ready to drive instead of waiting in idle.
    pub power_on_at_startup: bool,
}

impl DipSwitches {
    #[must_use]
    pub const fn new(reverse_suppressed: bool, power_on_at_startup: bool) -> Self {
        Self {
            reverse_suppressed,
            power_on_at_startup,
        }
    }
}

/// Raw pad contact reader.
pub trait PadReader {
    /// Returns `true` while the operator is touching the pad.
    fn pad_is_active(&mut self, sensor: Sensor) -> bool;
}

/// External switch jacks, DIP switches, and the wireless module's status LED.
pub trait SwitchReader {
    /// Returns the raw state of the user and mode jacks.
    fn switch_status(&mut self) -> SwitchStatus;

    /// Returns the DIP switch configuration.
    fn dip_switches(&mut self) -> DipSwitches;

    /// Returns `true` while the wireless module's activity LED is lit.
    fn wireless_led_active(&mut self) -> bool;
}

/// Delay potentiometer sampler.
pub trait DelayPot {
    /// Returns a raw 10-bit sample of the delay pot.
    fn read_delay_pot(&mut self) -> u16;
}

/// Digital outputs and the wireless module's pad mirror inputs.
pub trait OutputSink {
    /// Drives an output. Repeating the current level has no effect.
    fn set_output(&mut self, id: OutputId, active: bool);

    /// Drives the wireless module input that mirrors `sensor`.
    fn set_wireless_pad_mirror(&mut self, sensor: Sensor, active: bool);
}

/// Audible feedback collaborator.
pub trait CueSink {
    /// Requests a cue. Requests may be dropped while another cue plays.
    fn request_cue(&mut self, cue: Cue);
}

/// Everything the control loop needs from the hardware.
pub trait Board: PadReader + SwitchReader + DelayPot + OutputSink + CueSink {}

impl<T> Board for T where T: PadReader + SwitchReader + DelayPot + OutputSink + CueSink {}

/// Board that reads every input as idle and discards every output.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopBoard;

impl NoopBoard {
    /// Creates a new no-op board.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PadReader for NoopBoard {
    fn pad_is_active(&mut self, _: Sensor) -> bool {
        false
    }
}

impl SwitchReader for NoopBoard {
    fn switch_status(&mut self) -> SwitchStatus {
        SwitchStatus::NONE
    }

    fn dip_switches(&mut self) -> DipSwitches {
        DipSwitches::default()
    }

    fn wireless_led_active(&mut self) -> bool {
        false
    }
}

impl DelayPot for NoopBoard {
    fn read_delay_pot(&mut self) -> u16 {
        0
    }
}

impl OutputSink for NoopBoard {
    fn set_output(&mut self, _: OutputId, _: bool) {}

    fn set_wireless_pad_mirror(&mut self, _: Sensor, _: bool) {}
}

impl CueSink for NoopBoard {
    fn request_cue(&mut self, _: Cue) {}
}
