use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::adc::{Adc, AdcChannel};
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_sync::channel::Channel;
use headarray_core::{ControllerConfig, HeadArraySystem};
use static_cell::StaticCell;

use crate::cues::CueQueue;
use crate::hw::{DelayPotAdc, HardwareBoard, PadPins, SwitchPins};

mod control_task;
mod cue_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

pub(super) static CUE_QUEUE: CueQueue = Channel::new();
static SYSTEM: StaticCell<HeadArraySystem> = StaticCell::new();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA0,
        PA1,
        PA2,
        PA3,
        PA4,
        PA5,
        PA6,
        PA7,
        PA8,
        PA9,
        PA10,
        PA11,
        PA12,
        PA15,
        PB0,
        PB1,
        PB2,
        PB3,
        PB4,
        PB5,
        PB6,
        PB7,
        PB8,
        PB9,
        PC6,
        ADC1,
        ..
    } = hal::init(config);

    let pads = PadPins {
        pads: [
            Input::new(PA0, Pull::Up),
            Input::new(PA1, Pull::Up),
            Input::new(PA2, Pull::Up),
            Input::new(PA3, Pull::Up),
        ],
    };
    let switches = SwitchPins {
        user: Input::new(PA5, Pull::Up),
        mode: Input::new(PA6, Pull::Up),
        dip_sw1: Input::new(PA7, Pull::Up),
        dip_sw3: Input::new(PA8, Pull::Up),
        wireless_led: Input::new(PA9, Pull::Up),
    };
    let pot = DelayPotAdc::new(Adc::new(ADC1), PA4.degrade_adc());

    // Order follows OutputId::ALL.
    let outputs = [
        Output::new(PB0, Level::Low, Speed::Low),
        Output::new(PB1, Level::Low, Speed::Low),
        Output::new(PB2, Level::Low, Speed::Low),
        Output::new(PB3, Level::Low, Speed::Low),
        Output::new(PB4, Level::Low, Speed::Low),
        Output::new(PB5, Level::Low, Speed::Low),
        Output::new(PB6, Level::Low, Speed::Low),
        Output::new(PB7, Level::Low, Speed::Low),
        Output::new(PB8, Level::Low, Speed::Low),
        Output::new(PB9, Level::Low, Speed::Low),
    ];
    // Mirrors idle high (inactive).
    let mirrors = [
        Output::new(PA10, Level::High, Speed::Low),
        Output::new(PA11, Level::High, Speed::Low),
        Output::new(PA12, Level::High, Speed::Low),
        Output::new(PA15, Level::High, Speed::Low),
    ];
    let beeper = Output::new(PC6, Level::Low, Speed::Low);

    let board = HardwareBoard::new(pads, switches, pot, outputs, mirrors, CUE_QUEUE.sender());
    let system = SYSTEM.init(
        HeadArraySystem::new(ControllerConfig::default()).expect("controller configuration"),
    );

    spawner
        .spawn(control_task::run(system, board))
        .expect("failed to spawn control task");

    spawner
        .spawn(cue_task::run(CUE_QUEUE.receiver(), beeper))
        .expect("failed to spawn cue task");

    core::future::pending::<()>().await;
}
