//! Owned aggregate tying the scheduler, input processor, and controller together.
//!
//! Firmware and the emulator both hold one [`HeadArraySystem`] and call
//! [`HeadArraySystem::run_pass`] whenever their clock advances. The pass runs
//! every due task to completion in priority order.

use core::fmt;
use core::time::Duration;

use crate::board::Board;
use crate::config::{
    ConfigError, ControllerConfig, HEAD_ARRAY_TASK_PRIORITY, MAIN_TASK_PRIORITY,
};
use crate::controller::{MainController, MainState};
use crate::head_array::{HeadArray, PadInputs, Sensor};
use crate::scheduler::{CooperativeScheduler, DueTasks, ScheduleError, TaskId};
use crate::telemetry::TelemetryRecorder;

/// Startup failures.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SystemError {
    Config(ConfigError),
    Schedule(ScheduleError),
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemError::Config(err) => write!(f, "config: {err}"),
            SystemError::Schedule(err) => write!(f, "schedule: {err}"),
        }
    }
}

impl From<ConfigError> for SystemError {
    fn from(value: ConfigError) -> Self {
        SystemError::Config(value)
    }
}

impl From<ScheduleError> for SystemError {
    fn from(value: ScheduleError) -> Self {
        SystemError::Schedule(value)
    }
}

/// Summary of one scheduler pass.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PassReport {
    pub ran: DueTasks,
    pub state: MainState,
}

/// Process-lifetime owner of every control component.
pub struct HeadArraySystem {
    scheduler: CooperativeScheduler,
    head_array: HeadArray,
    controller: MainController,
    telemetry: TelemetryRecorder,
}

impl HeadArraySystem {
    /// Builds the system and registers both periodic tasks.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::Schedule`] if the tasks cannot be registered.
    pub fn new(config: ControllerConfig) -> Result<Self, SystemError> {
        let mut scheduler = CooperativeScheduler::new();
        scheduler.register(
            TaskId::HeadArrayInput,
            HEAD_ARRAY_TASK_PRIORITY,
            config.input_period(),
        )?;
        scheduler.register(TaskId::MainControl, MAIN_TASK_PRIORITY, config.main_period())?;

        Ok(Self {
            scheduler,
            head_array: HeadArray::new(),
            controller: MainController::new(config),
            telemetry: TelemetryRecorder::new(),
        })
    }

    /// Runs every task due at `now`.
    pub fn run_pass<B>(&mut self, board: &mut B, now: Duration) -> PassReport
    where
        B: Board + ?Sized,
    {
        let ran = self.scheduler.due(now);
        for task in &ran {
            match task {
                TaskId::HeadArrayInput => {
                    self.head_array.tick(board, &mut self.telemetry, now);
                }
                TaskId::MainControl => {
                    self.controller
                        .tick(board, &self.head_array, &mut self.telemetry, now);
                }
            }
        }
        PassReport {
            ran,
            state: self.controller.state(),
        }
    }

    /// Time at which the next pass has work to do.
    #[must_use]
    pub fn next_wake(&self) -> Option<Duration> {
        self.scheduler.next_wake()
    }

    #[must_use]
    pub const fn state(&self) -> MainState {
        self.controller.state()
    }

    #[must_use]
    pub fn is_beeping_permitted(&self) -> bool {
        self.controller.is_beeping_permitted()
    }

    #[must_use]
    pub fn pads_in_neutral_state(&self) -> bool {
        self.head_array.pads_in_neutral_state()
    }

    #[must_use]
    pub fn digital_input_value(&self, sensor: Sensor) -> bool {
        self.head_array.digital_input_value(sensor)
    }

    #[must_use]
    pub const fn controller(&self) -> &MainController {
        &self.controller
    }

    #[must_use]
    pub const fn telemetry(&self) -> &TelemetryRecorder {
        &self.telemetry
    }
}
