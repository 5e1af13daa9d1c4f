//! Cooperative, priority-ordered periodic scheduling.
//!
//! Tasks never preempt each other. Each scheduler pass collects every task
//! whose period has elapsed and hands them back lowest priority value first,
//! so the head-array input task always refreshes the pad snapshot before the
//! main task reads it in the same pass.

use core::fmt;
use core::time::Duration;

use heapless::Vec;

/// Maximum number of periodic tasks the scheduler tracks.
pub const MAX_TASKS: usize = 4;

/// Periodic jobs run by the control loop.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TaskId {
    HeadArrayInput,
    MainControl,
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::HeadArrayInput => f.write_str("head-array"),
            TaskId::MainControl => f.write_str("main"),
        }
    }
}

/// Errors raised while registering tasks.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScheduleError {
    /// Registry has reached [`MAX_TASKS`].
    Full,
    /// The task is already registered.
    Duplicate(TaskId),
    /// A zero period would make the task permanently due.
    ZeroPeriod(TaskId),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Registration and timing state for one task.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct TaskSlot {
    id: TaskId,
    priority: u8,
    period: Duration,
    next_due: Duration,
}

/// Tasks ready in one pass, already in run order.
pub type DueTasks = Vec<TaskId, MAX_TASKS>;

/// Periodic task table driven by a monotonic clock.
#[derive(Clone, Debug, Default)]
pub struct CooperativeScheduler {
    slots: Vec<TaskSlot, MAX_TASKS>,
}

impl CooperativeScheduler {
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Registers a task that first becomes due at time zero.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] when the table is full, the task already
    /// exists, or the period is zero.
    pub fn register(
        &mut self,
        id: TaskId,
        priority: u8,
        period: Duration,
    ) -> Result<(), ScheduleError> {
        if period.is_zero() {
            return Err(ScheduleError::ZeroPeriod(id));
        }
        if self.slots.iter().any(|slot| slot.id == id) {
            return Err(ScheduleError::Duplicate(id));
        }

        let slot = TaskSlot {
            id,
            priority,
            period,
            next_due: Duration::ZERO,
        };
        // Equal priorities keep registration order.
        let index = self
            .slots
            .iter()
            .position(|existing| existing.priority > priority)
            .unwrap_or(self.slots.len());
        self.slots
            .insert(index, slot)
            .map_err(|_| ScheduleError::Full)
    }

    /// Returns every task due at `now`, in priority order, and books its next
    /// wake-up. A task that fell more than one period behind runs once and
    /// resumes one period from `now`.
    pub fn due(&mut self, now: Duration) -> DueTasks {
        let mut ready = DueTasks::new();
        for slot in &mut self.slots {
            if now < slot.next_due {
                continue;
            }
            slot.next_due += slot.period;
            if slot.next_due <= now {
                slot.next_due = now + slot.period;
            }
            // Capacity matches the slot table.
            let _ = ready.push(slot.id);
        }
        ready
    }

    /// Earliest upcoming wake-up, if any task is registered.
    #[must_use]
    pub fn next_wake(&self) -> Option<Duration> {
        self.slots.iter().map(|slot| slot.next_due).min()
    }
}
