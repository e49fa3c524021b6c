//! Recurring refresh tasks

use core::time::Duration;

use heapless::Vec;

use super::Error;

/// Handle of a scheduled task, needed to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    slot: u8,
    generation: u8,
}

/// Host capability to run something at a fixed period.
pub trait Scheduler {
    fn schedule_recurring(&mut self, period: Duration) -> Result<TaskHandle, Error>;

    /// Stop a task. Cancelling an already cancelled handle does nothing.
    fn cancel(&mut self, handle: TaskHandle);
}

#[derive(Debug, Clone, Copy)]
struct Task {
    period: Duration,
    next_due: Duration,
    generation: u8,
}

/// Fixed-capacity scheduler driven by an external monotonic clock.
///
/// The owner calls [`RefreshScheduler::poll`] with the current uptime and runs
/// whatever tasks it reports as due.
pub struct RefreshScheduler<const N: usize> {
    tasks: [Option<Task>; N],
    now: Duration,
    generation: u8,
}

impl<const N: usize> RefreshScheduler<N> {
    pub const fn new() -> Self {
        Self {
            tasks: [None; N],
            now: Duration::ZERO,
            generation: 0,
        }
    }

    /// Advance to `now` and return the tasks that are due.
    ///
    /// A task fires at most once per poll; missed periods are skipped rather
    /// than replayed.
    pub fn poll(&mut self, now: Duration) -> Vec<TaskHandle, N> {
        self.now = now;
        let mut due = Vec::new();
        for (slot, task) in self.tasks.iter_mut().enumerate() {
            let Some(task) = task else { continue };
            if now < task.next_due {
                continue;
            }
            task.next_due += task.period;
            if task.next_due <= now {
                task.next_due = now + task.period;
            }
            // At most one entry per slot
            let _ = due.push(TaskHandle {
                slot: slot as u8,
                generation: task.generation,
            });
        }
        due
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        matches!(
            self.tasks.get(handle.slot as usize),
            Some(Some(task)) if task.generation == handle.generation
        )
    }

    /// Number of live tasks
    pub fn active(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_some()).count()
    }
}

impl<const N: usize> Default for RefreshScheduler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Scheduler for RefreshScheduler<N> {
    fn schedule_recurring(&mut self, period: Duration) -> Result<TaskHandle, Error> {
        let slot = self
            .tasks
            .iter()
            .position(|task| task.is_none())
            .ok_or(Error::SchedulerFull)?;
        self.generation = self.generation.wrapping_add(1);
        self.tasks[slot] = Some(Task {
            period,
            next_due: self.now + period,
            generation: self.generation,
        });
        debug!("Task {} scheduled every {} ms", slot, period.as_millis() as u32);
        Ok(TaskHandle {
            slot: slot as u8,
            generation: self.generation,
        })
    }

    fn cancel(&mut self, handle: TaskHandle) {
        if self.is_scheduled(handle) {
            self.tasks[handle.slot as usize] = None;
            debug!("Task {} cancelled", handle.slot);
        }
    }
}
