use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use crate::{
    grid::GridModel,
    session::{Session, SessionStep},
};

/// Slowest cadence the controls can dial in.
const MAX_CADENCE: Duration = Duration::from_secs(1);

/// Shared knobs for a running scheduler. Cheap to clone and safe to flip from another
/// thread, e.g. an input listener.
#[derive(Debug, Clone)]
pub struct SchedulerControl {
    cancel: Arc<AtomicBool>,
    cadence_micros: Arc<AtomicU64>,
}

impl SchedulerControl {
    fn new(cadence: Duration) -> Self {
        SchedulerControl {
            cancel: Arc::new(AtomicBool::new(false)),
            cadence_micros: Arc::new(AtomicU64::new(cadence.as_micros() as u64)),
        }
    }

    /// Asks the scheduler to stop before its next step.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    pub fn cadence(&self) -> Duration {
        Duration::from_micros(self.cadence_micros.load(Ordering::Relaxed))
    }

    /// Halves the pause between steps.
    pub fn speed_up(&self) -> Duration {
        self.update_cadence(|c| c / 2)
    }

    /// Doubles the pause between steps, up to one second.
    pub fn slow_down(&self) -> Duration {
        self.update_cadence(|c| (c.max(1) * 2).min(MAX_CADENCE.as_micros() as u64))
    }

    fn update_cadence(&self, f: impl Fn(u64) -> u64) -> Duration {
        let previous = self
            .cadence_micros
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| Some(f(c)))
            .unwrap_or_default();
        Duration::from_micros(f(previous))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerStatus {
    /// The run reached this terminal step.
    Completed(SessionStep),
    /// The run was abandoned through [`SchedulerControl::cancel`].
    Cancelled,
    /// The session had no active run to drive.
    NothingToRun,
}

/// Drives a session's active run one step at a time at a fixed cadence.
///
/// `Idle` steps are retried straight away and never reach the callback. The pause
/// happens after every visible step, so a renderer gets one frame per step.
pub struct StepScheduler {
    control: SchedulerControl,
}

impl StepScheduler {
    pub fn new(cadence: Duration) -> Self {
        StepScheduler {
            control: SchedulerControl::new(cadence),
        }
    }

    pub fn control(&self) -> SchedulerControl {
        self.control.clone()
    }

    /// Steps the session until its run ends or the scheduler is cancelled. A cancelled
    /// run is dropped from the session, which unlocks the grid.
    pub fn drive<F>(&self, session: &mut Session, mut on_step: F) -> SchedulerStatus
    where
        F: FnMut(&SessionStep, &GridModel),
    {
        loop {
            if self.control.is_cancelled() {
                session.cancel();
                tracing::info!("scheduler cancelled");
                return SchedulerStatus::Cancelled;
            }
            let Some(step) = session.step() else {
                return SchedulerStatus::NothingToRun;
            };
            if step.is_idle() {
                continue;
            }
            on_step(&step, session.grid());
            if step.is_terminal() {
                return SchedulerStatus::Completed(step);
            }
            let cadence = self.control.cadence();
            if !cadence.is_zero() {
                std::thread::sleep(cadence);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::Cell,
        solvers::{Solver, StepResult},
    };

    fn configured() -> Session {
        let mut session = Session::new(GridModel::new(6));
        session.set_start(Cell::new(0, 0)).unwrap();
        session.set_end(Cell::new(5, 5)).unwrap();
        session
    }

    #[test]
    fn test_drives_to_completion() {
        let mut session = configured();
        session.start_search(Solver::Dijkstra).unwrap();
        let scheduler = StepScheduler::new(Duration::ZERO);
        let mut steps = Vec::new();
        let status = scheduler.drive(&mut session, |step, grid| {
            assert!(!step.is_idle());
            // The lock is released by the terminal step itself
            assert_ne!(grid.is_locked(), step.is_terminal());
            steps.push(step.clone());
        });
        let SchedulerStatus::Completed(SessionStep::Search(StepResult::Found(path))) = status
        else {
            panic!("unexpected status {status:?}");
        };
        assert_eq!(path.len(), 11);
        // Every cell closer than the goal is expanded, then the goal itself
        assert_eq!(steps.len(), 35 + 1);
        assert!(!session.is_running());
    }

    #[test]
    fn test_cancel_from_callback() {
        let mut session = configured();
        session.start_search(Solver::Bfs).unwrap();
        let scheduler = StepScheduler::new(Duration::ZERO);
        let control = scheduler.control();
        let mut seen = 0;
        let status = scheduler.drive(&mut session, |_, _| {
            seen += 1;
            if seen == 3 {
                control.cancel();
            }
        });
        assert_eq!(status, SchedulerStatus::Cancelled);
        assert_eq!(seen, 3);
        assert!(!session.is_running());
        assert!(!session.grid().is_locked());
    }

    #[test]
    fn test_nothing_to_run() {
        let mut session = configured();
        let scheduler = StepScheduler::new(Duration::ZERO);
        assert_eq!(
            scheduler.drive(&mut session, |_, _| panic!("no steps expected")),
            SchedulerStatus::NothingToRun
        );
    }

    #[test]
    fn test_cadence_controls() {
        let control = StepScheduler::new(Duration::from_millis(16)).control();
        assert_eq!(control.speed_up(), Duration::from_millis(8));
        assert_eq!(control.slow_down(), Duration::from_millis(16));
        for _ in 0..20 {
            control.slow_down();
        }
        assert_eq!(control.cadence(), MAX_CADENCE);
        for _ in 0..40 {
            control.speed_up();
        }
        assert_eq!(control.cadence(), Duration::ZERO);
        // From zero, slowing down starts over at the smallest unit
        assert_eq!(control.slow_down(), Duration::from_micros(2));
    }
}
