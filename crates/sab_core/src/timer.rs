//! Cooperative, single-threaded task scheduler.
//!
//! A `Timer` holds delayed one-shot tasks (`wait`), repeating tasks (`every`)
//! and interpolations (`tween`). It is advanced once per frame with
//! `update(dt)`, which returns everything that happened during that slice as
//! plain values: fired events and new tween values. The owner applies them.
//! Nothing in here captures game state, so a task can never fire into an
//! object that has been dropped; cancelling a handle removes the task.
//!
//! Elapsed time is tracked in integer microseconds so that repeating tasks
//! fire the same number of times no matter how `dt` is sliced.

/// Identifies a scheduled task so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// One field interpolation inside a tween task.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T> {
    pub target: T,
    pub from: f32,
    pub to: f32,
}

impl<T> Tween<T> {
    pub fn new(target: T, from: f32, to: f32) -> Self {
        Self { target, from, to }
    }

    fn value_at(&self, progress: f32) -> f32 {
        self.from + (self.to - self.from) * progress
    }
}

/// Something that happened while advancing the timer.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent<E, T> {
    /// A `wait` expired, an `every` ticked, or a tween completed.
    Fired(E),
    /// A tweened field has a new value.
    Tweened { target: T, value: f32 },
}

#[derive(Debug, Clone)]
enum TaskKind<E, T> {
    Wait(E),
    Every(E),
    Tween {
        tweens: Vec<Tween<T>>,
        on_complete: Option<E>,
    },
}

#[derive(Debug, Clone)]
struct Task<E, T> {
    handle: TaskHandle,
    kind: TaskKind<E, T>,
    duration_us: u64,
    elapsed_us: u64,
}

#[derive(Debug, Clone)]
pub struct Timer<E, T = ()> {
    tasks: Vec<Task<E, T>>,
    next_handle: u64,
}

pub fn seconds_to_us(seconds: f64) -> u64 {
    if seconds <= 0.0 {
        return 0;
    }
    (seconds * 1_000_000.0).round() as u64
}

impl<E: Clone, T: Clone> Timer<E, T> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_handle: 0,
        }
    }

    /// Fire `event` once after `duration` seconds.
    pub fn wait(&mut self, duration: f64, event: E) -> TaskHandle {
        self.schedule(TaskKind::Wait(event), duration)
    }

    /// Fire `event` every `interval` seconds until cancelled.
    pub fn every(&mut self, interval: f64, event: E) -> TaskHandle {
        self.schedule(TaskKind::Every(event), interval)
    }

    /// Interpolate every tween linearly over `duration` seconds, then fire
    /// `on_complete` if given.
    pub fn tween(
        &mut self,
        tweens: Vec<Tween<T>>,
        duration: f64,
        on_complete: Option<E>,
    ) -> TaskHandle {
        self.schedule(
            TaskKind::Tween {
                tweens,
                on_complete,
            },
            duration,
        )
    }

    fn schedule(&mut self, kind: TaskKind<E, T>, duration: f64) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        // Zero-length repeating tasks would spin forever.
        let min_us = if matches!(kind, TaskKind::Every(_)) { 1 } else { 0 };
        self.tasks.push(Task {
            handle,
            kind,
            duration_us: seconds_to_us(duration).max(min_us),
            elapsed_us: 0,
        });
        handle
    }

    /// Remove a pending task. Returns false if it already finished or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.handle != handle);
        self.tasks.len() != before
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|task| task.handle == handle)
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advance every task by `dt` seconds, in scheduling order.
    pub fn update(&mut self, dt: f64) -> Vec<TimerEvent<E, T>> {
        let dt_us = seconds_to_us(dt);
        let mut events = Vec::new();

        self.tasks.retain_mut(|task| {
            task.elapsed_us += dt_us;
            match &task.kind {
                TaskKind::Wait(event) => {
                    if task.elapsed_us >= task.duration_us {
                        events.push(TimerEvent::Fired(event.clone()));
                        return false;
                    }
                    true
                }
                TaskKind::Every(event) => {
                    while task.elapsed_us >= task.duration_us {
                        task.elapsed_us -= task.duration_us;
                        events.push(TimerEvent::Fired(event.clone()));
                    }
                    true
                }
                TaskKind::Tween {
                    tweens,
                    on_complete,
                } => {
                    let done = task.elapsed_us >= task.duration_us;
                    let progress = if done {
                        1.0
                    } else {
                        task.elapsed_us as f32 / task.duration_us as f32
                    };
                    for tween in tweens {
                        events.push(TimerEvent::Tweened {
                            target: tween.target.clone(),
                            value: tween.value_at(progress),
                        });
                    }
                    if done {
                        if let Some(event) = on_complete {
                            events.push(TimerEvent::Fired(event.clone()));
                        }
                        return false;
                    }
                    true
                }
            }
        });

        events
    }
}

impl<E: Clone, T: Clone> Default for Timer<E, T> {
    fn default() -> Self {
        Self::new()
    }
}
