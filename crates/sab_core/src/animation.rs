//! Flip-book sprite animation.
//!
//! An `Animation` cycles through a list of sprite-sheet frame indices, moving
//! to the next one every `interval` seconds. The stepping is driven by a
//! repeating task on the animation's own `Timer`, so timing is integer
//! microseconds and independent of how the caller slices `dt`.
//!
//! States that want to restart an animation replace the whole value with a
//! fresh `Animation::new`; the current frame is never set from outside.

use crate::timer::{Timer, TimerEvent};

#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<usize>,
    interval: f64,
    timer: Timer<()>,
    current_frame: usize,
}

impl Animation {
    pub fn new(frames: Vec<usize>, interval: f64) -> Self {
        let mut timer = Timer::new();
        timer.every(interval, ());
        Self {
            frames,
            interval,
            timer,
            current_frame: 0,
        }
    }

    pub fn update(&mut self, dt: f64) {
        // Single-frame animations never change.
        if self.frames.len() <= 1 {
            return;
        }

        for event in self.timer.update(dt) {
            if let TimerEvent::Fired(()) = event {
                self.current_frame = (self.current_frame + 1) % self.frames.len();
            }
        }
    }

    /// The sprite index to draw right now.
    pub fn current_frame(&self) -> usize {
        self.frames.get(self.current_frame).copied().unwrap_or(0)
    }

    /// Position inside the frame list.
    pub fn frame_position(&self) -> usize {
        self.current_frame
    }

    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }
}
