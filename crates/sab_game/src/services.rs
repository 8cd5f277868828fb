//! Process-wide collaborators handed to the simulation by reference.
//!
//! `Services` is built once at startup and lent to every update. It bundles
//! the keyboard snapshot, the outgoing sound commands and the random number
//! generator, so nothing in the game reaches for a global.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sab_core::input::InputState;

use crate::assets::SoundName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCommand {
    Play(SoundName),
    Stop(SoundName),
}

/// Fire-and-forget sound requests, drained by the host's audio backend.
#[derive(Debug, Clone, Default)]
pub struct SoundQueue {
    commands: Vec<SoundCommand>,
}

impl SoundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, sound: SoundName) {
        self.commands.push(SoundCommand::Play(sound));
    }

    pub fn stop(&mut self, sound: SoundName) {
        self.commands.push(SoundCommand::Stop(sound));
    }

    pub fn pending(&self) -> &[SoundCommand] {
        &self.commands
    }

    pub fn drain(&mut self) -> Vec<SoundCommand> {
        std::mem::take(&mut self.commands)
    }

    /// How many times `sound` was requested since the last drain.
    pub fn play_count(&self, sound: SoundName) -> usize {
        self.commands
            .iter()
            .filter(|command| **command == SoundCommand::Play(sound))
            .count()
    }
}

#[derive(Debug, Clone)]
pub struct Services {
    pub input: InputState,
    pub sounds: SoundQueue,
    pub rng: StdRng,
}

impl Services {
    /// Services with an entropy-seeded generator: every level is different.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Services with a fixed seed, for replays and tests.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            input: InputState::new(),
            sounds: SoundQueue::new(),
            rng,
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform draw in [0, 1) compared against `probability`.
pub fn did_succeed_chance(rng: &mut impl Rng, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}

/// Uniform integer over the inclusive range spanned by `a` and `b`, in either
/// order.
pub fn random_int(rng: &mut impl Rng, a: i32, b: i32) -> i32 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    rng.gen_range(low..=high)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chance_extremes_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(!did_succeed_chance(&mut rng, 0.0));
            assert!(did_succeed_chance(&mut rng, 1.0));
        }
    }

    #[test]
    fn random_int_accepts_inverted_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let value = random_int(&mut rng, 14, 8);
            assert!((8..=14).contains(&value));
        }
        assert_eq!(random_int(&mut rng, 3, 3), 3);
    }

    #[test]
    fn sound_queue_drains_in_order() {
        let mut sounds = SoundQueue::new();
        sounds.play(SoundName::Music);
        sounds.play(SoundName::Jump);
        sounds.stop(SoundName::Music);
        assert_eq!(sounds.play_count(SoundName::Jump), 1);

        let drained = sounds.drain();
        assert_eq!(
            drained,
            vec![
                SoundCommand::Play(SoundName::Music),
                SoundCommand::Play(SoundName::Jump),
                SoundCommand::Stop(SoundName::Music),
            ]
        );
        assert!(sounds.pending().is_empty());
    }
}
