//! Short-lived burst particles.
//!
//! Each particle leaves its spawn point in a random direction at a fixed
//! speed and burns through a lifetime budget. Particles are dead once the
//! budget reaches zero; owners prune them and drop the list when it empties.

use glam::Vec2;
use rand::Rng;

use crate::render::RenderList;

/// Lifetime units burned per second.
pub const LIFETIME_DECAY_PER_SECOND: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleProfile {
    pub color: [u8; 3],
    pub radius: f32,
    pub lifetime: f32,
    pub speed: f32,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: [u8; 3],
    pub radius: f32,
    pub life: f32,
    max_life: f32,
}

impl Particle {
    pub fn new(origin: Vec2, profile: &ParticleProfile, rng: &mut impl Rng) -> Self {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        Self {
            position: origin,
            velocity: Vec2::new(angle.cos(), angle.sin()) * profile.speed,
            color: profile.color,
            radius: profile.radius,
            life: profile.lifetime,
            max_life: profile.lifetime.max(f32::EPSILON),
        }
    }

    pub fn update(&mut self, dt: f64) {
        let dt = dt as f32;
        self.position += self.velocity * dt;
        self.life -= LIFETIME_DECAY_PER_SECOND * dt;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    pub fn render(&self, out: &mut RenderList) {
        let alpha = (self.life / self.max_life).clamp(0.0, 1.0);
        out.push_circle(self.position, self.radius, self.color, alpha);
    }
}

/// Spawn `count` particles at `origin`.
pub fn burst(
    origin: Vec2,
    count: usize,
    profile: &ParticleProfile,
    rng: &mut impl Rng,
) -> Vec<Particle> {
    (0..count)
        .map(|_| Particle::new(origin, profile, rng))
        .collect()
}
