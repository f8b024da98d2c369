//! Prop explosion: confetti burst, screen flash and expanding glow.
//!
//! An [`Explosion`] is created once per prop and only moves forward:
//! progress grows by a fixed step per reference frame while the confetti
//! falls and fades. It is settled once progress has passed
//! `settle_threshold` and the last particle has expired.

use std::f32::consts::{FRAC_PI_4, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::particle::{Particle, ParticleShape, PALETTE};
use crate::systems::rng::Rng;

/// Glow ring colours, inner to outer.
pub const RING_COLORS: [u32; 3] = [0xFF6B6B, 0x4ECDC4, 0xFFE66D];

/// Explosion tuning. Velocities and rates are per 60 Hz reference frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    pub burst_count: u32,
    /// Random angle added on top of the even spread (radians).
    pub burst_jitter: f32,
    pub burst_speed: [f32; 2],
    pub burst_size: [f32; 2],
    /// Upward kick subtracted from the initial vertical velocity.
    pub burst_lift: f32,
    pub burst_spin: f32,
    pub burst_decay: [f32; 2],
    /// Share of burst particles drawn as stars; the rest are circles.
    pub star_ratio: f32,
    pub ribbon_count: u32,
    pub ribbon_speed: [f32; 2],
    pub ribbon_size: [f32; 2],
    pub ribbon_lift: f32,
    pub ribbon_spin: f32,
    pub ribbon_decay: f32,
    pub gravity: f32,
    pub progress_step: f32,
    pub flash_until: f32,
    pub flash_alpha: f32,
    pub glow_until: f32,
    pub glow_radius: f32,
    pub settle_threshold: f32,
    /// Extra reach beyond the prop half-width for the last tile's top.
    pub contact_margin: f32,
    /// Minimum tilt of the last tile before it can touch the prop.
    pub contact_min_tilt: f32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            burst_count: 150,
            burst_jitter: 0.5,
            burst_speed: [8.0, 23.0],
            burst_size: [15.0, 50.0],
            burst_lift: 5.0,
            burst_spin: 0.2,
            burst_decay: [0.008, 0.013],
            star_ratio: 0.7,
            ribbon_count: 50,
            ribbon_speed: [5.0, 15.0],
            ribbon_size: [20.0, 50.0],
            ribbon_lift: 8.0,
            ribbon_spin: 0.1,
            ribbon_decay: 0.006,
            gravity: 0.15,
            progress_step: 0.015,
            flash_until: 0.2,
            flash_alpha: 0.6,
            glow_until: 0.4,
            glow_radius: 300.0,
            settle_threshold: 0.5,
            contact_margin: 20.0,
            contact_min_tilt: FRAC_PI_4,
        }
    }
}

/// Visual phase of a prop, derived from its explosion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionPhase {
    Idle,
    Flash,
    Particles,
    Settled,
}

/// One outline ring around the glow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowRing {
    pub radius: f32,
    pub line_width: f32,
    pub alpha: f32,
    pub color: u32,
}

/// Radial glow drawn over the prop centre early in the explosion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub center: Vec2,
    pub radius: f32,
    /// Alpha of the white core; the gradient fades out towards the rim.
    pub alpha: f32,
    pub rings: [GlowRing; 3],
}

/// A running explosion: its origin, overall progress and live confetti.
#[derive(Debug, Clone)]
pub struct Explosion {
    pub origin: Vec2,
    pub progress: f32,
    pub particles: Vec<Particle>,
}

impl Explosion {
    /// Spawn the radial burst and the ribbon shower at `origin`.
    pub fn spawn(origin: Vec2, cfg: &ExplosionConfig, rng: &mut Rng) -> Self {
        let total = (cfg.burst_count + cfg.ribbon_count) as usize;
        let mut particles = Vec::with_capacity(total);
        let palette_len = PALETTE.len() as u32;

        let spread = if cfg.burst_count > 0 {
            TAU / cfg.burst_count as f32
        } else {
            0.0
        };
        for i in 0..cfg.burst_count {
            let angle = spread * i as f32 + rng.next_f32() * cfg.burst_jitter;
            let speed = rng.range(cfg.burst_speed[0], cfg.burst_speed[1]);
            let size = rng.range(cfg.burst_size[0], cfg.burst_size[1]);
            let color = rng.next_int(palette_len) as u8;
            let rotation = rng.next_f32() * TAU;
            let spin = rng.signed(cfg.burst_spin);
            let decay = rng.range(cfg.burst_decay[0], cfg.burst_decay[1]);
            let shape = if rng.next_f32() < cfg.star_ratio {
                ParticleShape::Star
            } else {
                ParticleShape::Circle
            };
            particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - cfg.burst_lift),
                size,
                color,
                rotation,
                spin,
                life: 1.0,
                decay,
                shape,
            });
        }

        for _ in 0..cfg.ribbon_count {
            let angle = rng.next_f32() * TAU;
            let speed = rng.range(cfg.ribbon_speed[0], cfg.ribbon_speed[1]);
            let size = rng.range(cfg.ribbon_size[0], cfg.ribbon_size[1]);
            let color = rng.next_int(palette_len) as u8;
            let rotation = rng.next_f32() * TAU;
            let spin = rng.signed(cfg.ribbon_spin);
            particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - cfg.ribbon_lift),
                size,
                color,
                rotation,
                spin,
                life: 1.0,
                decay: cfg.ribbon_decay,
                shape: ParticleShape::Ribbon,
            });
        }

        log::debug!("explosion spawned {} particles at {:?}", particles.len(), origin);

        Self {
            origin,
            progress: 0.0,
            particles,
        }
    }

    /// Advance confetti and progress by `scale` reference frames.
    /// A settled explosion no longer changes.
    pub fn advance(&mut self, cfg: &ExplosionConfig, scale: f32) {
        if self.is_settled(cfg) {
            return;
        }
        let gravity = cfg.gravity;
        self.particles.retain_mut(|p| p.tick(gravity, scale));
        self.progress += cfg.progress_step * scale;
    }

    pub fn is_settled(&self, cfg: &ExplosionConfig) -> bool {
        self.progress > cfg.settle_threshold && self.particles.is_empty()
    }

    pub fn phase(&self, cfg: &ExplosionConfig) -> ExplosionPhase {
        if self.is_settled(cfg) {
            ExplosionPhase::Settled
        } else if self.progress < cfg.flash_until {
            ExplosionPhase::Flash
        } else {
            ExplosionPhase::Particles
        }
    }

    /// Opacity of the full-frame flash, while it lasts.
    pub fn flash_alpha(&self, cfg: &ExplosionConfig) -> Option<f32> {
        if self.progress >= cfg.flash_until {
            return None;
        }
        Some((1.0 - self.progress / cfg.flash_until) * cfg.flash_alpha)
    }

    /// Shrinking glow and its coloured rings, while they last.
    pub fn glow(&self, cfg: &ExplosionConfig) -> Option<Glow> {
        if self.progress >= cfg.glow_until {
            return None;
        }
        let fade = 1.0 - self.progress / cfg.glow_until;
        let radius = fade * cfg.glow_radius;
        let rings = std::array::from_fn(|i| GlowRing {
            radius: radius * (0.5 + i as f32 * 0.3),
            line_width: 8.0 * fade,
            alpha: 0.6 * fade,
            color: RING_COLORS[i],
        });
        Some(Glow {
            center: self.origin,
            radius,
            alpha: 0.9 * fade,
            rings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn() -> (Explosion, ExplosionConfig) {
        let cfg = ExplosionConfig::default();
        let mut rng = Rng::new(42);
        (Explosion::spawn(Vec2::new(400.0, 200.0), &cfg, &mut rng), cfg)
    }

    #[test]
    fn spawns_burst_and_ribbons() {
        let (ex, _) = spawn();
        assert_eq!(ex.particles.len(), 200);
        let ribbons = ex
            .particles
            .iter()
            .filter(|p| p.shape == ParticleShape::Ribbon)
            .count();
        assert_eq!(ribbons, 50);
        assert!(ex.particles.iter().all(|p| p.pos == Vec2::new(400.0, 200.0)));
        assert!(ex.particles.iter().all(|p| p.life == 1.0));
    }

    #[test]
    fn burst_values_stay_in_configured_ranges() {
        let (ex, cfg) = spawn();
        for p in ex.particles.iter().filter(|p| p.shape != ParticleShape::Ribbon) {
            assert!(p.size >= cfg.burst_size[0] && p.size < cfg.burst_size[1]);
            assert!(p.decay >= cfg.burst_decay[0] && p.decay < cfg.burst_decay[1]);
            let speed = (p.vel + Vec2::new(0.0, cfg.burst_lift)).length();
            assert!(speed >= cfg.burst_speed[0] - 1e-3 && speed <= cfg.burst_speed[1] + 1e-3);
        }
    }

    #[test]
    fn same_seed_same_explosion() {
        let (a, _) = spawn();
        let (b, _) = spawn();
        for (p, q) in a.particles.iter().zip(&b.particles) {
            assert_eq!(p.vel, q.vel);
            assert_eq!(p.color, q.color);
        }
    }

    #[test]
    fn progress_strictly_increases_until_settled() {
        let (mut ex, cfg) = spawn();
        let mut last = ex.progress;
        let mut ticks = 0;
        while !ex.is_settled(&cfg) {
            ex.advance(&cfg, 1.0);
            assert!(ex.progress > last);
            last = ex.progress;
            ticks += 1;
            assert!(ticks < 1000, "explosion never settled");
        }
        assert!(ex.particles.is_empty());
        assert!(ex.progress > cfg.settle_threshold);

        ex.advance(&cfg, 1.0);
        assert_eq!(ex.progress, last);
    }

    #[test]
    fn flash_and_glow_are_time_boxed() {
        let (mut ex, cfg) = spawn();
        assert_eq!(ex.phase(&cfg), ExplosionPhase::Flash);
        assert!((ex.flash_alpha(&cfg).unwrap() - 0.6).abs() < 1e-6);
        let glow = ex.glow(&cfg).unwrap();
        assert_eq!(glow.radius, 300.0);
        assert_eq!(glow.rings[0].radius, 150.0);
        assert_eq!(glow.rings[2].color, 0xFFE66D);

        ex.progress = 0.3;
        assert!(ex.flash_alpha(&cfg).is_none());
        assert!(ex.glow(&cfg).is_some());
        assert_eq!(ex.phase(&cfg), ExplosionPhase::Particles);

        ex.progress = 0.4;
        assert!(ex.glow(&cfg).is_none());
    }
}
