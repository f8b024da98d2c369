//! Confetti spawned by a prop explosion.

use glam::Vec2;

/// Confetti colours, as 0xRRGGBB.
pub const PALETTE: [u32; 10] = [
    0xFF6B6B, 0xFFE66D, 0x4ECDC4, 0xFF8C42, 0xA8E6CF,
    0xFFD93D, 0xFF69B4, 0x00CED1, 0xFF4500, 0x7B68EE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ParticleShape {
    Circle = 0,
    Ribbon = 1,
    Star = 2,
}

/// A single piece of confetti.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Index into [`PALETTE`].
    pub color: u8,
    pub rotation: f32,
    pub spin: f32,
    /// Remaining life, 1.0 at spawn. Also the draw opacity.
    pub life: f32,
    pub decay: f32,
    pub shape: ParticleShape,
}

impl Particle {
    pub fn rgb(&self) -> u32 {
        PALETTE[self.color as usize % PALETTE.len()]
    }

    /// Advance one step under constant downward pull. Returns false when expired.
    pub fn tick(&mut self, gravity: f32, scale: f32) -> bool {
        self.pos += self.vel * scale;
        self.vel.y += gravity * scale;
        self.rotation += self.spin * scale;
        self.life -= self.decay * scale;
        self.life > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(decay: f32) -> Particle {
        Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(2.0, -4.0),
            size: 20.0,
            color: 3,
            rotation: 0.0,
            spin: 0.1,
            life: 1.0,
            decay,
            shape: ParticleShape::Circle,
        }
    }

    #[test]
    fn tick_integrates_then_applies_gravity() {
        let mut p = particle(0.01);
        assert!(p.tick(0.15, 1.0));
        assert_eq!(p.pos, Vec2::new(2.0, -4.0));
        assert!((p.vel.y - -3.85).abs() < 1e-6);
        assert!((p.life - 0.99).abs() < 1e-6);
    }

    #[test]
    fn particle_expires() {
        let mut p = particle(0.6);
        assert!(p.tick(0.15, 1.0));
        assert!(!p.tick(0.15, 1.0));
    }

    #[test]
    fn rgb_looks_up_palette() {
        assert_eq!(particle(0.01).rgb(), 0xFF8C42);
    }
}
