use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::glyph::Glyph;

/// Tile size picked in the UI. Each class has a base width × height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Decode the wire code used by the JS bridge (0/1/2).
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    /// Base (width, height) before the per-placement growth factor.
    pub fn base_size(self) -> Vec2 {
        match self {
            Self::Small => Vec2::new(20.0, 50.0),
            Self::Medium => Vec2::new(30.0, 75.0),
            Self::Large => Vec2::new(40.0, 100.0),
        }
    }
}

/// Fall state of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileState {
    #[default]
    Upright,
    Falling,
    Fallen,
}

/// A letter or digit piece standing on the ground line.
///
/// `pos` is the bottom-centre pivot the tile rotates around.
#[derive(Debug, Clone)]
pub struct Tile {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub glyph: Glyph,
    pub size: SizeClass,
    /// Tilt in radians. Positive tips the top to the right.
    pub angle: f32,
    pub angular_velocity: f32,
    pub state: TileState,
    /// +1 falls right, -1 falls left.
    pub direction: f32,
}

impl Tile {
    /// Create an upright tile with the base dimensions of its size class.
    pub fn new(glyph: Glyph, size: SizeClass, pos: Vec2) -> Self {
        let dims = size.base_size();
        Self {
            pos,
            width: dims.x,
            height: dims.y,
            glyph,
            size,
            angle: 0.0,
            angular_velocity: 0.0,
            state: TileState::Upright,
            direction: 1.0,
        }
    }

    pub fn with_dimensions(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn is_upright(&self) -> bool {
        self.state == TileState::Upright
    }

    pub fn is_falling(&self) -> bool {
        self.state == TileState::Falling
    }

    pub fn has_fallen(&self) -> bool {
        self.state == TileState::Fallen
    }

    /// Tip the tile over. Only an upright tile can be ignited.
    /// Returns false if the tile was already moving or down.
    pub fn ignite(&mut self, direction: f32, impulse: f32) -> bool {
        if !self.is_upright() {
            return false;
        }
        self.state = TileState::Falling;
        self.direction = if direction < 0.0 { -1.0 } else { 1.0 };
        self.angular_velocity = impulse * self.direction;
        true
    }

    /// Advance the fall by one step. `scale` is the step length in reference frames.
    /// Pins the angle at `clamp` (signed) and settles the tile once reached.
    pub fn step(&mut self, acceleration: f32, clamp: f32, scale: f32) {
        if !self.is_falling() {
            return;
        }
        self.angular_velocity += acceleration * self.direction * scale;
        self.angle += self.angular_velocity * scale;

        if self.angle.abs() >= clamp {
            self.angle = clamp * self.direction;
            self.state = TileState::Fallen;
            self.angular_velocity = 0.0;
        }
    }

    /// World position of the tile's top edge centre at the current tilt.
    pub fn top(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + self.angle.sin() * self.height,
            self.pos.y - self.angle.cos() * self.height,
        )
    }

    /// Point test against the un-rotated bounding box.
    pub fn contains_point(&self, p: Vec2) -> bool {
        let half = self.width / 2.0;
        p.x >= self.pos.x - half
            && p.x <= self.pos.x + half
            && p.y >= self.pos.y - self.height
            && p.y <= self.pos.y
    }

    /// Put the tile back on its feet.
    pub fn stand_up(&mut self) {
        self.angle = 0.0;
        self.angular_velocity = 0.0;
        self.state = TileState::Upright;
        self.direction = 1.0;
    }
}
