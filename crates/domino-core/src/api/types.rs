use bytemuck::{Pod, Zeroable};

use crate::components::glyph::Glyph;
use crate::components::prop::PropKind;

/// A sound cue emitted by the toy logic.
/// The numeric value maps to a clip in the page's sound manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SoundEffect {
    TilePlaced = 0,
    PropPlaced = 1,
    TileFell = 2,
    PropDestroyed = 3,
    Celebrate = 4,
}

impl SoundEffect {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Something that happened during a step, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum ToyEvent {
    TilePlaced { index: usize, glyph: Glyph },
    PropPlaced { kind: PropKind },
    TileFell { index: usize, glyph: Glyph },
    /// The fall simulation stopped. `all_fallen` is false when a gap broke the chain.
    ChainHalted { all_fallen: bool, fallen: usize, total: usize },
    PropExploded { kind: PropKind },
    PropSettled { kind: PropKind },
    RoundComplete { all_fallen: bool, fallen: usize, total: usize },
    /// Chime plus banner.
    Celebration,
}

impl ToyEvent {
    /// Flatten into the fixed-width record the page reads.
    pub fn to_game_event(&self) -> GameEvent {
        fn flag(b: bool) -> f32 {
            if b { 1.0 } else { 0.0 }
        }
        let (kind, a, b, c) = match *self {
            ToyEvent::TilePlaced { index, glyph } => {
                (GameEvent::TILE_PLACED, index as f32, glyph.char() as u32 as f32, glyph.category().code() as f32)
            }
            ToyEvent::PropPlaced { kind } => (GameEvent::PROP_PLACED, kind.code() as f32, 0.0, 0.0),
            ToyEvent::TileFell { index, glyph } => {
                (GameEvent::TILE_FELL, index as f32, glyph.char() as u32 as f32, glyph.category().code() as f32)
            }
            ToyEvent::ChainHalted { all_fallen, fallen, total } => {
                (GameEvent::CHAIN_HALTED, flag(all_fallen), fallen as f32, total as f32)
            }
            ToyEvent::PropExploded { kind } => (GameEvent::PROP_EXPLODED, kind.code() as f32, 0.0, 0.0),
            ToyEvent::PropSettled { kind } => (GameEvent::PROP_SETTLED, kind.code() as f32, 0.0, 0.0),
            ToyEvent::RoundComplete { all_fallen, fallen, total } => {
                (GameEvent::ROUND_COMPLETE, flag(all_fallen), fallen as f32, total as f32)
            }
            ToyEvent::Celebration => (GameEvent::CELEBRATION, 0.0, 0.0, 0.0),
        };
        GameEvent { kind, a, b, c }
    }
}

/// A toy event as the page sees it.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub const TILE_PLACED: f32 = 1.0;
    pub const PROP_PLACED: f32 = 2.0;
    pub const TILE_FELL: f32 = 3.0;
    pub const CHAIN_HALTED: f32 = 4.0;
    pub const PROP_EXPLODED: f32 = 5.0;
    pub const PROP_SETTLED: f32 = 6.0;
    pub const ROUND_COMPLETE: f32 = 7.0;
    pub const CELEBRATION: f32 = 8.0;
}
