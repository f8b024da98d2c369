pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{TimingConfig, ToyConfig, WorldConfig};
pub use api::error::ConfigError;
pub use api::toy::DominoToy;
pub use api::types::{GameEvent, SoundEffect, ToyEvent};
pub use components::glyph::{Glyph, TileCategory};
pub use components::particle::{Particle, ParticleShape, PALETTE};
pub use components::prop::{Prop, PropKind, PropOutline, PropSpec};
pub use components::tile::{SizeClass, Tile, TileState};
pub use crate::core::fall::{break_points, can_reach, validate_chain, BreakPoint, FallConfig, FallEvent, FallSimulation};
pub use crate::core::scene::{LayoutConfig, Removed, RoundState, Scene};
pub use crate::core::scheduler::Scheduler;
pub use crate::core::time::FixedTimestep;
pub use input::queue::{InputEvent, InputQueue, KEY_RESET, KEY_TRIGGER};
pub use renderer::instance::{InstanceKind, RenderBuffer, RenderInstance};
pub use systems::explosion::{Explosion, ExplosionConfig, ExplosionPhase, Glow, GlowRing};
pub use systems::narration::{NarrationQueue, VoiceSettings, CELEBRATION_PHRASES};
pub use systems::render::build_render_buffer;
pub use systems::rng::Rng;
