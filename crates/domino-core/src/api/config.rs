use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::core::fall::FallConfig;
use crate::core::scene::LayoutConfig;
use crate::systems::explosion::ExplosionConfig;
use crate::systems::narration::VoiceSettings;

/// World and loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fixed timestep in seconds (default: 1/60). Per-frame tuning values assume this step.
    pub fixed_dt: f32,
    /// World width in game units.
    pub width: f32,
    /// World height in game units. The ground line sits at half height.
    pub height: f32,
    /// Most fixed steps run for a single browser frame.
    pub max_steps_per_frame: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            width: 1200.0,
            height: 600.0,
            max_steps_per_frame: 10,
        }
    }
}

/// Delays between the beats of a round, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Tile falls, then its glyph is spoken.
    pub narrate_delay_ms: f32,
    /// Last tile falls, then the prop explodes.
    pub explosion_delay_ms: f32,
    /// Chain halts beside a prop that is not exploding, then the round completes.
    pub unexploded_celebration_delay_ms: f32,
    /// Round completes, then the chime plays and the banner shows.
    pub banner_delay_ms: f32,
    /// Banner shows, then the cheer is spoken.
    pub cheer_delay_ms: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            narrate_delay_ms: 100.0,
            explosion_delay_ms: 500.0,
            unexploded_celebration_delay_ms: 1500.0,
            banner_delay_ms: 300.0,
            cheer_delay_ms: 500.0,
        }
    }
}

/// Everything tunable about the toy. Defaults reproduce the classic feel;
/// a JSON file may override any subset of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToyConfig {
    pub world: WorldConfig,
    pub fall: FallConfig,
    pub layout: LayoutConfig,
    pub explosion: ExplosionConfig,
    pub timing: TimingConfig,
    pub voice: VoiceSettings,
    /// Seed for confetti and cheer picks.
    pub seed: u64,
}

impl Default for ToyConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            fall: FallConfig::default(),
            layout: LayoutConfig::default(),
            explosion: ExplosionConfig::default(),
            timing: TimingConfig::default(),
            voice: VoiceSettings::default(),
            seed: 42,
        }
    }
}

impl ToyConfig {
    /// Parse and validate a config from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would stall or break the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.world.fixed_dt > 0.0) {
            return Err(ConfigError::invalid("world.fixed_dt", "must be positive"));
        }
        if !(self.world.width > 0.0 && self.world.height > 0.0) {
            return Err(ConfigError::invalid("world", "width and height must be positive"));
        }
        if self.world.max_steps_per_frame == 0 {
            return Err(ConfigError::invalid("world.max_steps_per_frame", "must be at least 1"));
        }
        if !(self.fall.impulse > 0.0 && self.fall.acceleration >= 0.0) {
            return Err(ConfigError::invalid("fall", "impulse must be positive and acceleration non-negative"));
        }
        if !(self.fall.clamp_factor > 0.0 && self.fall.clamp_factor <= 1.0) {
            return Err(ConfigError::invalid("fall.clamp_factor", "must be in (0, 1]"));
        }
        if !(self.explosion.progress_step > 0.0) {
            return Err(ConfigError::invalid("explosion.progress_step", "must be positive"));
        }
        if self.explosion.burst_count + self.explosion.ribbon_count == 0 {
            return Err(ConfigError::invalid("explosion", "burst_count and ribbon_count cannot both be zero"));
        }
        if !(self.explosion.flash_until > 0.0 && self.explosion.glow_until > 0.0) {
            return Err(ConfigError::invalid("explosion", "flash_until and glow_until must be positive"));
        }
        let ranges = [
            ("explosion.burst_speed", self.explosion.burst_speed),
            ("explosion.burst_size", self.explosion.burst_size),
            ("explosion.burst_decay", self.explosion.burst_decay),
            ("explosion.ribbon_speed", self.explosion.ribbon_speed),
            ("explosion.ribbon_size", self.explosion.ribbon_size),
        ];
        for (field, [lo, hi]) in ranges {
            if lo > hi {
                return Err(ConfigError::invalid(field, "range minimum exceeds maximum"));
            }
        }
        if !(self.explosion.burst_decay[0] > 0.0 && self.explosion.ribbon_decay > 0.0) {
            return Err(ConfigError::invalid("explosion", "particle decay must be positive"));
        }
        Ok(())
    }
}
