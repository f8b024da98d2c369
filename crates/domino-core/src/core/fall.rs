use std::f32::consts::{FRAC_PI_2, FRAC_PI_6};

use serde::{Deserialize, Serialize};

use crate::components::tile::Tile;

/// Chain-reaction tuning. Rates are per 60 Hz reference frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallConfig {
    /// Angular velocity given to a tile when it is ignited (rad/frame).
    pub impulse: f32,
    /// Angular acceleration while falling (rad/frame²).
    pub acceleration: f32,
    /// Fraction of a right angle at which a tile counts as down.
    pub clamp_factor: f32,
    /// Reach past the successor's half-width that still counts as contact.
    pub contact_margin: f32,
    /// Minimum tilt before a tile's top can strike its successor (radians).
    pub min_contact_tilt: f32,
    /// Fraction of a tile's height used by the chain diagnostics.
    pub reach_factor: f32,
}

impl Default for FallConfig {
    fn default() -> Self {
        Self {
            impulse: 0.02,
            acceleration: 0.003,
            clamp_factor: 0.95,
            contact_margin: 10.0,
            min_contact_tilt: FRAC_PI_6,
            reach_factor: 0.9,
        }
    }
}

impl FallConfig {
    /// Angle at which a falling tile is pinned and becomes fallen.
    pub fn clamp_angle(&self) -> f32 {
        FRAC_PI_2 * self.clamp_factor
    }
}

/// What happened during a simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FallEvent {
    /// The tile at `index` was ignited.
    Fell { index: usize, direction: f32 },
    /// No tile is falling any more. Emitted once per round.
    Halted { all_fallen: bool },
}

/// Drives a chain reaction over an ordered row of tiles.
///
/// The simulation does not own the tiles: the scene lends them for each
/// call, so the row cannot be reordered while a round is running.
#[derive(Debug, Clone)]
pub struct FallSimulation {
    config: FallConfig,
    reference_dt: f32,
    begun: bool,
    running: bool,
}

impl FallSimulation {
    /// `reference_dt` is the step length the per-frame rates in `config` assume.
    pub fn new(config: FallConfig, reference_dt: f32) -> Self {
        Self {
            config,
            reference_dt,
            begun: false,
            running: false,
        }
    }

    pub fn config(&self) -> &FallConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Push over the first tile. An empty row is a no-op.
    pub fn begin(&mut self, tiles: &mut [Tile]) -> Vec<FallEvent> {
        let Some(first) = tiles.first_mut() else {
            return Vec::new();
        };
        self.begun = true;
        self.running = true;

        let mut events = Vec::with_capacity(1);
        if first.ignite(1.0, self.config.impulse) {
            events.push(FallEvent::Fell { index: 0, direction: 1.0 });
        }
        events
    }

    /// Advance every falling tile by `dt` seconds and propagate contacts.
    ///
    /// Tiles are visited in order, so a tile ignited by its predecessor
    /// starts moving in the same step.
    pub fn advance(&mut self, tiles: &mut [Tile], dt: f32) -> Vec<FallEvent> {
        debug_assert!(self.begun, "FallSimulation::advance called before begin");
        if !self.running {
            return Vec::new();
        }

        let scale = dt / self.reference_dt;
        let clamp = self.config.clamp_angle();
        let mut events = Vec::new();

        for i in 0..tiles.len() {
            let (head, tail) = tiles.split_at_mut(i + 1);
            let tile = &mut head[i];
            if !tile.is_falling() {
                continue;
            }

            tile.step(self.config.acceleration, clamp, scale);
            if !tile.is_falling() {
                continue;
            }

            let Some(next) = tail.first_mut() else {
                continue;
            };
            if next.is_upright() && self.strikes(tile, next) {
                let direction = if next.pos.x > tile.pos.x { 1.0 } else { -1.0 };
                next.ignite(direction, self.config.impulse);
                log::debug!("tile {} knocked over tile {}", i, i + 1);
                events.push(FallEvent::Fell { index: i + 1, direction });
            }
        }

        if !tiles.iter().any(Tile::is_falling) {
            self.running = false;
            let all_fallen = tiles.iter().all(Tile::has_fallen);
            events.push(FallEvent::Halted { all_fallen });
        }

        events
    }

    /// Halt without emitting anything. Used by reset.
    pub fn stop(&mut self) {
        self.running = false;
        self.begun = false;
    }

    fn strikes(&self, tile: &Tile, next: &Tile) -> bool {
        let distance = (tile.top().x - next.pos.x).abs();
        distance < next.width / 2.0 + self.config.contact_margin
            && tile.angle.abs() > self.config.min_contact_tilt
    }
}

/// A gap in the row that the chain cannot cross.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakPoint {
    /// Index of the tile before the gap.
    pub index: usize,
    pub distance: f32,
}

/// Whether `a` falling can plausibly reach `b`.
pub fn can_reach(a: &Tile, b: &Tile, config: &FallConfig) -> bool {
    (b.pos.x - a.pos.x).abs() < a.height * config.reach_factor
}

/// Every adjacent pair in `tiles` that cannot reach. Expects tiles sorted by x.
pub fn break_points(tiles: &[Tile], config: &FallConfig) -> Vec<BreakPoint> {
    tiles
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| !can_reach(&pair[0], &pair[1], config))
        .map(|(index, pair)| BreakPoint {
            index,
            distance: (pair[1].pos.x - pair[0].pos.x).abs(),
        })
        .collect()
}

/// True when every tile can reach its successor.
pub fn validate_chain(tiles: &[Tile], config: &FallConfig) -> bool {
    tiles.windows(2).all(|pair| can_reach(&pair[0], &pair[1], config))
}
