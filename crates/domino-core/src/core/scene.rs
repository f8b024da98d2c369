use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::glyph::Glyph;
use crate::components::prop::{Prop, PropKind};
use crate::components::tile::{SizeClass, Tile};

/// Spacing rules for laying out the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Anchor x of the first tile.
    pub start_x: f32,
    /// Gap added after each earlier tile's width.
    pub gap: f32,
    /// Size increase per tile already placed (0.08 = +8%).
    pub growth: f32,
    /// Distance from the last tile's right edge to the prop anchor.
    pub prop_offset: f32,
    /// With no tiles, the prop sits this far from the right edge of the world.
    pub prop_inset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_x: 80.0,
            gap: 15.0,
            growth: 0.08,
            prop_offset: 60.0,
            prop_inset: 150.0,
        }
    }
}

/// Where a round is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundState {
    /// Layout can be edited.
    #[default]
    Idle,
    /// Tiles are falling.
    Running,
    /// Fall halted; waiting on the explosion or the celebration delay.
    Settling,
    /// Celebration fired. Only reset or rewind leave this state.
    Complete,
}

/// What a remove-at hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Removed {
    Prop(PropKind),
    Tile { index: usize, glyph: Glyph },
}

/// The row of tiles, the optional prop and the round state.
///
/// Layout edits are only accepted while idle; otherwise they are ignored.
#[derive(Debug, Clone)]
pub struct Scene {
    tiles: Vec<Tile>,
    prop: Option<Prop>,
    state: RoundState,
    layout: LayoutConfig,
    world: Vec2,
}

impl Scene {
    pub fn new(layout: LayoutConfig, world_width: f32, world_height: f32) -> Self {
        Self {
            tiles: Vec::with_capacity(32),
            prop: None,
            state: RoundState::Idle,
            layout,
            world: Vec2::new(world_width, world_height),
        }
    }

    /// The ground line every tile and prop stands on.
    pub fn ground_y(&self) -> f32 {
        self.world.y / 2.0
    }

    pub fn world_size(&self) -> Vec2 {
        self.world
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn prop(&self) -> Option<&Prop> {
        self.prop.as_ref()
    }

    pub(crate) fn prop_mut(&mut self) -> Option<&mut Prop> {
        self.prop.as_mut()
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: RoundState) {
        self.state = state;
    }

    pub fn is_idle(&self) -> bool {
        self.state == RoundState::Idle
    }

    /// Size of the next tile of `size`: the class base grown by the
    /// number of tiles already placed, rounded to whole units.
    pub fn next_tile_size(&self, size: SizeClass) -> Vec2 {
        let factor = 1.0 + self.tiles.len() as f32 * self.layout.growth;
        (size.base_size() * factor).round()
    }

    /// Anchor x for a new tile of `width`, packed after the existing row.
    pub fn next_tile_x(&self, width: f32) -> f32 {
        if self.tiles.is_empty() {
            return self.layout.start_x;
        }
        let used: f32 = self.tiles.iter().map(|t| t.width + self.layout.gap).sum();
        self.layout.start_x + used + width / 2.0
    }

    /// Append a tile after the row. Returns its index, or `None` if not idle.
    pub fn place_tile(&mut self, glyph: Glyph, size: SizeClass) -> Option<usize> {
        if !self.is_idle() {
            return None;
        }
        let dims = self.next_tile_size(size);
        let pos = Vec2::new(self.next_tile_x(dims.x), self.ground_y());
        let tile = Tile::new(glyph, size, pos).with_dimensions(dims.x, dims.y);
        self.insert_tile(tile)
    }

    /// Add a tile with caller-chosen geometry. Returns its index, or `None` if not idle.
    pub fn insert_tile(&mut self, tile: Tile) -> Option<usize> {
        if !self.is_idle() {
            return None;
        }
        self.tiles.push(tile);
        Some(self.tiles.len() - 1)
    }

    /// Where a prop would be anchored right now.
    pub fn prop_anchor(&self) -> Vec2 {
        let x = match self.tiles.last() {
            Some(last) => last.pos.x + last.width / 2.0 + self.layout.prop_offset,
            None => self.world.x - self.layout.prop_inset,
        };
        Vec2::new(x, self.ground_y())
    }

    /// Place (or replace) the prop next to the last tile. False if not idle.
    pub fn place_prop(&mut self, kind: PropKind) -> bool {
        let prop = Prop::new(kind, self.prop_anchor());
        self.insert_prop(prop)
    }

    pub fn insert_prop(&mut self, prop: Prop) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.prop = Some(prop);
        true
    }

    /// Remove whatever sits under `point`: the prop first, then the most
    /// recently placed tile. Misses and non-idle scenes are ignored.
    pub fn remove_at(&mut self, point: Vec2) -> Option<Removed> {
        if !self.is_idle() {
            return None;
        }
        if let Some(prop) = &self.prop {
            if prop.contains_point(point) {
                let kind = prop.kind;
                self.prop = None;
                return Some(Removed::Prop(kind));
            }
        }
        let index = self.tiles.iter().rposition(|t| t.contains_point(point))?;
        let tile = self.tiles.remove(index);
        Some(Removed::Tile {
            index,
            glyph: tile.glyph,
        })
    }

    /// Order the row left to right. Stable, so equal x keeps placement order.
    pub fn sort_tiles(&mut self) {
        self.tiles.sort_by(|a, b| a.pos.x.total_cmp(&b.pos.x));
    }

    pub fn last_tile(&self) -> Option<&Tile> {
        self.tiles.last()
    }

    /// Empty the scene and return to idle.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.prop = None;
        self.state = RoundState::Idle;
    }

    /// Keep the layout but stand every tile up and rebuild the prop.
    pub fn rewind(&mut self) {
        for tile in &mut self.tiles {
            tile.stand_up();
        }
        if let Some(prop) = &self.prop {
            self.prop = Some(prop.rebuilt());
        }
        self.state = RoundState::Idle;
    }
}
