use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::tile::Tile;
use crate::systems::explosion::{Explosion, ExplosionConfig, ExplosionPhase};
use crate::systems::rng::Rng;

/// Catalog art scale applied on top of each landmark's base size.
pub const PROP_SCALE: f32 = 1.5;

/// Landmark catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    Pisa,
    Eiffel,
    Liberty,
    BigBen,
    Pyramid,
    Taj,
    Colosseum,
    GreatWall,
    Sydney,
    Christ,
}

/// Silhouette the renderer draws for a landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PropOutline {
    Rect = 0,
    Triangle = 1,
    Ellipse = 2,
}

/// Static catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropSpec {
    pub name: &'static str,
    /// Size before [`PROP_SCALE`].
    pub base_size: Vec2,
    pub color: u32,
    pub outline: PropOutline,
    /// The one landmark that shrugs off the chain reaction.
    pub exempt: bool,
}

impl PropKind {
    pub const ALL: [PropKind; 10] = [
        Self::Pisa,
        Self::Eiffel,
        Self::Liberty,
        Self::BigBen,
        Self::Pyramid,
        Self::Taj,
        Self::Colosseum,
        Self::GreatWall,
        Self::Sydney,
        Self::Christ,
    ];

    /// Decode the wire code used by the JS bridge (catalog order).
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn spec(self) -> PropSpec {
        let (name, w, h, color, outline, exempt) = match self {
            Self::Pisa => ("Leaning Tower of Pisa", 60.0, 120.0, 0xF5DEB3, PropOutline::Rect, false),
            Self::Eiffel => ("Eiffel Tower", 70.0, 140.0, 0x4A4A4A, PropOutline::Rect, true),
            Self::Liberty => ("Statue of Liberty", 60.0, 130.0, 0x90EE90, PropOutline::Rect, false),
            Self::BigBen => ("Big Ben", 50.0, 120.0, 0x8B4513, PropOutline::Rect, false),
            Self::Pyramid => ("Great Pyramid", 100.0, 80.0, 0xDAA520, PropOutline::Triangle, false),
            Self::Taj => ("Taj Mahal", 80.0, 100.0, 0xFFFAFA, PropOutline::Rect, false),
            Self::Colosseum => ("Colosseum", 90.0, 70.0, 0xD2B48C, PropOutline::Ellipse, false),
            Self::GreatWall => ("Great Wall", 100.0, 60.0, 0x808080, PropOutline::Rect, false),
            Self::Sydney => ("Sydney Opera House", 90.0, 70.0, 0xF5F5F5, PropOutline::Ellipse, false),
            Self::Christ => ("Christ the Redeemer", 70.0, 110.0, 0xE8E8E8, PropOutline::Rect, false),
        };
        PropSpec {
            name,
            base_size: Vec2::new(w, h),
            color,
            outline,
            exempt,
        }
    }

    /// Rendered size in world units.
    pub fn size(self) -> Vec2 {
        self.spec().base_size * PROP_SCALE
    }

    pub fn is_exempt(self) -> bool {
        self.spec().exempt
    }
}

/// A landmark standing at the end of the tile row.
///
/// `pos` is the bottom-centre of the structure, like a tile anchor.
#[derive(Debug, Clone)]
pub struct Prop {
    pub kind: PropKind,
    pub pos: Vec2,
    pub size: Vec2,
    explosion: Option<Explosion>,
}

impl Prop {
    pub fn new(kind: PropKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            size: kind.size(),
            explosion: None,
        }
    }

    /// Middle of the structure; the explosion originates here.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - self.size.y / 2.0)
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        let half = self.size.x / 2.0;
        p.x >= self.pos.x - half
            && p.x <= self.pos.x + half
            && p.y >= self.pos.y - self.size.y
            && p.y <= self.pos.y
    }

    pub fn is_exploding(&self) -> bool {
        self.explosion.is_some()
    }

    pub fn explosion(&self) -> Option<&Explosion> {
        self.explosion.as_ref()
    }

    pub fn phase(&self, cfg: &ExplosionConfig) -> ExplosionPhase {
        self.explosion
            .as_ref()
            .map_or(ExplosionPhase::Idle, |ex| ex.phase(cfg))
    }

    /// Whether a tile's top reaches this prop.
    pub fn touched_by(&self, tile: &Tile, cfg: &ExplosionConfig) -> bool {
        if self.is_exploding() {
            return false;
        }
        let distance = (tile.top().x - self.pos.x).abs();
        distance < self.size.x / 2.0 + cfg.contact_margin && tile.angle.abs() > cfg.contact_min_tilt
    }

    /// Blow the prop up. No-op for the exempt landmark or a prop already exploding.
    /// Returns true if the explosion started now.
    pub fn start_explosion(&mut self, cfg: &ExplosionConfig, rng: &mut Rng) -> bool {
        if self.is_exploding() || self.kind.is_exempt() {
            return false;
        }
        self.explosion = Some(Explosion::spawn(self.center(), cfg, rng));
        true
    }

    pub fn advance_explosion(&mut self, cfg: &ExplosionConfig, scale: f32) {
        if let Some(ex) = &mut self.explosion {
            ex.advance(cfg, scale);
        }
    }

    /// True once the explosion has played out. An intact prop is never settled.
    pub fn is_settled(&self, cfg: &ExplosionConfig) -> bool {
        self.explosion.as_ref().is_some_and(|ex| ex.is_settled(cfg))
    }

    /// Same landmark at the same spot, back in one piece.
    pub fn rebuilt(&self) -> Self {
        Self::new(self.kind, self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::glyph::Glyph;
    use crate::components::tile::SizeClass;

    fn prop(kind: PropKind) -> Prop {
        Prop::new(kind, Vec2::new(500.0, 300.0))
    }

    #[test]
    fn exactly_one_exempt_kind() {
        let exempt: Vec<_> = PropKind::ALL.iter().filter(|k| k.is_exempt()).collect();
        assert_eq!(exempt, vec![&PropKind::Eiffel]);
    }

    #[test]
    fn catalog_codes_round_trip_through_order() {
        assert_eq!(PropKind::from_code(4), Some(PropKind::Pyramid));
        assert_eq!(PropKind::Christ.code(), 9);
        assert_eq!(PropKind::from_code(10), None);
    }

    #[test]
    fn size_is_scaled() {
        assert_eq!(PropKind::Pisa.size(), Vec2::new(90.0, 180.0));
        assert_eq!(prop(PropKind::Pisa).center(), Vec2::new(500.0, 210.0));
    }

    #[test]
    fn exempt_prop_never_explodes() {
        let cfg = ExplosionConfig::default();
        let mut rng = Rng::new(1);
        let mut p = prop(PropKind::Eiffel);
        assert!(!p.start_explosion(&cfg, &mut rng));
        assert!(!p.is_exploding());
        assert_eq!(p.phase(&cfg), ExplosionPhase::Idle);
    }

    #[test]
    fn explosion_starts_once() {
        let cfg = ExplosionConfig::default();
        let mut rng = Rng::new(1);
        let mut p = prop(PropKind::Taj);
        assert!(p.start_explosion(&cfg, &mut rng));
        assert!(!p.start_explosion(&cfg, &mut rng));
        assert!(!p.explosion().unwrap().particles.is_empty());
        assert_eq!(p.phase(&cfg), ExplosionPhase::Flash);
        assert!(!p.is_settled(&cfg));
    }

    #[test]
    fn contains_point_uses_bounding_box() {
        let p = prop(PropKind::Pisa);
        assert!(p.contains_point(Vec2::new(500.0, 200.0)));
        assert!(p.contains_point(Vec2::new(455.0, 120.0)));
        assert!(!p.contains_point(Vec2::new(546.0, 200.0)));
        assert!(!p.contains_point(Vec2::new(500.0, 119.0)));
    }

    #[test]
    fn touched_by_needs_reach_and_tilt() {
        let cfg = ExplosionConfig::default();
        let p = prop(PropKind::Pisa);
        let mut tile = Tile::new(Glyph::letter('Z').unwrap(), SizeClass::Large, Vec2::new(420.0, 300.0));
        assert!(!p.touched_by(&tile, &cfg));
        tile.angle = 1.4;
        assert!(p.touched_by(&tile, &cfg));
        tile.angle = 0.7;
        assert!(!p.touched_by(&tile, &cfg));
    }

    #[test]
    fn rebuilt_prop_is_intact() {
        let cfg = ExplosionConfig::default();
        let mut rng = Rng::new(1);
        let mut p = prop(PropKind::Pyramid);
        p.start_explosion(&cfg, &mut rng);
        let fresh = p.rebuilt();
        assert!(!fresh.is_exploding());
        assert_eq!(fresh.pos, p.pos);
    }
}
