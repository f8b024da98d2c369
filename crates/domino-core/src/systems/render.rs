use crate::components::particle::ParticleShape;
use crate::core::scene::Scene;
use crate::renderer::instance::{InstanceKind, RenderBuffer, RenderInstance};
use crate::systems::explosion::ExplosionConfig;

/// Colour of the full-world flash (pale yellow).
pub const FLASH_COLOR: u32 = 0xFFFFC8;
const GLOW_COLOR: u32 = 0xFFFFFF;

/// Build the render buffer for the current scene.
/// Tiles, the intact prop and confetti come first; flash, glow and rings
/// follow as overlays starting at `overlay_split`.
pub fn build_render_buffer(scene: &Scene, cfg: &ExplosionConfig, buffer: &mut RenderBuffer) {
    buffer.clear();

    for tile in scene.tiles() {
        buffer.push(RenderInstance {
            x: tile.pos.x,
            y: tile.pos.y,
            rotation: tile.angle,
            width: tile.width,
            height: tile.height,
            kind: InstanceKind::Tile.as_f32(),
            code: tile.glyph.char() as u32 as f32,
            alpha: 1.0,
        });
    }

    let Some(prop) = scene.prop() else {
        buffer.mark_overlay_split();
        return;
    };

    let Some(explosion) = prop.explosion() else {
        buffer.push(RenderInstance {
            x: prop.pos.x,
            y: prop.pos.y,
            rotation: 0.0,
            width: prop.size.x,
            height: prop.size.y,
            kind: InstanceKind::Prop.as_f32(),
            code: prop.kind.code() as f32,
            alpha: 1.0,
        });
        buffer.mark_overlay_split();
        return;
    };

    for p in &explosion.particles {
        let kind = match p.shape {
            ParticleShape::Circle => InstanceKind::Circle,
            ParticleShape::Ribbon => InstanceKind::Ribbon,
            ParticleShape::Star => InstanceKind::Star,
        };
        buffer.push(RenderInstance {
            x: p.pos.x,
            y: p.pos.y,
            rotation: p.rotation,
            width: p.size,
            height: p.size,
            kind: kind.as_f32(),
            code: p.rgb() as f32,
            alpha: p.life.clamp(0.0, 1.0),
        });
    }
    buffer.mark_overlay_split();

    if let Some(alpha) = explosion.flash_alpha(cfg) {
        let world = scene.world_size();
        buffer.push(RenderInstance {
            x: world.x / 2.0,
            y: world.y / 2.0,
            rotation: 0.0,
            width: world.x,
            height: world.y,
            kind: InstanceKind::Flash.as_f32(),
            code: FLASH_COLOR as f32,
            alpha,
        });
    }

    if let Some(glow) = explosion.glow(cfg) {
        buffer.push(RenderInstance {
            x: glow.center.x,
            y: glow.center.y,
            rotation: 0.0,
            width: glow.radius,
            height: glow.radius,
            kind: InstanceKind::Glow.as_f32(),
            code: GLOW_COLOR as f32,
            alpha: glow.alpha,
        });
        for ring in glow.rings {
            buffer.push(RenderInstance {
                x: glow.center.x,
                y: glow.center.y,
                rotation: 0.0,
                width: ring.radius,
                height: ring.line_width,
                kind: InstanceKind::Ring.as_f32(),
                code: ring.color as f32,
                alpha: ring.alpha,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::glyph::Glyph;
    use crate::components::prop::PropKind;
    use crate::components::tile::SizeClass;
    use crate::core::scene::LayoutConfig;
    use crate::systems::rng::Rng;

    fn scene() -> Scene {
        let mut s = Scene::new(LayoutConfig::default(), 1200.0, 600.0);
        s.place_tile(Glyph::letter('K').unwrap(), SizeClass::Medium);
        s.place_tile(Glyph::digit(4).unwrap(), SizeClass::Small);
        s
    }

    #[test]
    fn tiles_and_intact_prop() {
        let mut s = scene();
        s.place_prop(PropKind::Liberty);
        let mut buf = RenderBuffer::new();
        build_render_buffer(&s, &ExplosionConfig::default(), &mut buf);

        assert_eq!(buf.instance_count(), 3);
        assert_eq!(buf.overlay_split, 3);
        assert_eq!(buf.instances[0].code, 'K' as u32 as f32);
        assert_eq!(buf.instances[1].code, '4' as u32 as f32);
        assert_eq!(buf.instances[2].kind, InstanceKind::Prop.as_f32());
        assert_eq!(buf.instances[2].code, PropKind::Liberty.code() as f32);
    }

    #[test]
    fn exploding_prop_draws_confetti_and_overlays() {
        let cfg = ExplosionConfig::default();
        let mut s = scene();
        s.place_prop(PropKind::Sydney);
        let mut rng = Rng::new(3);
        assert!(s.prop_mut().unwrap().start_explosion(&cfg, &mut rng));

        let mut buf = RenderBuffer::new();
        build_render_buffer(&s, &cfg, &mut buf);

        // 2 tiles + 200 particles, then flash + glow + 3 rings.
        assert_eq!(buf.overlay_split, 202);
        assert_eq!(buf.instance_count(), 207);
        assert!(!buf.instances.iter().any(|i| i.kind == InstanceKind::Prop.as_f32()));
        assert_eq!(buf.instances[202].kind, InstanceKind::Flash.as_f32());
        assert!((buf.instances[202].alpha - 0.6).abs() < 1e-6);
    }

    #[test]
    fn overlays_fade_out_with_progress() {
        let cfg = ExplosionConfig::default();
        let mut s = scene();
        s.place_prop(PropKind::Taj);
        let mut rng = Rng::new(3);
        let prop = s.prop_mut().unwrap();
        prop.start_explosion(&cfg, &mut rng);
        // 30 frames: progress 0.45, past both flash and glow.
        for _ in 0..30 {
            prop.advance_explosion(&cfg, 1.0);
        }

        let mut buf = RenderBuffer::new();
        build_render_buffer(&s, &cfg, &mut buf);
        assert_eq!(buf.instance_count(), buf.overlay_split);
    }
}
