use bytemuck::{Pod, Zeroable};

/// What a render instance depicts. Stored in [`RenderInstance::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InstanceKind {
    Tile = 0,
    Prop = 1,
    Circle = 2,
    Ribbon = 3,
    Star = 4,
    /// Full-world white flash.
    Flash = 5,
    /// Radial glow around the explosion origin.
    Glow = 6,
    /// Coloured outline ring around the glow.
    Ring = 7,
}

impl InstanceKind {
    pub fn as_f32(self) -> f32 {
        self as u8 as f32
    }
}

/// Per-instance render data read by the JS canvas renderer.
/// Must match the page protocol: 8 floats = 32 bytes stride.
///
/// `code` depends on `kind`: the glyph's code point for tiles, the catalog
/// code for props, a 0xRRGGBB colour for everything else.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// X position in world space. Bottom-centre for tiles and props, centre otherwise.
    pub x: f32,
    pub y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Width in game units. Radius for glow and rings.
    pub width: f32,
    /// Height in game units. Line width for rings.
    pub height: f32,
    pub kind: f32,
    pub code: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Render buffer for one frame.
pub struct RenderBuffer {
    /// Scene instances first, then screen overlays starting at `overlay_split`.
    pub instances: Vec<RenderInstance>,
    /// Instances [0..overlay_split) are tiles, the prop and confetti;
    /// instances [overlay_split..] are flash, glow and rings.
    pub overlay_split: u32,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(512),
            overlay_split: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.overlay_split = 0;
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    /// Mark everything pushed so far as scene content.
    pub fn mark_overlay_split(&mut self) {
        self.overlay_split = self.instances.len() as u32;
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for direct reads from wasm memory.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
