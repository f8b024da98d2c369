pub mod glyph;
pub mod particle;
pub mod prop;
pub mod tile;
