pub mod explosion;
pub mod narration;
pub mod render;
pub mod rng;
