pub mod fall;
pub mod scene;
pub mod scheduler;
pub mod time;
