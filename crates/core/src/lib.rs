pub mod model;
pub mod quiz;
pub mod scoring;
pub mod time;

pub use time::Clock;
