pub mod indices;
pub mod progress;
pub mod recommend;
pub mod risk;

pub use indices::{IndexSource, SyntheticIndexSource};
