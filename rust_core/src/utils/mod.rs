pub mod matching;

pub use matching::{normalize, similarity};
