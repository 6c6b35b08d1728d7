//! Morphological image processing operations with rectangular structuring elements.

mod ops;
pub use ops::*;
