mod luminance;
pub use luminance::*;
