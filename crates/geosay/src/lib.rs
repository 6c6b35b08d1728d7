#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use geosay_image as image;

#[doc(inline)]
pub use geosay_imgproc as imgproc;

#[doc(inline)]
pub use geosay_io as io;

#[doc(inline)]
pub use geosay_gbi as gbi;
