#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use grayfilter_image as image;

#[doc(inline)]
pub use grayfilter_imgproc as imgproc;

#[doc(inline)]
pub use grayfilter_io as io;
