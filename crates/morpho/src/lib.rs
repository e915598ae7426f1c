#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use morpho_face as face;

#[doc(inline)]
pub use morpho_image as image;

#[doc(inline)]
pub use morpho_imgproc as imgproc;

#[doc(inline)]
pub use morpho_io as io;

#[doc(inline)]
pub use morpho_morph as morph;
