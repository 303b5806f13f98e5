//! Small building blocks shared by the index structures and the samplers.

pub mod bounds;
mod cancel;
mod index_mask;

pub use bounds::bounds2;
pub use cancel::CancelToken;
pub use index_mask::IndexMask;
