//! Single-frame organic outlines.
//!
//! Both generators sample a handful of control points from layered sine
//! distortion and smooth them with [`spline::build`](crate::spline::build):
//!
//! - [`blob`] - one closed outline around the origin
//! - [`wave`] - stacked open wave lines turned into filled silhouettes

pub mod blob;
pub mod wave;

pub use blob::{BlobFrame, BlobGenerator};
pub use wave::{WaveGenerator, WaveLayer};
