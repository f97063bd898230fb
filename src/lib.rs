//! Decode PLY point clouds and fit them onto a 2-D canvas.
//!
//! The crate is split the way data flows through it:
//!
//! - [`parser`] reads the textual header and the ASCII or binary vertex records into a
//!   [`ply::PointCloud`], extracting coordinates by property name.
//! - [`projection`] computes the uniform, centred, Y-flipped mapping from data space
//!   to canvas pixels.
//! - [`render`] emits background, grid and point primitives to any [`render::Canvas`].
//! - [`scene`], [`library`] and [`config`] hold the state a viewer needs around that:
//!   measurement collections, atomically replaced clouds, a folder of PLY files and
//!   the styling configuration.
//!
//! ```rust
//! use plyview::*;
//!
//! let txt = "ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nend_header\n0 0 0\n10 10 0\n";
//! let cloud = decode_points(txt.as_bytes()).unwrap();
//!
//! let size = projection::CanvasSize::new(100.0, 100.0);
//! let transform = projection::ProjectionTransform::fit(&cloud.samples, size).unwrap();
//! assert_eq!(transform.scale, 10.0);
//! assert_eq!(transform.project(&cloud.samples[0]), (0.0, 100.0));
//! assert_eq!(transform.project(&cloud.samples[1]), (100.0, 0.0));
//! ```

#![warn(missing_docs)]

#[cfg(test)]
#[macro_use]
extern crate doc_comment;

#[cfg(test)]
doctest!("../README.md");

pub mod errors;
pub mod parser;
pub mod ply;
pub mod projection;
pub mod render;
pub mod scene;
pub mod library;
pub mod config;
mod util;

pub use errors::{ DecodeError, DecodeResult, ErrorKind };

use std::io::Read;

/// Decodes a 3-D point cloud from `source`, which is dropped before returning.
pub fn decode_points<R: Read>(source: R) -> DecodeResult<ply::PointCloud<ply::PointSample>> {
    parser::Parser::<ply::PointSample>::new().read_ply(source)
}

/// Decodes a 2-D point set (x and y only) from `source`, which is dropped before returning.
pub fn decode_planar<R: Read>(source: R) -> DecodeResult<ply::PointCloud<ply::Measurement>> {
    parser::Parser::<ply::Measurement>::new().read_ply(source)
}
