//! Core mesh data structures.
//!
//! This module provides the three index-based mesh representations and the
//! helpers they share.
//!
//! # Overview
//!
//! - [`PolyMesh`] holds faces of any degree (three or more corners) as
//!   per-face index lists. It is the input and output of subdivision.
//! - [`QuadMesh`] holds quads in a flat stride-4 buffer. Patch tessellation
//!   produces it.
//! - [`TriMesh`] holds triangles in a flat stride-3 buffer plus optional
//!   per-vertex normals.
//!
//! All topology is expressed as indices into a flat point array. Converting
//! between representations always copies the points, so a derived mesh never
//! aliases the one it came from.
//!
//! Every mesh exposes a triangle view ([`TriangleGeometry`]) and a wireframe
//! view ([`LineGeometry`]) for a renderer. The wireframe view uses an
//! [`EdgeMap`] so each undirected edge is emitted once.
//!
//! # Example
//!
//! ```
//! use tessel::mesh::shapes;
//!
//! let cube = shapes::cube(1.0);
//! let lines = cube.as_line_geometry();
//! assert_eq!(lines.num_segments(), 12);
//! ```

mod edge_map;
mod geometry;
mod poly;
mod quad;
pub mod shapes;
mod tri;

pub use edge_map::{EdgeMap, Iter as EdgeMapIter};
pub(crate) use geometry::{bounding_box, flatten_points};
pub use geometry::{LineGeometry, TriangleGeometry};
pub use poly::PolyMesh;
pub use quad::QuadMesh;
pub use tri::TriMesh;
