//! Mesh processing algorithms.
//!
//! - **Subdivision**: Catmull-Clark refinement of polygon meshes
//! - **Tessellation**: sampling bicubic Bezier patches into quad grids
//! - **Normals**: area-weighted vertex normals for triangle meshes
//!
//! Every algorithm takes its input by reference (or, for normals, fills in a
//! field of the mesh it is given) and builds adjacency fresh for each call.

pub mod normals;
pub mod progress;
pub mod subdivide;
pub mod tessellate;

pub use progress::{Progress, ProgressEvent};
