//! # Tessel
//!
//! A small polygon-mesh geometry kernel: index-based mesh types, an OBJ
//! importer, Catmull-Clark subdivision, bicubic Bezier patch tessellation and
//! area-weighted normal generation.
//!
//! ## Features
//!
//! - **Three mesh representations**: [`PolyMesh`](mesh::PolyMesh) for faces of
//!   any degree, [`QuadMesh`](mesh::QuadMesh) and [`TriMesh`](mesh::TriMesh)
//!   with flat index buffers
//! - **Render views**: every mesh yields flat `f32`/`u32` triangle and
//!   wireframe buffers
//! - **File formats**: OBJ in and out, binary STL out
//! - **Parallel passes**: per-face work runs on rayon when enabled
//!
//! ## Quick Start
//!
//! ```no_run
//! use tessel::prelude::*;
//!
//! // Import quads as quads
//! let obj = tessel::io::load_obj("cage.obj", &ObjOptions::default().with_triangulate(false)).unwrap();
//! let cage = obj.as_poly_mesh().unwrap();
//!
//! // Two levels of Catmull-Clark
//! let smooth = subdivide(&cage, &SubdivideOptions::new(2));
//!
//! // Shade it
//! let mut tri = smooth.to_tri_mesh();
//! generate_normals(&mut tri, &NormalOptions::default());
//! tessel::io::save_tri(&tri, "smooth.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use tessel::prelude::*;
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(2.0, 0.5, 0.0),
//! ];
//! // A quad and a triangle sharing an edge
//! let mesh = PolyMesh::new(points, vec![vec![0, 1, 2, 3], vec![1, 4, 2]]).unwrap();
//!
//! assert_eq!(mesh.num_edges(), 6);
//! assert_eq!(mesh.as_triangle_geometry().num_triangles(), 3);
//!
//! let refined = subdivide(&mesh, &SubdivideOptions::new(1));
//! assert_eq!(refined.num_faces(), 7);
//! ```
//!
//! ## Patches
//!
//! ```
//! use tessel::prelude::*;
//! use tessel::mesh::shapes;
//!
//! let grid = tessellate(&shapes::simple_patch(), 10).unwrap();
//! assert_eq!(grid.num_quads(), 100);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use tessel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::normals::{generate_normals, NormalOptions};
    pub use crate::algo::subdivide::{subdivide, BoundaryRule, SubdivideOptions};
    pub use crate::algo::tessellate::{tessellate, BezierPatch};
    pub use crate::algo::{Progress, ProgressEvent};
    pub use crate::error::{MeshError, Result};
    pub use crate::io::obj::{ObjMesh, ObjOptions};
    pub use crate::mesh::{EdgeMap, LineGeometry, PolyMesh, QuadMesh, TriMesh, TriangleGeometry};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    const CUBE_OBJ: &str = "\
# unit cube
v -0.5 -0.5  0.5
v  0.5 -0.5  0.5
v  0.5  0.5  0.5
v -0.5  0.5  0.5
v -0.5 -0.5 -0.5
v  0.5 -0.5 -0.5
v  0.5  0.5 -0.5
v -0.5  0.5 -0.5
f 1 2 3 4
f 2 6 7 3
f 5 1 4 8
f 6 5 8 7
f 4 3 7 8
f 5 6 2 1
";

    #[test]
    fn test_import_subdivide_shade() {
        let obj = crate::io::obj::parse(CUBE_OBJ, &ObjOptions::default().with_triangulate(false)).unwrap();
        let cage = obj.as_poly_mesh().unwrap();
        assert_eq!(cage, crate::mesh::shapes::cube(1.0));

        let smooth = subdivide(&cage, &SubdivideOptions::new(2));
        assert_eq!(smooth.num_faces(), 96);

        let mut tri = smooth.to_tri_mesh();
        assert_eq!(tri.num_triangles(), 192);
        generate_normals(&mut tri, &NormalOptions::default());

        // Closed surface around the origin: every normal points away from it
        for (p, n) in tri.points().iter().zip(tri.normals().unwrap()) {
            assert!(n.dot(&p.coords) > 0.0);
        }

        let geom = tri.as_triangle_geometry();
        assert_eq!(geom.num_vertices(), 98);
        assert_eq!(geom.normals.map(|n| n.len()), Some(98 * 3));
    }

    #[test]
    fn test_triangulated_import_matches_fan() {
        let obj = crate::io::obj::parse(CUBE_OBJ, &ObjOptions::default()).unwrap();
        let tri = obj.as_tri_mesh().unwrap();
        assert_eq!(tri.num_triangles(), 12);
        assert_eq!(tri.num_edges(), 18);
        assert!(obj.as_quad_mesh().is_err());
    }
}
