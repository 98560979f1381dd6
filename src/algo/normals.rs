//! Area-weighted vertex normals.
//!
//! Each triangle contributes its unnormalized cross product
//! `(p1 - p0) × (p2 - p0)` to all three of its corners. The cross product's
//! length is twice the triangle area, so large triangles pull the normal
//! harder than small ones without any explicit weighting. The accumulated
//! vector is then normalized; a vertex that touches no triangle, or only
//! degenerate ones, keeps the zero vector.
//!
//! # Example
//!
//! ```
//! use tessel::algo::normals::{generate_normals, NormalOptions};
//! use tessel::mesh::shapes;
//!
//! let mut mesh = shapes::cube(1.0).to_tri_mesh();
//! generate_normals(&mut mesh, &NormalOptions::default());
//!
//! assert_eq!(mesh.normals().unwrap().len(), mesh.num_points());
//! ```

use log::debug;
use nalgebra::Vector3;
use rayon::prelude::*;

use crate::mesh::TriMesh;

/// Options for normal generation.
#[derive(Debug, Clone)]
pub struct NormalOptions {
    /// Compute the per-face cross products in parallel (default: true).
    pub parallel: bool,
}

impl Default for NormalOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl NormalOptions {
    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// The raw cross product of every triangle, in face order.
///
/// Vectors are not normalized; each has length twice the triangle area.
pub fn face_normals(mesh: &TriMesh, parallel: bool) -> Vec<Vector3<f64>> {
    let points = mesh.points();
    let cross = |tri: &[usize]| {
        let p0 = points[tri[0]];
        (points[tri[1]] - p0).cross(&(points[tri[2]] - p0))
    };

    if parallel {
        mesh.faces().par_chunks_exact(3).map(cross).collect()
    } else {
        mesh.triangles().map(cross).collect()
    }
}

/// Replace the normals of `mesh` with area-weighted vertex normals.
///
/// Any existing normals are discarded. Accumulation into vertices is always
/// sequential, so the parallel and sequential paths give identical results.
pub fn generate_normals(mesh: &mut TriMesh, options: &NormalOptions) {
    let crosses = face_normals(mesh, options.parallel);

    let mut normals = vec![Vector3::<f64>::zeros(); mesh.num_points()];
    let mut degenerate = 0;

    for (tri, n) in mesh.triangles().zip(&crosses) {
        if n.norm_squared() == 0.0 {
            degenerate += 1;
            continue;
        }
        for &vi in tri {
            normals[vi] += n;
        }
    }

    for n in &mut normals {
        *n = n.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
    }

    if degenerate > 0 {
        debug!("{} degenerate triangles contributed no normal", degenerate);
    }

    mesh.replace_normals(normals);
}
