//! Quad-only mesh with a flat index buffer.

use nalgebra::Point3;

use super::geometry::{self, LineGeometry, TriangleGeometry};
use super::poly::PolyMesh;
use super::tri::TriMesh;
use crate::error::{MeshError, Result};

/// A mesh made only of quadrilaterals.
///
/// `faces` is a flat buffer; every four consecutive entries `(v0, v1, v2, v3)`
/// form one quad whose edges are `v0v1`, `v1v2`, `v2v3` and `v3v0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadMesh {
    points: Vec<Point3<f64>>,
    faces: Vec<usize>,
}

impl QuadMesh {
    /// Build a quad mesh, validating the buffer stride and index range.
    pub fn new(points: Vec<Point3<f64>>, faces: Vec<usize>) -> Result<Self> {
        if faces.len() % 4 != 0 {
            return Err(MeshError::InvalidFaceLength {
                len: faces.len(),
                stride: 4,
            });
        }
        if let Some(fi) = faces.chunks_exact(4).position(geometry::repeats_vertex) {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        geometry::check_indices(faces.chunks_exact(4), points.len())?;
        Ok(Self { points, faces })
    }

    pub(crate) fn from_raw(points: Vec<Point3<f64>>, faces: Vec<usize>) -> Self {
        debug_assert!(faces.len() % 4 == 0);
        Self { points, faces }
    }

    /// The point positions.
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Mutable access to point positions.
    #[inline]
    pub fn points_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.points
    }

    /// The flat quad index buffer.
    #[inline]
    pub fn faces(&self) -> &[usize] {
        &self.faces
    }

    /// The corners of quad `i`.
    #[inline]
    pub fn quad(&self, i: usize) -> [usize; 4] {
        let f = &self.faces[i * 4..i * 4 + 4];
        [f[0], f[1], f[2], f[3]]
    }

    /// Iterate over quads as 4-element slices.
    pub fn quads(&self) -> std::slice::ChunksExact<'_, usize> {
        self.faces.chunks_exact(4)
    }

    /// Number of points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of quads.
    #[inline]
    pub fn num_quads(&self) -> usize {
        self.faces.len() / 4
    }

    /// Number of distinct undirected edges.
    pub fn num_edges(&self) -> usize {
        geometry::unique_edge_indices(self.quads()).len() / 2
    }

    /// Axis-aligned bounding box.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        geometry::bounding_box(&self.points)
    }

    /// Triangle view: quad `(v0, v1, v2, v3)` becomes `(v0, v1, v2)` and `(v0, v2, v3)`.
    pub fn as_triangle_geometry(&self) -> TriangleGeometry {
        let mut indices = Vec::with_capacity(self.num_quads() * 6);
        for q in self.quads() {
            let [a, b, c, d] = [q[0] as u32, q[1] as u32, q[2] as u32, q[3] as u32];
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
        TriangleGeometry {
            positions: geometry::flatten_points(&self.points),
            normals: None,
            indices,
        }
    }

    /// Wireframe view with each undirected edge once.
    pub fn as_line_geometry(&self) -> LineGeometry {
        LineGeometry {
            positions: geometry::flatten_points(&self.points),
            indices: geometry::unique_edge_indices(self.quads()),
        }
    }

    /// Copy into a [`PolyMesh`].
    pub fn to_poly_mesh(&self) -> PolyMesh {
        PolyMesh::from_raw(self.points.clone(), self.quads().map(<[usize]>::to_vec).collect())
    }

    /// Copy into a [`TriMesh`] using the same split as [`Self::as_triangle_geometry`].
    pub fn to_tri_mesh(&self) -> TriMesh {
        let mut flat = Vec::with_capacity(self.num_quads() * 6);
        for q in self.quads() {
            flat.extend_from_slice(&[q[0], q[1], q[2], q[0], q[2], q[3]]);
        }
        TriMesh::from_raw(self.points.clone(), None, flat)
    }

    /// Consume the mesh, returning its points and flat face buffer.
    pub fn into_parts(self) -> (Vec<Point3<f64>>, Vec<usize>) {
        (self.points, self.faces)
    }
}
