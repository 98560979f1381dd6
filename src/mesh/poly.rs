//! Polygon mesh with faces of arbitrary degree.

use nalgebra::Point3;

use super::geometry::{self, LineGeometry, TriangleGeometry};
use super::quad::QuadMesh;
use super::tri::TriMesh;
use crate::error::{MeshError, Result};

/// A mesh whose faces are polygons with three or more corners.
///
/// Faces are stored as lists of indices into the point array. Winding is not
/// validated; inconsistent winding is accepted and simply produces
/// inconsistent normals downstream.
///
/// # Example
///
/// ```
/// use tessel::mesh::PolyMesh;
/// use nalgebra::Point3;
///
/// let points = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(-0.5, 0.5, 0.0),
/// ];
/// let mesh = PolyMesh::new(points, vec![vec![0, 1, 2, 3, 4]]).unwrap();
///
/// // A pentagon fans into three triangles
/// assert_eq!(mesh.as_triangle_geometry().num_triangles(), 3);
/// assert_eq!(mesh.as_line_geometry().num_segments(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyMesh {
    points: Vec<Point3<f64>>,
    faces: Vec<Vec<usize>>,
}

impl PolyMesh {
    /// Build a polygon mesh, validating face degree and index range.
    ///
    /// A face with fewer than three corners, or with the same vertex on two
    /// of its corners, is rejected as degenerate.
    pub fn new(points: Vec<Point3<f64>>, faces: Vec<Vec<usize>>) -> Result<Self> {
        if let Some(fi) = faces
            .iter()
            .position(|f| f.len() < 3 || geometry::repeats_vertex(f))
        {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        geometry::check_indices(faces.iter().map(Vec::as_slice), points.len())?;
        Ok(Self { points, faces })
    }

    /// Build without validation. Callers guarantee the invariants.
    pub(crate) fn from_raw(points: Vec<Point3<f64>>, faces: Vec<Vec<usize>>) -> Self {
        debug_assert!(faces.iter().all(|f| f.len() >= 3));
        debug_assert!(faces.iter().flatten().all(|&v| v < points.len()));
        Self { points, faces }
    }

    /// The point positions.
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Mutable access to point positions (topology stays fixed).
    #[inline]
    pub fn points_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.points
    }

    /// All faces.
    #[inline]
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// The corner indices of face `i`.
    #[inline]
    pub fn face(&self, i: usize) -> &[usize] {
        &self.faces[i]
    }

    /// Number of points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Sum of all face degrees.
    pub fn num_corners(&self) -> usize {
        self.faces.iter().map(Vec::len).sum()
    }

    /// Number of distinct undirected edges.
    pub fn num_edges(&self) -> usize {
        geometry::unique_edge_indices(self.faces.iter().map(Vec::as_slice)).len() / 2
    }

    /// Whether every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.faces.iter().all(|f| f.len() == 3)
    }

    /// Whether every face is a quad.
    pub fn is_quad_mesh(&self) -> bool {
        self.faces.iter().all(|f| f.len() == 4)
    }

    /// Axis-aligned bounding box, or `None` for a mesh without points.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        geometry::bounding_box(&self.points)
    }

    /// Triangle view. Each face is fan-triangulated from its first corner,
    /// which is only correct for convex planar faces.
    pub fn as_triangle_geometry(&self) -> TriangleGeometry {
        let mut indices = Vec::with_capacity((self.num_corners().saturating_sub(2 * self.num_faces())) * 3);
        for face in &self.faces {
            let first = face[0] as u32;
            for j in 1..face.len() - 1 {
                indices.extend_from_slice(&[first, face[j] as u32, face[j + 1] as u32]);
            }
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
            indices: geometry::unique_edge_indices(self.faces.iter().map(Vec::as_slice)),
        }
    }

    /// Copy into a [`QuadMesh`]. Fails if any face is not a quad.
    pub fn to_quad_mesh(&self) -> Result<QuadMesh> {
        let mut flat = Vec::with_capacity(self.faces.len() * 4);
        for (fi, face) in self.faces.iter().enumerate() {
            if face.len() != 4 {
                return Err(MeshError::FaceArity {
                    face: fi,
                    expected: 4,
                    found: face.len(),
                });
            }
            flat.extend_from_slice(face);
        }
        Ok(QuadMesh::from_raw(self.points.clone(), flat))
    }

    /// Copy into a [`TriMesh`] by fan-triangulating every face.
    pub fn to_tri_mesh(&self) -> TriMesh {
        let mut flat = Vec::new();
        for face in &self.faces {
            for j in 1..face.len() - 1 {
                flat.extend_from_slice(&[face[0], face[j], face[j + 1]]);
            }
        }
        TriMesh::from_raw(self.points.clone(), None, flat)
    }

    /// Consume the mesh, returning its points and faces.
    pub fn into_parts(self) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
        (self.points, self.faces)
    }
}
