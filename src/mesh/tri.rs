//! Triangle mesh with optional per-vertex normals.

use nalgebra::{Point3, Vector3};

use super::geometry::{self, LineGeometry, TriangleGeometry};
use super::poly::PolyMesh;
use crate::error::{MeshError, Result};

/// A mesh made only of triangles.
///
/// `faces` is a flat buffer with three indices per triangle. When present,
/// `normals` holds one vector per point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    points: Vec<Point3<f64>>,
    normals: Option<Vec<Vector3<f64>>>,
    faces: Vec<usize>,
}

impl TriMesh {
    /// Build a triangle mesh, validating stride, index range and normal count.
    pub fn new(
        points: Vec<Point3<f64>>,
        normals: Option<Vec<Vector3<f64>>>,
        faces: Vec<usize>,
    ) -> Result<Self> {
        if faces.len() % 3 != 0 {
            return Err(MeshError::InvalidFaceLength {
                len: faces.len(),
                stride: 3,
            });
        }
        if let Some(n) = &normals {
            if n.len() != points.len() {
                return Err(MeshError::NormalCount {
                    normals: n.len(),
                    points: points.len(),
                });
            }
        }
        if let Some(fi) = faces.chunks_exact(3).position(geometry::repeats_vertex) {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        geometry::check_indices(faces.chunks_exact(3), points.len())?;
        Ok(Self {
            points,
            normals,
            faces,
        })
    }

    pub(crate) fn from_raw(
        points: Vec<Point3<f64>>,
        normals: Option<Vec<Vector3<f64>>>,
        faces: Vec<usize>,
    ) -> Self {
        debug_assert!(faces.len() % 3 == 0);
        Self {
            points,
            normals,
            faces,
        }
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

    /// Per-vertex normals, if any.
    #[inline]
    pub fn normals(&self) -> Option<&[Vector3<f64>]> {
        self.normals.as_deref()
    }

    /// Replace the normals. Fails if the count does not match the points.
    pub fn set_normals(&mut self, normals: Vec<Vector3<f64>>) -> Result<()> {
        if normals.len() != self.points.len() {
            return Err(MeshError::NormalCount {
                normals: normals.len(),
                points: self.points.len(),
            });
        }
        self.normals = Some(normals);
        Ok(())
    }

    /// Drop the normals.
    pub fn clear_normals(&mut self) {
        self.normals = None;
    }

    pub(crate) fn replace_normals(&mut self, normals: Vec<Vector3<f64>>) {
        debug_assert_eq!(normals.len(), self.points.len());
        self.normals = Some(normals);
    }

    /// The flat triangle index buffer.
    #[inline]
    pub fn faces(&self) -> &[usize] {
        &self.faces
    }

    /// The corners of triangle `i`.
    #[inline]
    pub fn triangle(&self, i: usize) -> [usize; 3] {
        let f = &self.faces[i * 3..i * 3 + 3];
        [f[0], f[1], f[2]]
    }

    /// Iterate over triangles as 3-element slices.
    pub fn triangles(&self) -> std::slice::ChunksExact<'_, usize> {
        self.faces.chunks_exact(3)
    }

    /// Number of points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.faces.len() / 3
    }

    /// Number of distinct undirected edges.
    pub fn num_edges(&self) -> usize {
        geometry::unique_edge_indices(self.triangles()).len() / 2
    }

    /// Axis-aligned bounding box.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        geometry::bounding_box(&self.points)
    }

    /// Triangle view, including normals when the mesh has them.
    pub fn as_triangle_geometry(&self) -> TriangleGeometry {
        TriangleGeometry {
            positions: geometry::flatten_points(&self.points),
            normals: self
                .normals
                .as_deref()
                .filter(|n| !n.is_empty())
                .map(geometry::flatten_vectors),
            indices: self.faces.iter().map(|&v| v as u32).collect(),
        }
    }

    /// Wireframe view with each undirected edge once.
    pub fn as_line_geometry(&self) -> LineGeometry {
        LineGeometry {
            positions: geometry::flatten_points(&self.points),
            indices: geometry::unique_edge_indices(self.triangles()),
        }
    }

    /// Copy into a [`PolyMesh`] (normals are dropped).
    pub fn to_poly_mesh(&self) -> PolyMesh {
        PolyMesh::from_raw(
            self.points.clone(),
            self.triangles().map(<[usize]>::to_vec).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> TriMesh {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        TriMesh::new(points, None, vec![0, 1, 2, 0, 2, 3]).unwrap()
    }

    #[test]
    fn test_validation() {
        let points = vec![Point3::origin(); 3];
        assert!(matches!(
            TriMesh::new(points.clone(), None, vec![0, 1]),
            Err(MeshError::InvalidFaceLength { len: 2, stride: 3 })
        ));
        assert!(matches!(
            TriMesh::new(points.clone(), Some(vec![Vector3::z(); 2]), vec![0, 1, 2]),
            Err(MeshError::NormalCount { normals: 2, points: 3 })
        ));
        assert!(TriMesh::new(points.clone(), None, vec![0, 1, 5]).is_err());
        assert!(matches!(
            TriMesh::new(points, None, vec![0, 1, 1]),
            Err(MeshError::DegenerateFace { face: 0 })
        ));
    }

    #[test]
    fn test_geometry_views() {
        let mut mesh = unit_square();
        let geom = mesh.as_triangle_geometry();
        assert_eq!(geom.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(geom.normals.is_none());

        // 4 boundary edges + 1 diagonal
        assert_eq!(mesh.as_line_geometry().num_segments(), 5);

        mesh.set_normals(vec![Vector3::z(); 4]).unwrap();
        let normals = mesh.as_triangle_geometry().normals.unwrap();
        assert_eq!(normals.len(), 12);
        assert_eq!(&normals[..3], &[0.0, 0.0, 1.0]);

        assert!(mesh.set_normals(vec![Vector3::z(); 3]).is_err());
        mesh.clear_normals();
        assert!(mesh.normals().is_none());
    }

    #[test]
    fn test_to_poly_mesh() {
        let mesh = unit_square();
        let poly = mesh.to_poly_mesh();
        assert_eq!(poly.num_faces(), 2);
        assert_eq!(poly.face(1), &[0, 2, 3]);
        assert_eq!(mesh.triangle(1), [0, 2, 3]);
    }
}
