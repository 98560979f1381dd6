//! Intermediate face-corner mesh produced by the OBJ parser.

use std::collections::HashMap;

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{bounding_box, PolyMesh, QuadMesh, TriMesh};

/// One face corner, with 0-based indices into the attribute arrays of an
/// [`ObjMesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjCorner {
    /// Index into [`ObjMesh::points`].
    pub position: usize,
    /// Index into [`ObjMesh::uvs`], if the corner has one.
    pub uv: Option<usize>,
    /// Index into [`ObjMesh::normals`], if the corner has one.
    pub normal: Option<usize>,
}

/// Mesh data as it appears in an OBJ file.
///
/// Positions, normals and texture coordinates are independent arrays, and
/// each face corner indexes them separately, so one position may carry
/// different normals on different faces.
#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    /// Vertex positions (`v`).
    pub points: Vec<Point3<f64>>,
    /// Vertex normals (`vn`).
    pub normals: Vec<Vector3<f64>>,
    /// Texture coordinates (`vt`).
    pub uvs: Vec<Point2<f64>>,
    /// Faces as lists of corners.
    pub faces: Vec<Vec<ObjCorner>>,
}

impl ObjMesh {
    /// An empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate and uniformly scale the positions so the bounding box is
    /// centered at the origin and its largest side spans `[-0.5, 0.5]`.
    ///
    /// A mesh whose points all coincide is only translated.
    pub fn center_and_scale(&mut self) {
        let Some((min, max)) = bounding_box(&self.points) else {
            return;
        };
        let center = nalgebra::center(&min, &max);
        let size = max - min;
        let max_dim = size.x.max(size.y).max(size.z);
        let scale = if max_dim > 0.0 { 1.0 / max_dim } else { 1.0 };

        for p in &mut self.points {
            *p = Point3::from((*p - center) * scale);
        }
    }

    /// Check that every corner indexes existing attributes.
    fn check_corners(&self) -> Result<()> {
        for (fi, face) in self.faces.iter().enumerate() {
            for corner in face {
                if corner.position >= self.points.len() {
                    return Err(MeshError::InvalidVertexIndex {
                        face: fi,
                        vertex: corner.position,
                    });
                }
                let attributes = [
                    ("normal", corner.normal, self.normals.len()),
                    ("texture coordinate", corner.uv, self.uvs.len()),
                ];
                for (attribute, index, count) in attributes {
                    if let Some(index) = index.filter(|&i| i >= count) {
                        return Err(MeshError::InvalidAttributeIndex {
                            face: fi,
                            attribute,
                            index,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Convert to a [`TriMesh`].
    ///
    /// Every face must be a triangle. Output vertices are shared between
    /// corners that have the same position and, when the file has normals,
    /// the same normal; corners that differ in normal become separate vertices.
    pub fn as_tri_mesh(&self) -> Result<TriMesh> {
        self.check_corners()?;
        let has_normals = !self.normals.is_empty();

        let mut points: Vec<Point3<f64>> = Vec::new();
        let mut normals: Vec<Vector3<f64>> = Vec::new();
        let mut faces: Vec<usize> = Vec::with_capacity(self.faces.len() * 3);
        let mut lookup: HashMap<(usize, Option<usize>), usize> = HashMap::new();

        for (fi, face) in self.faces.iter().enumerate() {
            if face.len() != 3 {
                return Err(MeshError::FaceArity {
                    face: fi,
                    expected: 3,
                    found: face.len(),
                });
            }
            for corner in face {
                let key = (corner.position, if has_normals { corner.normal } else { None });
                let idx = *lookup.entry(key).or_insert_with(|| {
                    points.push(self.points[corner.position]);
                    if has_normals {
                        normals.push(corner.normal.map_or_else(Vector3::zeros, |n| self.normals[n]));
                    }
                    points.len() - 1
                });
                faces.push(idx);
            }
        }

        let normals = if has_normals { Some(normals) } else { None };
        TriMesh::new(points, normals, faces)
    }

    /// Convert to a [`QuadMesh`]. Every face must have four distinct corners.
    pub fn as_quad_mesh(&self) -> Result<QuadMesh> {
        let mut faces = Vec::with_capacity(self.faces.len() * 4);
        for (fi, face) in self.faces.iter().enumerate() {
            if face.len() != 4 {
                return Err(MeshError::FaceArity {
                    face: fi,
                    expected: 4,
                    found: face.len(),
                });
            }
            faces.extend(face.iter().map(|c| c.position));
        }
        QuadMesh::new(self.points.clone(), faces)
    }

    /// Convert to a [`PolyMesh`], keeping every face as-is.
    pub fn as_poly_mesh(&self) -> Result<PolyMesh> {
        let faces = self
            .faces
            .iter()
            .map(|f| f.iter().map(|c| c.position).collect())
            .collect();
        PolyMesh::new(self.points.clone(), faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::obj::{parse, ObjOptions};

    #[test]
    fn test_normals_split_vertices() {
        // Two triangles share positions 1 and 2 but use different normals
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 1
vn 0 0 1
vn 1 0 0
f 1//1 2//1 3//1
f 2//2 4//2 3//2
";
        let obj = parse(text, &ObjOptions::default()).unwrap();
        let tri = obj.as_tri_mesh().unwrap();
        assert_eq!(tri.num_points(), 6);
        assert_eq!(tri.num_triangles(), 2);
        let normals = tri.normals().unwrap();
        assert_eq!(normals[tri.triangle(1)[0]], Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_shared_positions_without_normals() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3\nf 2 4 3\n";
        let tri = parse(text, &ObjOptions::default()).unwrap().as_tri_mesh().unwrap();
        assert_eq!(tri.num_points(), 4);
        assert!(tri.normals().is_none());
        assert_eq!(tri.faces(), &[0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn test_arity_errors() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 2 3 4\n";
        let obj = parse(text, &ObjOptions::default().with_triangulate(false)).unwrap();

        assert!(matches!(
            obj.as_tri_mesh(),
            Err(MeshError::FaceArity { face: 1, expected: 3, found: 4 })
        ));
        assert!(matches!(
            obj.as_quad_mesh(),
            Err(MeshError::FaceArity { face: 0, expected: 4, found: 3 })
        ));
        assert_eq!(obj.as_poly_mesh().unwrap().num_faces(), 2);
    }

    #[test]
    fn test_conversion_copies_points() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let obj = parse(text, &ObjOptions::default().with_triangulate(false)).unwrap();
        let mut quad = obj.as_quad_mesh().unwrap();
        quad.points_mut()[0] = Point3::new(7.0, 7.0, 7.0);
        assert_eq!(obj.points[0], Point3::origin());
    }

    #[test]
    fn test_missing_normal_gets_zero() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1//1 2 3//1
";
        let obj = parse(text, &ObjOptions::default()).unwrap();
        assert_eq!(obj.faces[0][1].normal, None);

        let tri = obj.as_tri_mesh().unwrap();
        let normals = tri.normals().unwrap();
        assert_eq!(tri.num_points(), 3);
        assert_eq!(normals[tri.triangle(0)[0]], Vector3::z());
        assert_eq!(normals[tri.triangle(0)[1]], Vector3::zeros());
        assert_eq!(normals[tri.triangle(0)[2]], Vector3::z());
    }

    #[test]
    fn test_missing_normal_is_its_own_vertex() {
        // Position 2 appears once with a normal and once without
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
vn 0 0 1
f 1//1 2//1 3//1
f 2 4//1 3//1
";
        let tri = parse(text, &ObjOptions::default()).unwrap().as_tri_mesh().unwrap();
        assert_eq!(tri.num_points(), 5);
        let normals = tri.normals().unwrap();
        assert_eq!(normals[tri.triangle(1)[0]], Vector3::zeros());
        assert_eq!(tri.points()[tri.triangle(1)[0]], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_out_of_range_corners() {
        let mut obj = ObjMesh::new();
        obj.points.push(Point3::origin());
        let corner = |position| ObjCorner {
            position,
            uv: None,
            normal: None,
        };
        obj.faces.push(vec![corner(0), corner(5), corner(7)]);

        assert!(matches!(
            obj.as_tri_mesh(),
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 5 })
        ));
        assert!(matches!(
            obj.as_poly_mesh(),
            Err(MeshError::InvalidVertexIndex { face: 0, .. })
        ));
        obj.faces[0].push(corner(0));
        assert!(obj.as_quad_mesh().is_err());

        let mut obj = ObjMesh::new();
        obj.points = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)];
        obj.normals.push(Vector3::z());
        obj.faces.push(vec![
            corner(0),
            ObjCorner {
                position: 1,
                uv: None,
                normal: Some(3),
            },
            corner(2),
        ]);
        assert!(matches!(
            obj.as_tri_mesh(),
            Err(MeshError::InvalidAttributeIndex { face: 0, attribute: "normal", index: 3 })
        ));
    }

    #[test]
    fn test_hand_built_repeated_vertex() {
        let mut obj = ObjMesh::new();
        obj.points = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)];
        obj.faces.push(
            [0, 1, 0, 2]
                .into_iter()
                .map(|position| ObjCorner {
                    position,
                    uv: None,
                    normal: None,
                })
                .collect(),
        );
        assert!(matches!(obj.as_quad_mesh(), Err(MeshError::DegenerateFace { face: 0 })));
        assert!(matches!(obj.as_poly_mesh(), Err(MeshError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_center_and_scale() {
        let text = "v 2 0 0\nv 6 1 0\nv 4 2 1\n";
        let mut obj = parse(text, &ObjOptions::default()).unwrap();
        obj.center_and_scale();

        let (min, max) = obj.as_poly_mesh().unwrap().bounding_box().unwrap();
        assert!((min.x + 0.5).abs() < 1e-12);
        assert!((max.x - 0.5).abs() < 1e-12);
        assert!((min.y + 0.25).abs() < 1e-12);
        assert!((max.z - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_center_and_scale_degenerate() {
        let mut empty = ObjMesh::new();
        empty.center_and_scale();
        assert!(empty.points.is_empty());

        let mut single = ObjMesh::new();
        single.points.push(Point3::new(3.0, -2.0, 1.0));
        single.center_and_scale();
        assert_eq!(single.points[0], Point3::origin());
    }
}
