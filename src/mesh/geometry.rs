//! Flat geometry buffers handed to a renderer.
//!
//! Every mesh type can produce a [`TriangleGeometry`] (solid view) and a
//! [`LineGeometry`] (wireframe view). Both use `f32` positions with stride 3
//! and `u32` indices, the layout GPU vertex and index buffers expect.

use nalgebra::{Point3, Vector3};

use super::edge_map::EdgeMap;

/// Triangle view of a mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleGeometry {
    /// Vertex positions, `[x0, y0, z0, x1, ...]`.
    pub positions: Vec<f32>,
    /// Optional per-vertex normals with the same layout as `positions`.
    pub normals: Option<Vec<f32>>,
    /// Triangle indices, three per triangle.
    pub indices: Vec<u32>,
}

impl TriangleGeometry {
    /// Number of vertices in the position buffer.
    pub fn num_vertices(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles in the index buffer.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Wireframe view of a mesh. Each undirected edge appears exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineGeometry {
    /// Vertex positions, `[x0, y0, z0, x1, ...]`.
    pub positions: Vec<f32>,
    /// Segment indices, two per edge.
    pub indices: Vec<u32>,
}

impl LineGeometry {
    /// Number of vertices in the position buffer.
    pub fn num_vertices(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of line segments in the index buffer.
    pub fn num_segments(&self) -> usize {
        self.indices.len() / 2
    }
}

/// Flatten points into an `f32` stride-3 buffer.
pub(crate) fn flatten_points(points: &[Point3<f64>]) -> Vec<f32> {
    let mut out = Vec::with_capacity(points.len() * 3);
    for p in points {
        out.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
    }
    out
}

/// Flatten vectors into an `f32` stride-3 buffer.
pub(crate) fn flatten_vectors(vectors: &[Vector3<f64>]) -> Vec<f32> {
    let mut out = Vec::with_capacity(vectors.len() * 3);
    for v in vectors {
        out.extend_from_slice(&[v.x as f32, v.y as f32, v.z as f32]);
    }
    out
}

/// Collect the boundary edges of every face, emitting each undirected edge
/// once in first-seen order.
pub(crate) fn unique_edge_indices<'a, F>(faces: F) -> Vec<u32>
where
    F: IntoIterator<Item = &'a [usize]>,
{
    let mut seen: EdgeMap<()> = EdgeMap::new();
    let mut indices = Vec::new();

    for face in faces {
        let n = face.len();
        for j in 0..n {
            let v1 = face[j];
            let v2 = face[(j + 1) % n];
            if !seen.has(v1, v2) {
                seen.set(v1, v2, ());
                indices.push(v1 as u32);
                indices.push(v2 as u32);
            }
        }
    }

    indices
}

/// Whether any vertex appears on more than one corner of `face`.
///
/// Fan triangulation of such a face yields triangles with a self-edge.
pub(crate) fn repeats_vertex(face: &[usize]) -> bool {
    face.iter()
        .enumerate()
        .any(|(j, v)| face[j + 1..].contains(v))
}

/// Axis-aligned bounding box of a point set.
pub(crate) fn bounding_box(points: &[Point3<f64>]) -> Option<(Point3<f64>, Point3<f64>)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min = min.inf(p);
        max = max.sup(p);
    }
    Some((min, max))
}

/// Check that every index in `faces` is below `num_points`.
pub(crate) fn check_indices<'a, F>(faces: F, num_points: usize) -> crate::error::Result<()>
where
    F: IntoIterator<Item = &'a [usize]>,
{
    for (fi, face) in faces.into_iter().enumerate() {
        if let Some(&vi) = face.iter().find(|&&vi| vi >= num_points) {
            return Err(crate::error::MeshError::InvalidVertexIndex { face: fi, vertex: vi });
        }
    }
    Ok(())
}
