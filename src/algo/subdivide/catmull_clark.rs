//! Catmull-Clark subdivision for polygon meshes.

use log::debug;
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::algo::Progress;
use crate::mesh::{EdgeMap, PolyMesh};

use super::{BoundaryRule, SubdivideOptions};

const STAGE: &str = "Catmull-Clark subdivision";

/// Performs Catmull-Clark subdivision on a polygon mesh.
///
/// Returns a new all-quad mesh; the input is left untouched. With
/// `options.level == 0` the result is a copy of the input.
///
/// # Vertex Rules
///
/// - **Face point**: centroid of the face corners
/// - **Edge point**: average of the two endpoints and the adjacent face points
/// - **Vertex point**: (F + 2R + (n-3)P) / n where:
///   - F = average of adjacent face points
///   - R = average of adjacent edge midpoints
///   - P = original position
///   - n = valence (number of incident edges)
///
/// Boundary edges and vertices follow `options.boundary`.
pub fn subdivide(mesh: &PolyMesh, options: &SubdivideOptions) -> PolyMesh {
    subdivide_with_progress(mesh, options, &Progress::none())
}

/// Catmull-Clark subdivision with progress reporting after each level.
pub fn subdivide_with_progress(
    mesh: &PolyMesh,
    options: &SubdivideOptions,
    progress: &Progress,
) -> PolyMesh {
    let mut current = mesh.clone();
    progress.emit(STAGE, 0, options.level, current.num_faces());

    for level in 0..options.level {
        current = subdivide_once(&current, options);
        debug!(
            "subdivision level {}: {} points, {} quads",
            level + 1,
            current.num_points(),
            current.num_faces()
        );
        progress.emit(STAGE, level + 1, options.level, current.num_faces());
    }

    current
}

/// Perform exactly one level of Catmull-Clark subdivision.
///
/// `options.level` is ignored.
pub fn subdivide_once(mesh: &PolyMesh, options: &SubdivideOptions) -> PolyMesh {
    let points = mesh.points();
    let faces = mesh.faces();

    if faces.is_empty() {
        return mesh.clone();
    }

    // Step 1: face points
    let centroid = |face: &Vec<usize>| {
        let sum: Vector3<f64> = face.iter().map(|&vi| points[vi].coords).sum();
        Point3::from(sum / face.len() as f64)
    };
    let face_points: Vec<Point3<f64>> = if options.parallel {
        faces.par_iter().map(centroid).collect()
    } else {
        faces.iter().map(centroid).collect()
    };

    // Step 2: edge table and edge points
    let table = EdgeTable::build(faces);

    let degenerate = table
        .edges
        .iter()
        .filter(|e| points[e.ends[0]] == points[e.ends[1]])
        .count();
    if degenerate > 0 {
        debug!("subdivision input has {} zero-length edges", degenerate);
    }

    let boundary = options.boundary;
    let edge_point = |edge: &EdgeRecord| compute_edge_point(points, &face_points, edge, boundary);
    let edge_points: Vec<Point3<f64>> = if options.parallel {
        table.edges.par_iter().map(edge_point).collect()
    } else {
        table.edges.iter().map(edge_point).collect()
    };

    // Step 3: repositioned vertices
    let stars = gather_stars(points, faces, &face_points, &table.edges);
    let vertex_point = |i: usize| compute_vertex_point(points, i, &stars[i], boundary);
    let vertex_points: Vec<Point3<f64>> = if options.parallel {
        (0..points.len()).into_par_iter().map(vertex_point).collect()
    } else {
        (0..points.len()).map(vertex_point).collect()
    };

    // Step 4: topology
    let new_faces = split_faces(faces, &table, points.len());

    let mut new_points = vertex_points;
    new_points.reserve(edge_points.len() + face_points.len());
    new_points.extend(edge_points);
    new_points.extend(face_points);

    PolyMesh::from_raw(new_points, new_faces)
}

/// An undirected edge together with every face that uses it.
#[derive(Debug, Clone)]
struct EdgeRecord {
    ends: [usize; 2],
    faces: Vec<usize>,
}

impl EdgeRecord {
    fn is_boundary(&self) -> bool {
        self.faces.len() == 1
    }
}

/// Unique edges in first-seen order, plus the edge index of every face side.
struct EdgeTable {
    edges: Vec<EdgeRecord>,
    /// `sides[f][j]` is the edge from corner `j` to corner `j + 1` of face `f`.
    sides: Vec<Vec<usize>>,
}

impl EdgeTable {
    fn build(faces: &[Vec<usize>]) -> Self {
        let num_corners: usize = faces.iter().map(Vec::len).sum();
        let mut index: EdgeMap<usize> = EdgeMap::with_capacity(num_corners / 2 + 1);
        let mut edges: Vec<EdgeRecord> = Vec::with_capacity(num_corners / 2 + 1);
        let mut sides = Vec::with_capacity(faces.len());

        for (fi, face) in faces.iter().enumerate() {
            let n = face.len();
            let mut face_sides = Vec::with_capacity(n);
            for j in 0..n {
                let (a, b) = (face[j], face[(j + 1) % n]);
                let next = edges.len();
                let ei = *index.entry_or_insert_with(a, b, || next);
                if ei == next {
                    edges.push(EdgeRecord {
                        ends: [a, b],
                        faces: Vec::with_capacity(2),
                    });
                }
                edges[ei].faces.push(fi);
                face_sides.push(ei);
            }
            sides.push(face_sides);
        }

        Self { edges, sides }
    }
}

fn compute_edge_point(
    points: &[Point3<f64>],
    face_points: &[Point3<f64>],
    edge: &EdgeRecord,
    boundary: BoundaryRule,
) -> Point3<f64> {
    let [a, b] = edge.ends;
    let ends = points[a].coords + points[b].coords;

    if edge.is_boundary() && boundary == BoundaryRule::Smooth {
        return Point3::from(ends * 0.5);
    }

    let faces: Vector3<f64> = edge.faces.iter().map(|&fi| face_points[fi].coords).sum();
    Point3::from((ends + faces) / (2 + edge.faces.len()) as f64)
}

/// Per-vertex sums needed by the vertex rule.
#[derive(Debug, Clone, Default)]
struct VertexStar {
    face_sum: Vector3<f64>,
    face_count: usize,
    midpoint_sum: Vector3<f64>,
    valence: usize,
    boundary_neighbors: Vec<usize>,
}

fn gather_stars(
    points: &[Point3<f64>],
    faces: &[Vec<usize>],
    face_points: &[Point3<f64>],
    edges: &[EdgeRecord],
) -> Vec<VertexStar> {
    let mut stars = vec![VertexStar::default(); points.len()];

    for (face, fp) in faces.iter().zip(face_points) {
        for &vi in face {
            stars[vi].face_sum += fp.coords;
            stars[vi].face_count += 1;
        }
    }

    for edge in edges {
        let [a, b] = edge.ends;
        let midpoint = (points[a].coords + points[b].coords) * 0.5;
        for (v, other) in [(a, b), (b, a)] {
            let star = &mut stars[v];
            star.midpoint_sum += midpoint;
            star.valence += 1;
            if edge.is_boundary() {
                star.boundary_neighbors.push(other);
            }
        }
    }

    stars
}

fn compute_vertex_point(
    points: &[Point3<f64>],
    vi: usize,
    star: &VertexStar,
    boundary: BoundaryRule,
) -> Point3<f64> {
    let p = points[vi];

    // Isolated vertex
    if star.valence == 0 || star.face_count == 0 {
        return p;
    }

    if boundary == BoundaryRule::Smooth && !star.boundary_neighbors.is_empty() {
        return match star.boundary_neighbors[..] {
            [l, r] => Point3::from(p.coords * 0.75 + (points[l].coords + points[r].coords) * 0.125),
            // Corner of a non-manifold fan
            _ => p,
        };
    }

    let n = star.valence as f64;
    let f = star.face_sum / star.face_count as f64;
    let r = star.midpoint_sum / n;
    Point3::from((f + r * 2.0 + p.coords * (n - 3.0)) / n)
}

/// Each face of degree n becomes n quads `(corner, next edge, face, previous edge)`,
/// which keeps the winding of the original face.
fn split_faces(faces: &[Vec<usize>], table: &EdgeTable, num_vertices: usize) -> Vec<Vec<usize>> {
    let edge_base = num_vertices;
    let face_base = num_vertices + table.edges.len();
    let mut out = Vec::with_capacity(table.sides.iter().map(Vec::len).sum());

    for (fi, (face, sides)) in faces.iter().zip(&table.sides).enumerate() {
        let n = face.len();
        for i in 0..n {
            let next_edge = edge_base + sides[i];
            let prev_edge = edge_base + sides[(i + n - 1) % n];
            out.push(vec![face[i], next_edge, face_base + fi, prev_edge]);
        }
    }

    out
}
