//! Small built-in control meshes.

use nalgebra::Point3;

use super::poly::PolyMesh;
use crate::algo::tessellate::BezierPatch;

/// An axis-aligned cube of edge length `size` centered at the origin.
///
/// Six outward-facing quads over eight points.
pub fn cube(size: f64) -> PolyMesh {
    let h = size / 2.0;
    let points = vec![
        // Front (z = +h)
        Point3::new(-h, -h, h),
        Point3::new(h, -h, h),
        Point3::new(h, h, h),
        Point3::new(-h, h, h),
        // Back (z = -h)
        Point3::new(-h, -h, -h),
        Point3::new(h, -h, -h),
        Point3::new(h, h, -h),
        Point3::new(-h, h, -h),
    ];
    let faces = vec![
        vec![0, 1, 2, 3], // front
        vec![1, 5, 6, 2], // right
        vec![4, 0, 3, 7], // left
        vec![5, 4, 7, 6], // back
        vec![3, 2, 6, 7], // top
        vec![4, 5, 1, 0], // bottom
    ];
    PolyMesh::from_raw(points, faces)
}

/// A flat `n × n` grid of unit quads in the XY plane, an open mesh.
pub fn grid(n: usize) -> PolyMesh {
    let mut points = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            points.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    let mut faces = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;
            faces.push(vec![v00, v10, v11, v01]);
        }
    }

    PolyMesh::from_raw(points, faces)
}

/// An arched demonstration patch spanning 6 units in x and z, with its
/// four interior control points raised.
pub fn simple_patch() -> BezierPatch {
    let row = |x: f64, inner: f64| {
        [
            Point3::new(x, -1.0, 3.0),
            Point3::new(x, inner, 1.0),
            Point3::new(x, inner, -1.0),
            Point3::new(x, -1.0, -3.0),
        ]
    };
    BezierPatch::new([row(-3.0, -1.0), row(-1.0, 2.0), row(1.0, 2.0), row(3.0, -1.0)])
}
