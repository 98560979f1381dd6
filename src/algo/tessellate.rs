//! Bicubic Bezier patch tessellation.
//!
//! A [`BezierPatch`] is a 4×4 grid of control points `control[u][v]`. The
//! surface point at parameters `(s, t)` is
//!
//! ```text
//! P(s, t) = Σ_u Σ_v B_u(s) B_v(t) control[u][v]
//! ```
//!
//! where `B_0..B_3` are the cubic Bernstein polynomials (see [`bernstein`]).
//! The patch interpolates its four corner control points and is tangent to
//! the control net along its border.
//!
//! [`tessellate`] samples the patch on a regular `(level + 1)²` grid and
//! returns the samples as a [`QuadMesh`].
//!
//! # Example
//!
//! ```
//! use tessel::algo::tessellate::tessellate;
//! use tessel::mesh::shapes;
//!
//! let patch = shapes::simple_patch();
//! let mesh = tessellate(&patch, 8).unwrap();
//!
//! assert_eq!(mesh.num_points(), 81);
//! assert_eq!(mesh.num_quads(), 64);
//! ```

use log::debug;
use nalgebra::{Point3, Vector3};

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{flatten_points, LineGeometry, QuadMesh};

/// The cubic Bernstein basis at `t`: `((1-t)³, 3t(1-t)², 3t²(1-t), t³)`.
///
/// At `t = 0` this is exactly `(1, 0, 0, 0)` and at `t = 1` exactly
/// `(0, 0, 0, 1)`.
#[inline]
pub fn bernstein(t: f64) -> [f64; 4] {
    let it = 1.0 - t;
    [it * it * it, 3.0 * t * it * it, 3.0 * t * t * it, t * t * t]
}

/// A bicubic Bezier patch with 16 control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierPatch {
    control: [[Point3<f64>; 4]; 4],
}

impl BezierPatch {
    /// Create a patch from control points indexed `control[u][v]`.
    pub fn new(control: [[Point3<f64>; 4]; 4]) -> Self {
        Self { control }
    }

    /// The control points, indexed `[u][v]`.
    #[inline]
    pub fn control(&self) -> &[[Point3<f64>; 4]; 4] {
        &self.control
    }

    /// Evaluate the surface at `(s, t)`.
    ///
    /// Each column `control[0..4][v]` is first reduced along `u` with the
    /// basis at `s`, then the four resulting points are reduced along `v`
    /// with the basis at `t`.
    pub fn evaluate(&self, s: f64, t: f64) -> Point3<f64> {
        let bs = bernstein(s);
        let bt = bernstein(t);

        let mut out = Vector3::<f64>::zeros();
        for (v, wt) in bt.iter().enumerate() {
            let mut column = Vector3::<f64>::zeros();
            for (u, ws) in bs.iter().enumerate() {
                column += self.control[u][v].coords * *ws;
            }
            out += column * *wt;
        }
        Point3::from(out)
    }

    /// The control net as line segments: 16 points, 24 segments.
    ///
    /// Point `control[u][v]` is vertex `u * 4 + v`.
    pub fn control_cage_lines(&self) -> LineGeometry {
        let points: Vec<Point3<f64>> = self.control.iter().flatten().copied().collect();

        let mut indices = Vec::with_capacity(48);
        for u in 0..4u32 {
            for v in 0..3u32 {
                indices.extend_from_slice(&[u * 4 + v, u * 4 + v + 1]);
            }
        }
        for u in 0..3u32 {
            for v in 0..4u32 {
                indices.extend_from_slice(&[u * 4 + v, (u + 1) * 4 + v]);
            }
        }

        LineGeometry {
            positions: flatten_points(&points),
            indices,
        }
    }
}

/// Tessellate a patch into a `level × level` grid of quads.
///
/// Grid point `(i, j)` is the surface at `s = i / level`, `t = j / level`,
/// stored at index `i * (level + 1) + j`. Quad `(i, j)` has corners
/// `(i, j)`, `(i + 1, j)`, `(i + 1, j + 1)`, `(i, j + 1)`.
///
/// Fails with [`MeshError::InvalidParameter`] when `level` is zero.
pub fn tessellate(patch: &BezierPatch, level: usize) -> Result<QuadMesh> {
    check_level(level)?;

    let (points, faces) = sample_grid(patch, level, 0);
    debug!(
        "tessellated patch at level {}: {} points, {} quads",
        level,
        points.len(),
        faces.len() / 4
    );
    Ok(QuadMesh::from_raw(points, faces))
}

/// Tessellate several patches into one mesh.
///
/// Patch `k`'s points follow those of patches `0..k`; patches share no points.
pub fn tessellate_patches(patches: &[BezierPatch], level: usize) -> Result<QuadMesh> {
    tessellate_patches_with_progress(patches, level, &Progress::none())
}

/// [`tessellate_patches`] with a progress update after each patch.
pub fn tessellate_patches_with_progress(
    patches: &[BezierPatch],
    level: usize,
    progress: &Progress,
) -> Result<QuadMesh> {
    const STAGE: &str = "Patch tessellation";

    check_level(level)?;

    let per_patch = (level + 1) * (level + 1);
    let mut points = Vec::with_capacity(per_patch * patches.len());
    let mut faces = Vec::with_capacity(level * level * 4 * patches.len());

    progress.emit(STAGE, 0, patches.len(), 0);
    for (k, patch) in patches.iter().enumerate() {
        let (p, f) = sample_grid(patch, level, points.len());
        points.extend(p);
        faces.extend(f);
        progress.emit(STAGE, k + 1, patches.len(), faces.len() / 4);
    }

    debug!(
        "tessellated {} patches at level {}: {} points, {} quads",
        patches.len(),
        level,
        points.len(),
        faces.len() / 4
    );
    Ok(QuadMesh::from_raw(points, faces))
}

fn check_level(level: usize) -> Result<()> {
    if level == 0 {
        return Err(MeshError::invalid_param("level", level, "must be at least 1"));
    }
    Ok(())
}

/// Sample one patch; face indices are shifted by `base`.
fn sample_grid(patch: &BezierPatch, level: usize, base: usize) -> (Vec<Point3<f64>>, Vec<usize>) {
    let stride = level + 1;
    let n = level as f64;

    let mut points = Vec::with_capacity(stride * stride);
    for i in 0..stride {
        for j in 0..stride {
            points.push(patch.evaluate(i as f64 / n, j as f64 / n));
        }
    }

    let mut faces = Vec::with_capacity(level * level * 4);
    for i in 0..level {
        for j in 0..level {
            let v00 = base + i * stride + j;
            let v10 = v00 + stride;
            faces.extend_from_slice(&[v00, v10, v10 + 1, v00 + 1]);
        }
    }

    (points, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::shapes;

    /// A flat patch whose control points lie on the unit square in the XY plane.
    fn flat_patch() -> BezierPatch {
        let mut control = [[Point3::origin(); 4]; 4];
        for (u, row) in control.iter_mut().enumerate() {
            for (v, p) in row.iter_mut().enumerate() {
                *p = Point3::new(u as f64 / 3.0, v as f64 / 3.0, 0.0);
            }
        }
        BezierPatch::new(control)
    }

    #[test]
    fn test_bernstein_endpoints() {
        assert_eq!(bernstein(0.0), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(bernstein(1.0), [0.0, 0.0, 0.0, 1.0]);

        let mid = bernstein(0.5);
        assert_eq!(mid, [0.125, 0.375, 0.375, 0.125]);
        assert!((mid.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_corners_exact_at_every_level() {
        let patch = shapes::simple_patch();
        let c = patch.control();

        for level in 1..=8 {
            let mesh = tessellate(&patch, level).unwrap();
            let pts = mesh.points();
            let last = level * (level + 1) + level;

            assert!((pts[0] - c[0][0]).norm() < 1e-6);
            assert!((pts[level] - c[0][3]).norm() < 1e-6);
            assert!((pts[level * (level + 1)] - c[3][0]).norm() < 1e-6);
            assert!((pts[last] - c[3][3]).norm() < 1e-6);
        }
    }

    #[test]
    fn test_counts_and_layout() {
        let mesh = tessellate(&shapes::simple_patch(), 4).unwrap();
        assert_eq!(mesh.num_points(), 25);
        assert_eq!(mesh.num_quads(), 16);
        assert_eq!(mesh.quad(0), [0, 5, 6, 1]);
        assert_eq!(mesh.quad(15), [18, 23, 24, 19]);
    }

    #[test]
    fn test_level_zero_rejected() {
        let err = tessellate(&shapes::simple_patch(), 0).unwrap_err();
        assert!(matches!(err, MeshError::InvalidParameter { name: "level", .. }));
        assert!(tessellate_patches(&[shapes::simple_patch()], 0).is_err());
    }

    #[test]
    fn test_flat_patch_is_bilinear() {
        // Evenly spaced control points reproduce the parameter plane
        let mesh = tessellate(&flat_patch(), 5).unwrap();
        for i in 0..=5 {
            for j in 0..=5 {
                let p = mesh.points()[i * 6 + j];
                let expected = Point3::new(i as f64 / 5.0, j as f64 / 5.0, 0.0);
                assert!((p - expected).norm() < 1e-10);
            }
        }
    }

    #[test]
    fn test_evaluate_midpoint() {
        // Center of the arch: rows weighted 1/8, 3/8, 3/8, 1/8 in each direction
        let p = shapes::simple_patch().evaluate(0.5, 0.5);
        assert!(p.x.abs() < 1e-10);
        assert!(p.z.abs() < 1e-10);
        // y: inner control points at 2, border at -1
        // inner weight (3/8 + 3/8)^2 = 9/16
        let expected_y = 2.0 * 9.0 / 16.0 - (1.0 - 9.0 / 16.0);
        assert!((p.y - expected_y).abs() < 1e-10);
    }

    #[test]
    fn test_control_cage_lines() {
        let cage = shapes::simple_patch().control_cage_lines();
        assert_eq!(cage.num_vertices(), 16);
        assert_eq!(cage.num_segments(), 24);
        assert_eq!(&cage.positions[..3], &[-3.0, -1.0, 3.0]);
    }

    #[test]
    fn test_multiple_patches() {
        let patches = [shapes::simple_patch(), flat_patch()];
        let mesh = tessellate_patches(&patches, 3).unwrap();

        assert_eq!(mesh.num_points(), 32);
        assert_eq!(mesh.num_quads(), 18);
        // Second patch indices start after the first patch's 16 points
        assert_eq!(mesh.quad(9), [16, 20, 21, 17]);
        assert_eq!(mesh.points()[16], Point3::origin());
    }
}
