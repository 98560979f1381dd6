//! Wavefront OBJ support.
//!
//! Reading goes through an intermediate [`ObjMesh`] that keeps the
//! face-corner structure of the file: each corner carries its own position,
//! texture coordinate and normal index. The caller then converts it to the
//! representation it needs with [`ObjMesh::as_tri_mesh`],
//! [`ObjMesh::as_quad_mesh`] or [`ObjMesh::as_poly_mesh`].
//!
//! # Supported directives
//!
//! | Directive | Meaning |
//! |-----------|---------|
//! | `v x y z` | position |
//! | `vn x y z` | normal |
//! | `vt u v` | texture coordinate |
//! | `f c c c ...` | face, each corner `p`, `p/t`, `p//n` or `p/t/n` |
//!
//! Indices are 1-based. A negative index `-k` refers to the k-th most recent
//! element of that kind parsed so far. `#` starts a comment. Other directives
//! (`o`, `g`, `s`, `usemtl`, ...) are skipped.
//!
//! # Example
//!
//! ```
//! use tessel::io::obj::{parse, ObjOptions};
//!
//! let text = "
//! v 0 0 0
//! v 1 0 0
//! v 1 1 0
//! v 0 1 0
//! f 1 2 3 4
//! ";
//!
//! let quads = parse(text, &ObjOptions::default().with_triangulate(false)).unwrap();
//! assert_eq!(quads.as_quad_mesh().unwrap().num_quads(), 1);
//!
//! let tris = parse(text, &ObjOptions::default()).unwrap();
//! assert_eq!(tris.as_tri_mesh().unwrap().num_triangles(), 2);
//! ```

mod mesh;

pub use mesh::{ObjCorner, ObjMesh};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, trace};
use nalgebra::{Point2, Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{PolyMesh, TriMesh};

/// Options for OBJ import.
#[derive(Debug, Clone)]
pub struct ObjOptions {
    /// Fan-triangulate every face while parsing (default: true).
    pub triangulate: bool,
}

impl Default for ObjOptions {
    fn default() -> Self {
        Self { triangulate: true }
    }
}

impl ObjOptions {
    /// Set whether faces are triangulated during import.
    pub fn with_triangulate(mut self, triangulate: bool) -> Self {
        self.triangulate = triangulate;
        self
    }
}

/// Load an OBJ file from disk.
///
/// I/O failures are reported as [`MeshError::Io`]; malformed content as
/// [`MeshError::LoadError`] carrying the path and the parse message.
///
/// ```no_run
/// use tessel::io::obj::{self, ObjOptions};
///
/// let mesh = obj::load("model.obj", &ObjOptions::default()).unwrap();
/// let tri = mesh.as_tri_mesh().unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P, options: &ObjOptions) -> Result<ObjMesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    parse(&text, options).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse OBJ text into an [`ObjMesh`].
pub fn parse(text: &str, options: &ObjOptions) -> Result<ObjMesh> {
    let mut mesh = ObjMesh::new();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            continue;
        };
        let args: Vec<&str> = tokens.collect();

        match command {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&args, line_no, "v")?;
                mesh.points.push(Point3::new(x, y, z));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&args, line_no, "vn")?;
                mesh.normals.push(Vector3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(&args, line_no, "vt")?;
                mesh.uvs.push(Point2::new(u, v));
            }
            "f" => parse_face(&args, line_no, options.triangulate, &mut mesh)?,
            other => trace!("line {}: skipping '{}' directive", line_no, other),
        }
    }

    debug!(
        "parsed OBJ: {} points, {} normals, {} uvs, {} faces",
        mesh.points.len(),
        mesh.normals.len(),
        mesh.uvs.len(),
        mesh.faces.len()
    );

    Ok(mesh)
}

/// Parse the first `N` arguments as floats. Extra arguments are ignored.
fn parse_floats<const N: usize>(args: &[&str], line: usize, directive: &str) -> Result<[f64; N]> {
    if args.len() < N {
        return Err(MeshError::parse(
            line,
            format!("'{}' needs {} values, found {}", directive, N, args.len()),
        ));
    }
    let mut out = [0.0; N];
    for (slot, tok) in out.iter_mut().zip(args) {
        *slot = tok
            .parse::<f64>()
            .map_err(|_| MeshError::parse(line, format!("invalid number '{}'", tok)))?;
    }
    Ok(out)
}

fn parse_face(args: &[&str], line: usize, triangulate: bool, mesh: &mut ObjMesh) -> Result<()> {
    if args.len() < 3 {
        return Err(MeshError::parse(
            line,
            format!("face needs at least 3 corners, found {}", args.len()),
        ));
    }

    let corners = args
        .iter()
        .map(|tok| parse_corner(tok, line, mesh))
        .collect::<Result<Vec<_>>>()?;

    let positions: Vec<usize> = corners.iter().map(|c| c.position).collect();
    if let Some(j) = (0..positions.len()).find(|&j| positions[j + 1..].contains(&positions[j])) {
        return Err(MeshError::parse(
            line,
            format!("face repeats vertex {}", positions[j] + 1),
        ));
    }

    if triangulate {
        let first = corners[0];
        for i in 2..corners.len() {
            mesh.faces.push(vec![first, corners[i - 1], corners[i]]);
        }
    } else {
        mesh.faces.push(corners);
    }

    Ok(())
}

/// Parse one face corner (`p`, `p/t`, `p//n`, `p/t/n`) against the counts
/// parsed so far.
fn parse_corner(token: &str, line: usize, mesh: &ObjMesh) -> Result<ObjCorner> {
    let parts: Vec<&str> = token.split('/').collect();
    if parts.len() > 3 || parts[0].is_empty() {
        return Err(MeshError::parse(line, format!("malformed face corner '{}'", token)));
    }

    let position = resolve_index(parts[0], mesh.points.len(), line, "position")?;
    let uv = match parts.get(1) {
        Some(s) if !s.is_empty() => Some(resolve_index(s, mesh.uvs.len(), line, "texture coordinate")?),
        _ => None,
    };
    let normal = match parts.get(2) {
        Some(s) if !s.is_empty() => Some(resolve_index(s, mesh.normals.len(), line, "normal")?),
        _ => None,
    };

    Ok(ObjCorner {
        position,
        uv,
        normal,
    })
}

/// Turn a 1-based or negative (relative) OBJ index into a 0-based one.
fn resolve_index(token: &str, count: usize, line: usize, what: &str) -> Result<usize> {
    let raw: i64 = token
        .parse()
        .map_err(|_| MeshError::parse(line, format!("invalid {} index '{}'", what, token)))?;

    let resolved = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        count as i64 + raw
    } else {
        -1
    };

    if resolved < 0 || resolved >= count as i64 {
        return Err(MeshError::parse(
            line,
            format!("{} index {} out of range ({} defined)", what, raw, count),
        ));
    }
    Ok(resolved as usize)
}

/// Write a polygon mesh as OBJ text.
pub fn write_poly<W: Write>(mesh: &PolyMesh, writer: &mut W) -> Result<()> {
    writeln!(writer, "# Generated by tessel")?;
    for p in mesh.points() {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for face in mesh.faces() {
        write!(writer, "f")?;
        for &v in face {
            write!(writer, " {}", v + 1)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write a triangle mesh as OBJ text, including `vn` lines when it has normals.
pub fn write_tri<W: Write>(mesh: &TriMesh, writer: &mut W) -> Result<()> {
    writeln!(writer, "# Generated by tessel")?;
    for p in mesh.points() {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    let has_normals = match mesh.normals() {
        Some(normals) => {
            for n in normals {
                writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
            }
            true
        }
        None => false,
    };
    for t in mesh.triangles() {
        let [a, b, c] = [t[0] + 1, t[1] + 1, t[2] + 1];
        if has_normals {
            writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
        } else {
            writeln!(writer, "f {a} {b} {c}")?;
        }
    }
    Ok(())
}

/// Save a polygon mesh to an OBJ file.
pub fn save_poly<P: AsRef<Path>>(mesh: &PolyMesh, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_poly(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Save a triangle mesh to an OBJ file.
pub fn save_tri<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_tri(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";

    #[test]
    fn test_quad_without_triangulation() {
        let obj = parse(QUAD, &ObjOptions::default().with_triangulate(false)).unwrap();
        let poly = obj.as_poly_mesh().unwrap();
        assert_eq!(poly.num_faces(), 1);
        assert_eq!(poly.face(0), &[0, 1, 2, 3]);
        assert_eq!(poly.points()[2], Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_quad_with_triangulation() {
        let obj = parse(QUAD, &ObjOptions::default()).unwrap();
        assert_eq!(obj.faces.len(), 2);
        let tri = obj.as_tri_mesh().unwrap();
        assert_eq!(tri.num_triangles(), 2);
        assert_eq!(tri.faces(), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(tri.as_line_geometry().num_segments(), 5);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let text = "# header\n\nv 0 0 0 # origin\r\nv 1 0 0\nv 0 1 0\n   \no thing\nf 1 2 3 # tri\n";
        let obj = parse(text, &ObjOptions::default()).unwrap();
        assert_eq!(obj.points.len(), 3);
        assert_eq!(obj.faces.len(), 1);
    }

    #[test]
    fn test_corner_forms() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
f 1//1 2//1 3//1
f 1/1 2/2 3/3
";
        let obj = parse(text, &ObjOptions::default()).unwrap();
        assert_eq!(
            obj.faces[0][1],
            ObjCorner {
                position: 1,
                uv: Some(1),
                normal: Some(0)
            }
        );
        assert_eq!(obj.faces[1][2].uv, None);
        assert_eq!(obj.faces[1][2].normal, Some(0));
        assert_eq!(obj.faces[2][0].normal, None);
        assert_eq!(obj.faces[2][2].uv, Some(2));
    }

    #[test]
    fn test_texture_coordinate_third_component_ignored() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.25 0.75 0.5\nvt 1 0\nvt 0 1 0\nf 1/1 2/2 3/3\n";
        let obj = parse(text, &ObjOptions::default()).unwrap();
        assert_eq!(obj.uvs.len(), 3);
        assert_eq!(obj.uvs[0], Point2::new(0.25, 0.75));
        assert_eq!(obj.uvs[2], Point2::new(0.0, 1.0));
        assert_eq!(obj.faces[0][0].uv, Some(0));

        // Fewer than two values is still an error
        let err = parse("vt 0.5\n", &ObjOptions::default()).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_negative_indices() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
f -3 -2 -1
v 5 5 5
f 1 -2 -1
";
        let obj = parse(text, &ObjOptions::default()).unwrap();
        let positions: Vec<usize> = obj.faces[0].iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        // Relative to the four points defined by then
        let positions: Vec<usize> = obj.faces[1].iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 2, 3]);
    }

    #[test]
    fn test_parse_errors() {
        let opts = ObjOptions::default();

        let err = parse("v 0 abc 0\n", &opts).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 1, .. }));

        let err = parse("v 0 0\n", &opts).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 1, .. }));

        // Forward reference
        let err = parse("v 0 0 0\nv 1 0 0\nf 1 2 3\nv 0 1 0\n", &opts).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 3, .. }));

        // Zero is never a valid index
        let err = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n", &opts).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 4, .. }));

        // Relative index past the start
        let err = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -4 1 2\n", &opts).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 4, .. }));

        // Missing normal
        let err = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1//1 2//1 3//1\n", &opts).unwrap_err();
        assert!(matches!(err, MeshError::Parse { .. }));

        let err = parse("v 0 0 0\nv 1 0 0\nf 1 2\n", &opts).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 3, .. }));

        let err = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3 1\n", &opts).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 4, .. }));
    }

    #[test]
    fn test_rejects_face_reusing_a_vertex() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 1 3\n";
        for triangulate in [true, false] {
            let err = parse(text, &ObjOptions::default().with_triangulate(triangulate)).unwrap_err();
            match err {
                MeshError::Parse { line, message } => {
                    assert_eq!(line, 4);
                    assert!(message.contains("repeats vertex 1"), "{}", message);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        // Same vertex through a relative index
        let err = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3 -2\n", &ObjOptions::default()).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 4, .. }));
    }

    #[test]
    fn test_write_poly_round_trip() {
        let cube = crate::mesh::shapes::cube(2.0);
        let mut buf = Vec::new();
        write_poly(&cube, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let back = parse(&text, &ObjOptions::default().with_triangulate(false))
            .unwrap()
            .as_poly_mesh()
            .unwrap();
        assert_eq!(back, cube);
    }

    #[test]
    fn test_write_tri_with_normals() {
        let obj = parse(QUAD, &ObjOptions::default()).unwrap();
        let mut tri = obj.as_tri_mesh().unwrap();
        tri.set_normals(vec![Vector3::z(); 4]).unwrap();

        let mut buf = Vec::new();
        write_tri(&tri, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("vn 0 0 1"));
        assert!(text.contains("f 1//1 2//2 3//3"));

        let back = parse(&text, &ObjOptions::default()).unwrap().as_tri_mesh().unwrap();
        assert_eq!(back.num_triangles(), 2);
        assert_eq!(back.normals().map(<[_]>::len), Some(4));
    }
}
