//! Binary STL export.
//!
//! STL stores unshared triangles with one facet normal each, so it is an
//! output-only format here: meshes are written for slicers and viewers, not
//! read back.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

/// Convert a triangle mesh into STL facets.
///
/// Degenerate triangles are written with a zero normal.
pub fn to_triangles(mesh: &TriMesh) -> Vec<stl_io::Triangle> {
    let points = mesh.points();
    mesh.triangles()
        .map(|t| {
            let p0 = &points[t[0]];
            let p1 = &points[t[1]];
            let p2 = &points[t[2]];

            let n = (p1 - p0).cross(&(p2 - p0));
            let n = n.try_normalize(0.0).unwrap_or(n);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect()
}

/// Write a triangle mesh as binary STL.
pub fn write<W: Write>(mesh: &TriMesh, writer: &mut W) -> std::io::Result<()> {
    let triangles = to_triangles(mesh);
    stl_io::write_stl(writer, triangles.iter())
}

/// Save a triangle mesh to a binary STL file.
///
/// ```no_run
/// use tessel::io::{obj, stl};
///
/// let tri = obj::load("model.obj", &Default::default()).unwrap().as_tri_mesh().unwrap();
/// stl::save(&tri, "model.stl").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write(mesh, &mut writer).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::io::Cursor;

    fn square() -> TriMesh {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        TriMesh::new(points, None, vec![0, 1, 2, 0, 2, 3]).unwrap()
    }

    #[test]
    fn test_facet_normals() {
        let tris = to_triangles(&square());
        assert_eq!(tris.len(), 2);
        for t in &tris {
            assert_eq!(t.normal, stl_io::Normal::new([0.0, 0.0, 1.0]));
        }
    }

    #[test]
    fn test_binary_size() {
        let mut buf = Vec::new();
        write(&square(), &mut buf).unwrap();
        // 80-byte header + count + 50 bytes per facet
        assert_eq!(buf.len(), 84 + 2 * 50);

        let indexed = stl_io::read_stl(&mut Cursor::new(buf)).unwrap();
        assert_eq!(indexed.faces.len(), 2);
    }
}
