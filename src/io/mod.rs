//! Mesh file I/O.
//!
//! The kernel itself works on text and in-memory meshes; this module adds
//! thin local-file helpers around it.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Polygon faces, normals, texture coordinates |
//! | STL | `.stl` | ✗ | ✓ | Binary, triangles only |
//!
//! # Usage
//!
//! ```no_run
//! use tessel::io::{load_obj, save_poly};
//! use tessel::io::obj::ObjOptions;
//!
//! let control = load_obj("control.obj", &ObjOptions::default().with_triangulate(false))
//!     .unwrap()
//!     .as_poly_mesh()
//!     .unwrap();
//!
//! // Format is picked from the extension; STL output is fan-triangulated
//! save_poly(&control, "control.stl").unwrap();
//! ```

pub mod obj;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{PolyMesh, TriMesh};

use obj::{ObjMesh, ObjOptions};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load an OBJ file into the intermediate face-corner mesh.
///
/// The file is read as OBJ text whatever its extension.
pub fn load_obj<P: AsRef<Path>>(path: P, options: &ObjOptions) -> Result<ObjMesh> {
    obj::load(path.as_ref(), options)
}

/// Save a polygon mesh, picking the format from the extension.
pub fn save_poly<P: AsRef<Path>>(mesh: &PolyMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save_poly(mesh, path),
        Format::Stl => stl::save(&mesh.to_tri_mesh(), path),
    }
}

/// Save a triangle mesh, picking the format from the extension.
pub fn save_tri<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save_tri(mesh, path),
        Format::Stl => stl::save(mesh, path),
    }
}
