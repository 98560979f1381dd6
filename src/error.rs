//! Error types for tessel.
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! is [`MeshError`]. Degenerate geometry (zero-area triangles, zero-length
//! edges) is never reported as an error.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while importing, building or converting meshes.
#[derive(Error, Debug)]
pub enum MeshError {
    /// Malformed mesh text.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number in the source text.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A face has the wrong number of corners for the requested representation.
    #[error("face {face} has {found} corners, expected {expected}")]
    FaceArity {
        /// The face index.
        face: usize,
        /// Corner count required by the target mesh type.
        expected: usize,
        /// Corner count actually found.
        found: usize,
    },

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face corner references a normal or texture coordinate that does not exist.
    #[error("face {face} references invalid {attribute} index {index}")]
    InvalidAttributeIndex {
        /// The face index.
        face: usize,
        /// Which attribute array was indexed.
        attribute: &'static str,
        /// The invalid index.
        index: usize,
    },

    /// A flat index buffer whose length is not a multiple of the face stride.
    #[error("face buffer length {len} is not a multiple of {stride}")]
    InvalidFaceLength {
        /// Length of the buffer.
        len: usize,
        /// Required stride (3 for triangles, 4 for quads).
        stride: usize,
    },

    /// A polygon with fewer than three corners, or one that uses a vertex
    /// on more than one corner.
    #[error("face {face} is degenerate")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// Per-vertex normals that do not match the point count.
    #[error("mesh has {normals} normals for {points} points")]
    NormalCount {
        /// Number of normals supplied.
        normals: usize,
        /// Number of points in the mesh.
        points: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a parse error for the given 1-based line.
    pub fn parse<S: Into<String>>(line: usize, message: S) -> Self {
        MeshError::Parse {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = MeshError::parse(7, "bad float 'x'");
        assert_eq!(e.to_string(), "parse error on line 7: bad float 'x'");

        let e = MeshError::FaceArity {
            face: 2,
            expected: 3,
            found: 4,
        };
        assert_eq!(e.to_string(), "face 2 has 4 corners, expected 3");

        let e = MeshError::invalid_param("level", 0, "must be at least 1");
        assert_eq!(e.to_string(), "invalid parameter: level = 0 (must be at least 1)");
    }
}
