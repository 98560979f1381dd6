//! Catmull-Clark subdivision of polygon meshes.
//!
//! Catmull-Clark subdivision (Catmull & Clark, 1978) is an approximating
//! scheme that accepts faces of any degree and always produces quads. Each
//! level:
//!
//! 1. Creates a face point at each face centroid
//! 2. Creates an edge point from the edge endpoints and the adjacent face points
//! 3. Repositions each original vertex from its neighbourhood
//! 4. Splits every face of degree n into n quads
//!
//! After one level the mesh is all quads, and the limit surface is C² except
//! at extraordinary vertices (valence other than 4), where it is C¹.
//!
//! Points of the subdivided mesh are laid out as
//! `[repositioned vertices] ++ [edge points] ++ [face points]`, with edge
//! points in first-seen order (faces in order, corners in order).
//!
//! Corner `i` of a face becomes the quad
//! `(v_i, edge(i, i+1), face point, edge(i-1, i))`. Listing `edge(i-1, i)`
//! second instead gives the same quad with reversed winding, so that order
//! would flip every normal of the result.
//!
//! # Boundaries
//!
//! An edge with a single incident face is a boundary edge. How boundaries
//! are treated is selected with [`BoundaryRule`]. Edges with more than two
//! incident faces are tolerated and average all of their face points.
//!
//! # Example
//!
//! ```
//! use tessel::algo::subdivide::{subdivide, SubdivideOptions};
//! use tessel::mesh::shapes;
//!
//! let cube = shapes::cube(1.0);
//! let smooth = subdivide(&cube, &SubdivideOptions::new(2));
//!
//! assert_eq!(smooth.num_faces(), 96);
//! assert!(smooth.is_quad_mesh());
//! ```
//!
//! # References
//!
//! - Catmull, E. & Clark, J. (1978). "Recursively generated B-spline surfaces
//!   on arbitrary topological meshes." Computer-Aided Design, 10(6), 350-355.
//! - DeRose, T., Kass, M. & Truong, T. (1998). "Subdivision Surfaces in
//!   Character Animation." SIGGRAPH '98.

mod catmull_clark;

pub use catmull_clark::{subdivide, subdivide_once, subdivide_with_progress};

/// How subdivision treats edges with a single incident face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundaryRule {
    /// Boundary edges become their midpoint and boundary vertices follow the
    /// cubic B-spline curve rule `3/4 P + 1/8 (L + R)`. A boundary vertex
    /// without exactly two boundary neighbours keeps its position.
    #[default]
    Smooth,
    /// Boundary edges average their endpoints and their one face point, and
    /// boundary vertices use the interior rule. The open border shrinks
    /// toward the interior.
    Clamp,
}

/// Options for subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision levels. Zero returns a copy of the input.
    pub level: usize,

    /// Treatment of boundary edges and vertices.
    pub boundary: BoundaryRule,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SubdivideOptions {
    /// Create options with the specified number of levels.
    pub fn new(level: usize) -> Self {
        Self {
            level,
            boundary: BoundaryRule::default(),
            parallel: true,
        }
    }

    /// Set the boundary rule.
    pub fn with_boundary(mut self, boundary: BoundaryRule) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
