//! Tessel CLI - subdivision, tessellation and normals from the command line.
//!
//! Usage: tessel <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `tessel --help` for available commands. Set `RUST_LOG=debug` for
//! per-level statistics.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use tessel::algo::normals::{generate_normals, NormalOptions};
use tessel::algo::subdivide::{subdivide_with_progress, BoundaryRule, SubdivideOptions};
use tessel::algo::tessellate::tessellate_patches_with_progress;
use tessel::algo::Progress;
use tessel::io;
use tessel::io::obj::{ObjMesh, ObjOptions};
use tessel::mesh::{shapes, EdgeMap};

#[derive(Parser)]
#[command(name = "tessel")]
#[command(author, version, about = "Polygon mesh subdivision and tessellation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input OBJ file
        input: PathBuf,

        /// Keep polygons as written instead of fan-triangulating them
        #[arg(long)]
        no_triangulate: bool,
    },

    /// Apply Catmull-Clark subdivision
    Subdivide {
        /// Input OBJ file (the control mesh)
        input: PathBuf,

        /// Output mesh file (.obj or .stl)
        output: PathBuf,

        /// Number of subdivision levels
        #[arg(short, long, default_value = "1")]
        level: usize,

        /// Treatment of open boundaries
        #[arg(short, long, value_enum, default_value = "smooth")]
        boundary: BoundaryArg,

        /// Center the input and scale it to a unit box first
        #[arg(long)]
        center: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Tessellate the built-in Bezier patch
    Tessellate {
        /// Output mesh file (.obj or .stl)
        output: PathBuf,

        /// Grid resolution per patch side
        #[arg(short, long, default_value = "8")]
        level: usize,

        /// Also write per-vertex normals
        #[arg(short, long)]
        normals: bool,
    },

    /// Generate area-weighted vertex normals
    Normals {
        /// Input OBJ file
        input: PathBuf,

        /// Output mesh file (.obj or .stl)
        output: PathBuf,

        /// Center the input and scale it to a unit box first
        #[arg(long)]
        center: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum BoundaryArg {
    /// Boundary curves follow the cubic B-spline rule
    Smooth,
    /// Boundary vertices use the interior rule
    Clamp,
}

impl From<BoundaryArg> for BoundaryRule {
    fn from(arg: BoundaryArg) -> Self {
        match arg {
            BoundaryArg::Smooth => BoundaryRule::Smooth,
            BoundaryArg::Clamp => BoundaryRule::Clamp,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input, no_triangulate } => {
            cmd_info(&input, !no_triangulate)?;
        }

        Commands::Subdivide {
            input,
            output,
            level,
            boundary,
            center,
            sequential,
        } => {
            cmd_subdivide(&input, &output, level, boundary.into(), center, sequential)?;
        }

        Commands::Tessellate { output, level, normals } => {
            cmd_tessellate(&output, level, normals)?;
        }

        Commands::Normals {
            input,
            output,
            center,
            sequential,
        } => {
            cmd_normals(&input, &output, center, sequential)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let shown = AtomicUsize::new(0);

    Progress::new(move |event| {
        if event.total == 0 {
            return;
        }

        let percent = (event.fraction() * 100.0).round() as usize;

        // Only redraw when the percentage moves forward
        if shown.fetch_max(percent, Ordering::Relaxed) >= percent && !event.is_done() {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!(
            "\r[{}{}] {:3}% {} ({} faces)",
            bar, space, percent, event.stage, event.faces
        );
        let _ = std::io::stderr().flush();

        if event.is_done() {
            eprintln!();
        }
    })
}

fn load(input: &Path, triangulate: bool, center: bool) -> Result<ObjMesh, Box<dyn std::error::Error>> {
    let options = ObjOptions::default().with_triangulate(triangulate);
    let mut obj = io::load_obj(input, &options)?;
    if center {
        obj.center_and_scale();
    }
    Ok(obj)
}

fn cmd_info(input: &Path, triangulate: bool) -> Result<(), Box<dyn std::error::Error>> {
    let obj = load(input, triangulate, false)?;
    let mesh = obj.as_poly_mesh()?;

    println!("File: {}", input.display());
    println!("Points: {}", mesh.num_points());
    println!("Normals: {}", obj.normals.len());
    println!("Texture coordinates: {}", obj.uvs.len());
    println!("Faces: {}", mesh.num_faces());
    println!("Edges: {}", mesh.num_edges());

    if mesh.num_faces() > 0 {
        let min_degree = mesh.faces().iter().map(Vec::len).min().unwrap_or(0);
        let max_degree = mesh.faces().iter().map(Vec::len).max().unwrap_or(0);
        println!("Face degree range: [{}, {}]", min_degree, max_degree);
    }

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    if mesh.is_triangle_mesh() {
        println!("Mesh type: Triangle mesh");
    } else if mesh.is_quad_mesh() {
        println!("Mesh type: Quad mesh");
    } else {
        println!("Mesh type: Mixed polygon mesh");
    }

    // Faces per undirected edge
    let mut incidence: EdgeMap<usize> = EdgeMap::with_capacity(mesh.num_corners());
    for face in mesh.faces() {
        for (j, &a) in face.iter().enumerate() {
            let b = face[(j + 1) % face.len()];
            *incidence.entry_or_insert_with(a, b, || 0) += 1;
        }
    }
    let boundary = incidence.iter().filter(|(_, &n)| n == 1).count();
    let non_manifold = incidence.iter().filter(|(_, &n)| n > 2).count();

    if boundary == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary edges)", boundary);
    }
    if non_manifold > 0 {
        println!("Non-manifold edges: {}", non_manifold);
    }

    Ok(())
}

fn cmd_subdivide(
    input: &Path,
    output: &Path,
    level: usize,
    boundary: BoundaryRule,
    center: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = load(input, false, center)?.as_poly_mesh()?;

    println!("Loaded: {} points, {} faces", mesh.num_points(), mesh.num_faces());

    let options = SubdivideOptions::new(level)
        .with_boundary(boundary)
        .with_parallel(!sequential);
    let mode = if sequential { "sequential" } else { "parallel" };
    let progress = create_progress();

    println!("Applying Catmull-Clark subdivision ({} levels, {})...", level, mode);
    let start = Instant::now();
    let result = subdivide_with_progress(&mesh, &options, &progress);
    let elapsed = start.elapsed();

    println!("Result: {} points, {} quads", result.num_points(), result.num_faces());
    io::save_poly(&result, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_tessellate(output: &Path, level: usize, normals: bool) -> Result<(), Box<dyn std::error::Error>> {
    let patches = [shapes::simple_patch()];
    let progress = create_progress();

    println!("Tessellating {} patch(es) at level {}...", patches.len(), level);
    let start = Instant::now();
    let quads = tessellate_patches_with_progress(&patches, level, &progress)?;
    let elapsed = start.elapsed();

    println!("Result: {} points, {} quads", quads.num_points(), quads.num_quads());

    if normals {
        let mut tri = quads.to_tri_mesh();
        generate_normals(&mut tri, &NormalOptions::default());
        io::save_tri(&tri, output)?;
    } else {
        io::save_poly(&quads.to_poly_mesh(), output)?;
    }
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_normals(
    input: &Path,
    output: &Path,
    center: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = load(input, true, center)?.as_tri_mesh()?;

    println!("Loaded: {} points, {} triangles", mesh.num_points(), mesh.num_triangles());

    let options = NormalOptions::default().with_parallel(!sequential);
    let mode = if sequential { "sequential" } else { "parallel" };

    println!("Generating vertex normals ({})...", mode);
    let start = Instant::now();
    generate_normals(&mut mesh, &options);
    let elapsed = start.elapsed();

    io::save_tri(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
