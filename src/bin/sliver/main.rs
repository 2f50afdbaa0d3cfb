//! Sliver CLI - half-edge mesh subdivision tool.
//!
//! Loads a mesh (`.tri` triangle soup or `.halfedge`/`.hds` dump),
//! generates Loop subdivision levels 0..=N, and writes each level as both
//! a half-edge dump and a face-list surface under the output directory.
//!
//! Run `sliver --help` for the options.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;

use sliver::algo::subdivide::{loop_subdivide_with_progress, SubdivideOptions};
use sliver::algo::Progress;
use sliver::error::MeshError;
use sliver::io::{self, Format};
use sliver::mesh::HalfEdgeMesh;

#[derive(Parser)]
#[command(name = "sliver")]
#[command(author, version, about = "Half-edge mesh subdivision CLI", long_about = None)]
struct Cli {
    /// Input mesh file (.tri triangle soup or .halfedge/.hds dump)
    input: PathBuf,

    /// Number of subdivision levels to generate
    #[arg(short, long, default_value = "1")]
    subdivisions: usize,

    /// Use single-threaded execution (for benchmarking)
    #[arg(long)]
    sequential: bool,

    /// Directory the generated meshes are written to
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let Some(format) = Format::from_path(&cli.input) else {
        let extension = cli
            .input
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string();
        println!(
            "Read failed for object {}: {}",
            cli.input.display(),
            MeshError::UnsupportedFormat { extension }
        );
        return Ok(());
    };

    let mesh = match load(format, &cli.input) {
        Ok(mesh) => mesh,
        Err(err) => {
            println!("Read failed for object {}: {}", cli.input.display(), err);
            return Ok(());
        }
    };

    println!(
        "Loaded: {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    );

    let stem = cli
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh")
        .to_string();

    let options = SubdivideOptions::new(1).with_parallel(!cli.sequential);
    let progress = create_progress();

    let mut current = mesh;
    for level in 0..=cli.subdivisions {
        if level > 0 {
            println!("Generating subdivision {}...", level);
            let start = Instant::now();
            current = loop_subdivide_with_progress(&current, &options, &progress)?;
            println!(
                "Subdivision {}: {} vertices, {} faces ({:.2?})",
                level,
                current.num_vertices(),
                current.num_faces(),
                start.elapsed()
            );
        }

        write_level(&current, &cli.out_dir, &stem, level)?;
    }

    Ok(())
}

fn load(format: Format, path: &Path) -> Result<HalfEdgeMesh, Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(io::read(format, reader)?)
}

/// Write one subdivision level as `<out>/<stem>_<level>.halfedge` and
/// `<out>/<stem>_<level>.obj`.
fn write_level(
    mesh: &HalfEdgeMesh,
    out_dir: &Path,
    stem: &str,
    level: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(out_dir)?;

    let dump_path = out_dir.join(format!("{stem}_{level}.halfedge"));
    mesh.write_half_edge_dump(BufWriter::new(File::create(&dump_path)?))?;
    println!("Wrote {}", dump_path.display());

    let surface_path = out_dir.join(format!("{stem}_{level}.obj"));
    mesh.write_surface(BufWriter::new(File::create(&surface_path)?))?;
    println!("Wrote {}", surface_path.display());

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    Progress::new(|current, total, message| {
        if total == 0 {
            return;
        }

        let percent = if current >= total {
            100
        } else {
            (current * 100) / total
        };

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        eprint!(
            "\r[{}{}] {:3}% {}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            percent,
            message
        );
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}
