//! meshsnap CLI - inspect and rebuild snapshot artifacts from the command line.

use std::env;
use std::process::ExitCode;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use meshsnap::io::ISnapshot;
use meshsnap::rebuild::TreeBuilder;
use meshsnap::util::Result;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut filter = "meshsnap=info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => filter = "meshsnap=debug",
            "-vv" | "--trace" => filter = "meshsnap=trace",
            "-q" | "--quiet" => filter = "meshsnap=error",
            _ => filtered_args.push(arg),
        }
    }

    init_tracing(filter);

    let result = match filtered_args.as_slice() {
        ["info", dir, mesh] => cmd_info(dir, mesh),
        ["frames", dir, mesh] => cmd_frames(dir, mesh),
        ["dump", dir, mesh, frame] => match frame.parse::<i32>() {
            Ok(frame) => cmd_dump(dir, mesh, frame),
            Err(_) => {
                eprintln!("Error: frame must be an integer, got {frame:?}");
                return ExitCode::FAILURE;
            }
        },
        ["tree", dir, mesh] => cmd_tree(dir, mesh),
        _ => {
            print_help();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn print_help() {
    println!(
        "meshsnap {} (built {})",
        env!("CARGO_PKG_VERSION"),
        env!("MESHSNAP_BUILD_DATE")
    );
    println!();
    println!("Usage: meshsnap-cli [-q|-v|-vv] <command> ...");
    println!();
    println!("Commands:");
    println!("  info   <dir> <mesh>          Show snapshot summary");
    println!("  frames <dir> <mesh>          List captured frames");
    println!("  dump   <dir> <mesh> <frame>  Print one frame's vertex positions (1-based)");
    println!("  tree   <dir> <mesh>          Rebuild every frame and summarize each mesh");
}

fn cmd_info(dir: &str, mesh: &str) -> Result<()> {
    let snapshot = ISnapshot::open(dir, mesh)?;
    let meta = snapshot.metadata();

    println!("Mesh:          {}", meta.mesh);
    println!("Frames:        {}", meta.frame_count());
    println!("Vertices:      {}", meta.vertex_count);
    println!("Edges:         {}", meta.edge_count);
    println!("Faces:         {}", meta.face_count);
    println!("Topology mode: {}", meta.topology_mode);
    println!("Precision:     {:?}", meta.precision);
    println!("Exported at:   {} (unix)", meta.exported_at);
    Ok(())
}

fn cmd_frames(dir: &str, mesh: &str) -> Result<()> {
    let snapshot = ISnapshot::open(dir, mesh)?;
    for (row, frame) in snapshot.metadata().frames.iter().enumerate() {
        println!("{:>6}  ->  host frame {}", row + 1, frame);
    }
    Ok(())
}

fn cmd_dump(dir: &str, mesh: &str, frame: i32) -> Result<()> {
    let snapshot = ISnapshot::open(dir, mesh)?;
    let positions = snapshot.positions(frame)?;

    println!(
        "Frame {} (host frame {}):",
        frame,
        snapshot.source_frame(snapshot.row_index(frame)?)
    );
    for (i, p) in positions.iter().enumerate() {
        println!("  [{i:>5}]  {:>10.4} {:>10.4} {:>10.4}", p.x, p.y, p.z);
    }
    Ok(())
}

fn cmd_tree(dir: &str, mesh: &str) -> Result<()> {
    let snapshot = ISnapshot::open(dir, mesh)?;
    let tree = TreeBuilder::new(&snapshot).with_edges(true).whole()?;

    for (number, frame) in tree.iter() {
        let mesh = frame.build_mesh(false)?;
        let (min, max) = mesh.compute_bounds();
        println!(
            "frame {:>5} (host {:>5}): {} verts, {} faces, bounds [{:.3} {:.3} {:.3}]..[{:.3} {:.3} {:.3}]",
            number,
            frame.source_frame,
            mesh.num_vertices(),
            mesh.num_faces(),
            min.x, min.y, min.z,
            max.x, max.y, max.z,
        );
    }
    Ok(())
}
