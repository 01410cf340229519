// vmap-tools - Inspection and query CLI for vmap collision files
//
// File I/O and tile-coordinate bookkeeping happen here; the vmap library
// itself only ever sees in-memory buffers.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

mod log;

use vmap::math::Vector3;
use vmap::query;
use vmap::tile::{decode_tile, VMapTile};
use vmap::tree::decode_tree;

use log::{initialize_logging, map_log_level};

#[derive(Parser, Debug)]
#[command(name = "vmap-tools")]
#[command(about = "VMap collision file inspection and query tools")]
#[command(version)]
struct Cli {
    /// Console log level override (0=Minimum, 1=Error, 2=Detail, 3=Full/Debug, 4=Trace)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<i32>,

    /// Directory for the rolling log file (console only when unset)
    #[arg(long = "log-dir")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a .vmtile file and list its spawns
    Inspect(InspectArgs),
    /// Decode the root bounding volume of a .vmtree file
    Tree(TreeArgs),
    /// Run a line-of-sight query against one tile's spawns
    Los(LosArgs),
    /// List spawns within a radius of a point in one tile
    Near(NearArgs),
}

#[derive(Clone, Debug)]
struct Tile {
    x: i32,
    y: i32,
}

fn parse_tile(input: &str) -> Result<Tile, String> {
    let mut parts = input.split(',');
    let x = parts
        .next()
        .ok_or_else(|| "Missing tile X".to_string())?
        .parse::<i32>()
        .map_err(|_| "Invalid tile X".to_string())?;
    let y = parts
        .next()
        .ok_or_else(|| "Missing tile Y".to_string())?
        .parse::<i32>()
        .map_err(|_| "Invalid tile Y".to_string())?;
    Ok(Tile { x, y })
}

fn parse_point(input: &str) -> Result<Vector3, String> {
    let parts: Vec<&str> = input.split(',').collect();
    if parts.len() != 3 {
        return Err("Expected x,y,z".to_string());
    }
    let mut coords = [0.0f32; 3];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse::<f32>()
            .map_err(|_| format!("Invalid coordinate '{}'", part))?;
    }
    Ok(Vector3::new(coords[0], coords[1], coords[2]))
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Tile file path
    file: String,

    /// Tile grid coordinates (format: X,Y)
    #[arg(long = "tile", value_parser = parse_tile, default_value = "0,0")]
    tile: Tile,

    /// Emit the decoded tile as JSON instead of a listing
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct TreeArgs {
    /// Tree file path
    file: String,
}

#[derive(Args, Debug)]
struct LosArgs {
    /// Tile file path
    file: String,

    /// Tile grid coordinates (format: X,Y)
    #[arg(long = "tile", value_parser = parse_tile, default_value = "0,0")]
    tile: Tile,

    /// Sight line start point (format: x,y,z)
    #[arg(long = "from", value_parser = parse_point)]
    from: Vector3,

    /// Sight line end point (format: x,y,z)
    #[arg(long = "to", value_parser = parse_point)]
    to: Vector3,
}

#[derive(Args, Debug)]
struct NearArgs {
    /// Tile file path
    file: String,

    /// Tile grid coordinates (format: X,Y)
    #[arg(long = "tile", value_parser = parse_tile, default_value = "0,0")]
    tile: Tile,

    /// Query center point (format: x,y,z)
    #[arg(long = "at", value_parser = parse_point)]
    at: Vector3,

    /// Search radius
    #[arg(long = "radius", default_value_t = 50.0)]
    radius: f32,
}

fn load_tile(file: &str, tile: &Tile) -> anyhow::Result<VMapTile> {
    let buffer = std::fs::read(file).with_context(|| format!("Could not read {}", file))?;
    let decoded = decode_tile(&buffer, tile.x, tile.y)
        .with_context(|| format!("Could not decode {}", file))?;
    Ok(decoded)
}

fn run_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let tile = load_tile(&args.file, &args.tile)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tile)?);
        return Ok(());
    }

    tracing::info!(
        "{}: {} with {} spawns",
        args.file,
        tile.magic,
        tile.spawns.len()
    );
    for spawn in &tile.spawns {
        if spawn.has_bound() {
            tracing::info!(
                "spawn {} '{}' at ({:.1}, {:.1}, {:.1}) bound ({:.1}, {:.1}, {:.1})..({:.1}, {:.1}, {:.1})",
                spawn.id,
                spawn.name,
                spawn.position.x,
                spawn.position.y,
                spawn.position.z,
                spawn.bound.min.x,
                spawn.bound.min.y,
                spawn.bound.min.z,
                spawn.bound.max.x,
                spawn.bound.max.y,
                spawn.bound.max.z
            );
        } else {
            tracing::info!(
                "spawn {} '{}' at ({:.1}, {:.1}, {:.1}) without bound",
                spawn.id,
                spawn.name,
                spawn.position.x,
                spawn.position.y,
                spawn.position.z
            );
        }
    }
    Ok(())
}

fn run_tree(args: TreeArgs) -> anyhow::Result<()> {
    let buffer =
        std::fs::read(&args.file).with_context(|| format!("Could not read {}", args.file))?;
    let bound = decode_tree(&buffer).with_context(|| format!("Could not decode {}", args.file))?;

    tracing::info!(
        "{}: root bound ({:.1}, {:.1}, {:.1})..({:.1}, {:.1}, {:.1})",
        args.file,
        bound.min.x,
        bound.min.y,
        bound.min.z,
        bound.max.x,
        bound.max.y,
        bound.max.z
    );
    Ok(())
}

fn run_los(args: LosArgs) -> anyhow::Result<()> {
    let tile = load_tile(&args.file, &args.tile)?;

    match query::line_of_sight(args.from, args.to, &tile.spawns) {
        Some(blocking) => tracing::info!(
            "blocked by spawn {} '{}' at distance {:.2}, hit point ({:.2}, {:.2}, {:.2})",
            blocking.spawn.id,
            blocking.spawn.name,
            blocking.hit.distance,
            blocking.hit.point.x,
            blocking.hit.point.y,
            blocking.hit.point.z
        ),
        None => tracing::info!("line of sight is clear"),
    }
    Ok(())
}

fn run_near(args: NearArgs) -> anyhow::Result<()> {
    let tile = load_tile(&args.file, &args.tile)?;

    let found = query::spawns_in_radius(args.at, args.radius, &tile.spawns);
    tracing::info!(
        "{} spawns within {:.1} of ({:.1}, {:.1}, {:.1})",
        found.len(),
        args.radius,
        args.at.x,
        args.at.y,
        args.at.z
    );
    for (spawn, distance) in found {
        tracing::info!("spawn {} '{}' at distance {:.2}", spawn.id, spawn.name, distance);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let console_level = map_log_level(cli.log_level.unwrap_or(2));
    initialize_logging(cli.log_dir.as_deref(), console_level);

    match cli.command {
        Command::Inspect(args) => run_inspect(args),
        Command::Tree(args) => run_tree(args),
        Command::Los(args) => run_los(args),
        Command::Near(args) => run_near(args),
    }
}
