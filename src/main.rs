use std::path::PathBuf;

use clap::Parser;

use region_sculptor::basemap::{generate_base_map, BaseMapParams};
use region_sculptor::collab::LatitudeTerrain;
use region_sculptor::export::{write_json, write_png, GridSnapshot};
use region_sculptor::logging::{init_tracing, LogLevel, LoggingConfig};
use region_sculptor::{sculpt_world, seeded, Result, SculptConfig, WorldGrid, WorldSize};

#[derive(Parser, Debug)]
#[command(name = "region_sculptor")]
#[command(about = "Carve bogs, mountain dents and the Lost Isle into a world map and grow its rivers")]
struct Args {
    /// Width of the map in plots
    #[arg(short = 'W', long, default_value = "80")]
    width: usize,

    /// Height of the map in plots
    #[arg(short = 'H', long, default_value = "52")]
    height: usize,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Wrap around the east and west edges
    #[arg(long)]
    wrap_x: bool,

    /// Wrap around the north and south edges
    #[arg(long)]
    wrap_y: bool,

    /// World size class (duel, tiny, small, standard, large, huge);
    /// derived from the dimensions if not specified
    #[arg(long)]
    world_size: Option<WorldSize>,

    /// JSON configuration file; missing fields take defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the finished grid as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write a PNG preview of the finished grid
    #[arg(long)]
    png: Option<PathBuf>,

    /// Pixels per plot in the PNG preview
    #[arg(long, default_value = "6")]
    png_scale: u32,

    /// Log level (RUST_LOG overrides)
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&LoggingConfig::with_level(args.log_level));

    let config = match &args.config {
        Some(path) => SculptConfig::from_json_file(path)?,
        None => SculptConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = seeded(seed);
    tracing::info!("sculpting with seed {seed}, map size {}x{}", args.width, args.height);

    let mut grid = WorldGrid::try_new(args.width, args.height)?
        .with_wrap(args.wrap_x, args.wrap_y)
        .with_params(config.grid.clone());
    if let Some(size) = args.world_size {
        grid = grid.with_world_size(size);
    }

    generate_base_map(
        &mut grid,
        &mut rng,
        &LatitudeTerrain::default(),
        seed as u32,
        &BaseMapParams::default(),
    );
    let report = sculpt_world(&mut grid, &config, &mut rng);

    for record in &report.records {
        tracing::info!(
            "{:?} {} at ({},{})",
            record.kind,
            record.name,
            record.anchor.0,
            record.anchor.1
        );
    }

    if let Some(path) = &args.json {
        let snapshot = GridSnapshot::capture(&grid, Some(seed), &report.records, &report.rivers);
        write_json(&snapshot, path)?;
        tracing::info!("wrote {}", path.display());
    }
    if let Some(path) = &args.png {
        write_png(&grid, path, args.png_scale)?;
        tracing::info!("wrote {}", path.display());
    }
    Ok(())
}
