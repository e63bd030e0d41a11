//! Command-line front end: generate a dungeon and print it as ASCII.

use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use log::LevelFilter;
use strum::VariantNames;

use dungen_core::map::{GridPoint, TileType};
use dungen_core::{ConnectionKind, MapGenerator, MapRng, MapSettings, MinMax, PlacementKind};

/// Procedural room-and-corridor dungeon generator
#[derive(Parser, Debug)]
#[command(name = "dungen")]
#[command(author, version, about = "Generate a dungeon map and print it", long_about = None)]
struct Args {
    /// Map width in tiles
    #[arg(long, default_value_t = 60)]
    width: i32,

    /// Map depth in tiles
    #[arg(long, default_value_t = 60)]
    depth: i32,

    /// Number of rooms to place
    #[arg(short = 'n', long, default_value_t = 8)]
    rooms: usize,

    /// Minimum room size per axis
    #[arg(long, default_value_t = 4)]
    room_min: i32,

    /// Maximum room size per axis
    #[arg(long, default_value_t = 9)]
    room_max: i32,

    /// Placement strategy (random, gridbased, clustered)
    #[arg(short, long, default_value = "random")]
    placement: String,

    /// Connection strategy (corridor, directdoor)
    #[arg(short, long, default_value = "corridor")]
    connection: String,

    /// Minimum corridor (or door) width
    #[arg(long, default_value_t = 1)]
    corridor_min: i32,

    /// Maximum corridor (or door) width
    #[arg(long, default_value_t = 2)]
    corridor_max: i32,

    /// Allow rooms to connect to several neighbors (DirectDoor mode)
    #[arg(long)]
    multi: bool,

    /// Connection limit per room when --multi is set
    #[arg(long, default_value_t = 3)]
    max_connections: usize,

    /// RNG seed; a random seed is drawn when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let _ = simplelog::TermLogger::init(
        if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );

    let placement = match PlacementKind::from_str(&args.placement) {
        Ok(kind) => kind,
        Err(_) => {
            eprintln!(
                "unknown placement strategy '{}', expected one of: {}",
                args.placement,
                PlacementKind::VARIANTS.join(", ")
            );
            return ExitCode::from(2);
        }
    };
    let connection = match ConnectionKind::from_str(&args.connection) {
        Ok(kind) => kind,
        Err(_) => {
            eprintln!(
                "unknown connection strategy '{}', expected one of: {}",
                args.connection,
                ConnectionKind::VARIANTS.join(", ")
            );
            return ExitCode::from(2);
        }
    };

    let settings = MapSettings {
        map_size: GridPoint::new(args.width, args.depth),
        room_count: args.rooms,
        room_size: MinMax::new(args.room_min, args.room_max),
        placement,
        connection,
        corridor_width: MinMax::new(args.corridor_min, args.corridor_max),
        multi_connections: args.multi,
        max_connections_per_room: args.max_connections,
        room_styles: Vec::new(),
    };

    let generator = match MapGenerator::new(settings) {
        Ok(generator) => generator,
        Err(error) => {
            eprintln!("invalid settings: {error}");
            return ExitCode::from(2);
        }
    };

    let mut rng = match args.seed {
        Some(seed) => MapRng::new(seed),
        None => MapRng::from_entropy(),
    };
    let map = generator.generate(&mut rng);

    for row in map.grid.render_ascii() {
        println!("{row}");
    }
    println!();
    println!(
        "rooms: {}  corridors: {}  doors: {}  seed: {}",
        map.rooms.len(),
        map.corridors.len(),
        map.grid.count(TileType::Door),
        map.seed
    );

    ExitCode::SUCCESS
}
