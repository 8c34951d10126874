use std::{path::PathBuf, time::Instant};

use clap::Parser;
use maze::{util, Maze, SemanticColors, Strategy};

/// Solve a maze drawn in an indexed-color image: white paths, a green start and a blue end.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Maze image (GIF, PNG or BMP)
    maze: PathBuf,

    /// Algorithm to run over the maze
    #[arg(short, long, value_enum, default_value_t = Strategy::Solve)]
    strategy: Strategy,

    /// Where to write the result. Defaults to <maze>-solved.<ext>
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file overriding the maze colors, e.g. {"red": "FF8800FF"}
    #[arg(long)]
    colors: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value_t = log::LevelFilter::Warn)]
    log_level: log::LevelFilter,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .init();

    let colors = match &cli.colors {
        Some(path) => SemanticColors::from_json_file(path)?,
        None => SemanticColors::default(),
    };

    let mut maze = match util::load_image(&cli.maze).and_then(|img| Maze::with_colors(img, &colors))
    {
        Ok(maze) => maze,
        Err(err) => {
            println!("Could not load maze: {}", err);
            return Ok(());
        }
    };

    let t = Instant::now();
    if !maze.run(cli.strategy) {
        println!("Maze has no solution!");
        return Ok(());
    }
    let dur = t.elapsed();

    let output = cli.output.unwrap_or_else(|| util::solved_path(&cli.maze));
    match util::save_image(&maze.into_image(), &output) {
        Ok(()) => println!("Solved maze in {} seconds", dur.as_secs_f64()),
        Err(err) => println!("{}", err),
    }

    Ok(())
}
