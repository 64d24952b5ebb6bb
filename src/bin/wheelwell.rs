use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use wheel_well::tools::{edge_stats, load_edge_luma, render_overlay};
use wheel_well::{
    DetectError, DetectionOptions, EdgeMap, detect_horizontal_lines, detect_semi_circles,
    detect_with_options,
};

#[derive(Parser)]
#[command(name = "wheelwell", version, about = "Wheel-well detection tools")]
struct Cli {
    /// JSON file with detection options (missing fields use defaults)
    #[arg(long, global = true)]
    options: Option<PathBuf>,
    /// Start from WW_* environment overrides instead of plain defaults
    #[arg(long, global = true)]
    from_env: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline on an edge-map image and print the result as JSON
    Detect {
        #[arg(long)]
        image: PathBuf,
        /// Write a PNG with lines and wheel wells drawn over the edges
        #[arg(long)]
        overlay: Option<PathBuf>,
    },
    /// Print only the horizontal lines
    Lines {
        #[arg(long)]
        image: PathBuf,
    },
    /// Print only the semicircle candidates
    Arcs {
        #[arg(long)]
        image: PathBuf,
    },
    /// Print edge statistics for an image
    Stats {
        #[arg(long)]
        image: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let options = match load_options(cli.options.as_deref(), cli.from_env) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Invalid options: {}", err);
            std::process::exit(2);
        }
    };

    let outcome = match cli.command {
        Command::Detect { image, overlay } => detect_cmd(&image, overlay.as_deref(), &options),
        Command::Lines { image } => with_edges(&image, |edges| {
            print_json(&detect_horizontal_lines(edges, &options))
        }),
        Command::Arcs { image } => with_edges(&image, |edges| {
            print_json(&detect_semi_circles(edges, &options))
        }),
        Command::Stats { image } => stats_cmd(&image, &options),
    };

    if let Err(err) = outcome {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn load_options(path: Option<&Path>, from_env: bool) -> Result<DetectionOptions, String> {
    let options = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            serde_json::from_str(&text).map_err(|e| e.to_string())?
        }
        None if from_env => DetectionOptions::from_env(),
        None => DetectionOptions::default(),
    };
    options.validate().map_err(|e| e.to_string())?;
    Ok(options)
}

fn with_edges<F>(image: &Path, run: F) -> Result<(), DetectError>
where
    F: FnOnce(&EdgeMap<'_>) -> Result<(), DetectError>,
{
    let (luma, width, height) = load_edge_luma(image)?;
    let edges = EdgeMap::from_luma(&luma, width, height)?;
    run(&edges)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), DetectError> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("Failed to serialize output: {}", err),
    }
    Ok(())
}

fn detect_cmd(
    image: &Path,
    overlay: Option<&Path>,
    options: &DetectionOptions,
) -> Result<(), DetectError> {
    with_edges(image, |edges| {
        let start = Instant::now();
        let result = detect_with_options(edges, options)?;
        let elapsed = start.elapsed();

        eprintln!(
            "Image: {} ({}x{}) in {:.2} ms: {} wheel wells, confidence {:.3} ({})",
            image.display(),
            edges.width(),
            edges.height(),
            elapsed.as_secs_f64() * 1000.0,
            result.wheel_wells.len(),
            result.confidence,
            result.confidence_level()
        );

        if let Some(path) = overlay {
            render_overlay(edges, options.edge_threshold, &result).save(path)?;
            eprintln!("Overlay written to {}", path.display());
        }
        print_json(&result)
    })
}

fn stats_cmd(image: &Path, options: &DetectionOptions) -> Result<(), DetectError> {
    with_edges(image, |edges| {
        let stats = edge_stats(edges, options.edge_threshold);
        println!(
            "Image: {} ({}x{}, {:?})",
            image.display(),
            edges.width(),
            edges.height(),
            stats.layout
        );
        println!(
            "Edges: edge_pixels={} total={} edge_ratio={:.2}%",
            stats.edge_pixels,
            stats.total_pixels,
            stats.edge_ratio * 100.0
        );
        Ok(())
    })
}
