mod viewer;

use clap::{Parser, Subcommand};
use forcegraph_core::{format_parse_error, parse_scene, run_parsed, scene_config, DetectorValue};
use log::{info, LevelFilter};
use std::fs;
use std::path::PathBuf;
use viewer::ViewerApp;

#[derive(Parser)]
#[command(name = "forcegraph")]
#[command(about = "Force-directed graph simulation", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scene headless and print detectors and final positions
    Run {
        /// Path to the .graph scene file
        file: PathBuf,
        /// Override the scene's step count
        #[arg(long)]
        steps: Option<usize>,
        /// Override the scene's random seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Animate a scene in a window, reloading when the file changes
    View {
        /// Path to the .graph scene file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Commands::Run { file, steps, seed } => run_file(&file, steps, seed),
        Commands::View { file } => view_file(file),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run_file(
    file: &PathBuf,
    steps: Option<usize>,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let scene = parse_scene(&source).map_err(|e| format_parse_error(&e, &source))?;

    let mut config = scene_config(&scene);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let steps = steps.unwrap_or(scene.simulate.steps);
    info!("running {} for {} steps", file.display(), steps);

    let result = run_parsed(&scene, config, steps)?;

    for detector in &result.detectors {
        match detector.value {
            DetectorValue::Scalar(v) => println!("{} = {}", detector.name, v),
            DetectorValue::Point(p) => println!("{} = ({}, {})", detector.name, p.x, p.y),
        }
    }
    for (id, pos) in &result.positions {
        println!("node {} = ({}, {})", id, pos.x, pos.y);
    }

    Ok(())
}

fn view_file(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 900.0]),
        ..Default::default()
    };
    let title = format!("forcegraph - {}", file.display());
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(file, cc)))),
    )?;
    Ok(())
}
