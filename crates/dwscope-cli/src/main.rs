//! dwscope command-line interface.
//!
//! Render camera-plane images of a spherical scatterer:
//! ```sh
//! dwscope render --config job.toml -z 5 -z 10
//! dwscope plan
//! dwscope compare -z 10
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dwscope")]
#[command(about = "Debye-Wolf camera-plane imaging of Mie scatterers")]
#[command(version)]
struct Cli {
    /// Only report warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render camera images for one or more scatterer heights.
    Render {
        /// Path to the job configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Height above the focal plane in µm; repeat for several heights
        /// (overrides the configuration file).
        #[arg(short = 'z', long = "height", allow_negative_numbers = true)]
        heights: Vec<f64>,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the pupil discretisation plan.
    Plan {
        /// Path to the job configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Compare the camera image with the focal-plane hologram.
    Compare {
        /// Path to the job configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Height above the focal plane in µm.
        #[arg(short = 'z', long = "height", default_value_t = 10.0, allow_negative_numbers = true)]
        height: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "debug" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Render {
            config,
            heights,
            output,
        } => {
            let job = config::load_config(config.as_deref())?;
            let heights = if heights.is_empty() {
                job.imaging.heights.clone()
            } else {
                heights
            };
            if heights.is_empty() {
                anyhow::bail!("No heights to render: pass -z or set [imaging] heights");
            }

            println!("dwscope Debye-Wolf renderer");
            println!("===========================");
            if let Some(path) = &config {
                println!("Configuration: {}", path.display());
            }

            let images = runner::run_render(&job, &heights)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));
            runner::write_render(&images, &out_dir, &job)?;

            println!("Rendered {} image(s).", images.len());
            Ok(())
        }
        Commands::Plan { config } => {
            let job = config::load_config(config.as_deref())?;
            let plan = runner::plan(&job)?;
            let (np, nq) = plan.padded_shape();
            println!("Pupil grid:      {} x {}", plan.p, plan.q);
            println!("Padding:         {} x {}", plan.pad_p, plan.pad_q);
            println!("Camera image:    {} x {}", np, nq);
            println!(
                "Effective pitch: {:.4} um/pixel (requested {})",
                plan.effective_pitch(job.optics.wavelength, job.optics.numerical_aperture),
                job.optics.pixel_pitch
            );
            Ok(())
        }
        Commands::Compare { config, height } => {
            let job = config::load_config(config.as_deref())?;
            let report = runner::run_compare(&job, height)?;
            println!("z = {} um", report.height_um);
            println!("Maximum difference: {:.6e}", report.max_difference);
            println!("Minimum difference: {:.6e}", report.min_difference);
            Ok(())
        }
    }
}
