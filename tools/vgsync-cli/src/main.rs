//! VGSync CLI: command-line access to the editing core.
//!
//! Usage:
//!   vgsync init <NAME> --clip <PATH:SECS>...   Create a project
//!   vgsync info <PATH>                         Show project information
//!   vgsync validate <PATH>                     Check source clips and cuts
//!   vgsync cut <PATH> --start S --end S        Add a cut
//!   vgsync undo <PATH>                         Remove the most recent cut
//!   vgsync map <PATH> --global S | --final S   Convert between timelines
//!   vgsync overlay <PATH> add|remove ...       Edit image overlays
//!   vgsync keyframes <PATH> --clip N <CSV>     Import ffprobe keyframes
//!   vgsync export <PATH>                       Write the export job
//!   vgsync simulate <PATH>                     Play through with auto-skip

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vgsync_common::config::AppConfig;
use vgsync_project_model::{Overlay, SourceClip};

use commands::overlay::OverlayEdit;

mod commands;

#[derive(Parser)]
#[command(
    name = "vgsync",
    about = "Cut and sync action-cam video with GPX tracks",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project from source clips
    Init {
        /// Project name
        name: String,

        /// Parent directory for the project
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Source clip as `path:duration_secs`, in playback order
        #[arg(long = "clip", required = true, value_parser = commands::init::parse_clip)]
        clips: Vec<SourceClip>,
    },

    /// Show project information
    Info {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Validate a project bundle
    Validate {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Cut a global time range out of the project
    Cut {
        /// Path to the project directory
        path: PathBuf,

        /// Range start (global seconds)
        #[arg(long)]
        start: f64,

        /// Range end (global seconds)
        #[arg(long)]
        end: f64,
    },

    /// Remove the most recent cut
    Undo {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Convert a position between the global and final timelines
    Map {
        /// Path to the project directory
        path: PathBuf,

        /// Position on the raw (global) timeline
        #[arg(long, conflicts_with = "final_s", required_unless_present = "final_s")]
        global: Option<f64>,

        /// Position on the cut (final) timeline
        #[arg(long = "final")]
        final_s: Option<f64>,
    },

    /// Add or remove an image overlay
    Overlay {
        /// Path to the project directory
        path: PathBuf,

        #[command(subcommand)]
        action: OverlayAction,
    },

    /// Import key frames for one clip from ffprobe CSV output
    Keyframes {
        /// Path to the project directory
        path: PathBuf,

        /// Clip number (1-based, playlist order)
        #[arg(long)]
        clip: usize,

        /// CSV file with `key_frame,pts_time,pict_type` rows
        csv: PathBuf,
    },

    /// Write the export job for the project's edit mode
    Export {
        /// Path to the project directory
        path: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Play the project on a simulated player and print skip events
    Simulate {
        /// Path to the project directory
        path: PathBuf,

        /// Playback speed (media seconds per wall-clock second)
        #[arg(long, default_value = "1.0")]
        rate: f64,

        /// Start position (global seconds); defaults to the first kept frame
        #[arg(long)]
        from: Option<f64>,

        /// Stop after this many wall-clock seconds
        #[arg(long)]
        max_secs: Option<f64>,
    },
}

#[derive(Subcommand)]
enum OverlayAction {
    /// Burn an image in over a final-timeline range
    Add {
        /// Range start (final seconds)
        #[arg(long)]
        start: f64,

        /// Range end (final seconds)
        #[arg(long)]
        end: f64,

        /// Image path
        #[arg(long)]
        image: String,

        /// Fade-in length (seconds)
        #[arg(long, default_value = "0")]
        fade_in: f64,

        /// Fade-out length (seconds)
        #[arg(long, default_value = "0")]
        fade_out: f64,

        /// Image scale factor
        #[arg(long, default_value = "1.0")]
        scale: f64,

        /// ffmpeg x position expression
        #[arg(long, default_value = "(W-w)/2")]
        x: String,

        /// ffmpeg y position expression
        #[arg(long, default_value = "(H-h)/2")]
        y: String,
    },

    /// Remove the overlay spanning a range
    Remove {
        #[arg(long)]
        start: f64,

        #[arg(long)]
        end: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    vgsync_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Init {
            name,
            output,
            clips,
        } => commands::init::run(name, output, clips),
        Commands::Info { path } => commands::info::run(path),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Cut { path, start, end } => commands::cut::run(path, start, end),
        Commands::Undo { path } => commands::undo::run(path),
        Commands::Map {
            path,
            global,
            final_s,
        } => commands::map::run(path, global, final_s),
        Commands::Overlay { path, action } => {
            let edit = match action {
                OverlayAction::Add {
                    start,
                    end,
                    image,
                    fade_in,
                    fade_out,
                    scale,
                    x,
                    y,
                } => OverlayEdit::Add(Overlay {
                    start,
                    end,
                    fade_in,
                    fade_out,
                    image,
                    scale,
                    x,
                    y,
                }),
                OverlayAction::Remove { start, end } => OverlayEdit::Remove { start, end },
            };
            commands::overlay::run(path, edit)
        }
        Commands::Keyframes { path, clip, csv } => commands::keyframes::run(path, clip, csv),
        Commands::Export { path, output } => commands::export::run(path, output),
        Commands::Simulate {
            path,
            rate,
            from,
            max_secs,
        } => commands::simulate::run(path, rate, from, max_secs, &config).await,
    }
}
