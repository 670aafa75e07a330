//! Command line entry point.

use clap::Parser;
use ladchat_app::{App, AppError, AppResult, EditScript};
use ladchat_core::{CapturedMedia, EditorConfig, MediaRef, MediaType, UploadPlan};
use std::path::PathBuf;

/// Apply a recorded edit script to a captured photo or video.
#[derive(Parser, Debug)]
#[command(name = "ladchat-edit")]
#[command(about = "LadChat media editor - replay edits and export the result")]
struct Args {
    /// Captured media file (path or file:// URI)
    media: String,

    /// Media type
    #[arg(short = 't', long = "type", default_value = "photo")]
    media_type: MediaType,

    /// JSON edit script
    #[arg(short, long)]
    script: PathBuf,

    /// Editor config file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Screen size the edits were made on, e.g. 390x844
    #[arg(long, value_parser = parse_frame)]
    frame: Option<(f64, f64)>,

    /// Directory for exported images
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Font used to bake captions
    #[arg(long)]
    font: Option<PathBuf>,

    /// Also validate the result for upload and print the upload fields
    #[arg(long)]
    plan_upload: bool,
}

fn parse_frame(value: &str) -> Result<(f64, f64), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Expected WIDTHxHEIGHT, got {}", value))?;
    let w: f64 = w.trim().parse().map_err(|_| format!("Invalid width: {}", w))?;
    let h: f64 = h.trim().parse().map_err(|_| format!("Invalid height: {}", h))?;
    if w <= 0.0 || h <= 0.0 {
        return Err("Frame size must be positive".to_string());
    }
    Ok((w, h))
}

fn load_config(args: &Args) -> AppResult<EditorConfig> {
    let mut config = match &args.config {
        Some(path) => EditorConfig::load_or_default(path),
        None => EditorConfig::load_or_default(&EditorConfig::default_path()?),
    };
    if let Some((width, height)) = args.frame {
        config.frame_width = width;
        config.frame_height = height;
    }
    if let Some(dir) = &args.out_dir {
        config.output_dir = Some(dir.clone());
    }
    if let Some(font) = &args.font {
        config.caption_font = Some(font.clone());
    }
    Ok(config)
}

fn run(args: Args) -> AppResult<()> {
    let config = load_config(&args)?;
    let script = EditScript::load(&args.script)?;
    let media = CapturedMedia {
        reference: MediaRef::new(args.media.clone()),
        media_type: args.media_type,
    };

    let mut app = App::new(media, config);
    app.run_script(&script)?;
    let edited = app.save()?;
    println!("{}", serde_json::to_string_pretty(&edited)?);

    if args.plan_upload {
        let plan = UploadPlan::from_edit(&edited).map_err(AppError::from)?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Starting LadChat editor");

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
