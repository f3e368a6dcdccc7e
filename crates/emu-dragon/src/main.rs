//! Headless Dragon 32/64 runner.
//!
//! Runs a BASIC ROM (and optional cartridge) for a number of frames, then
//! writes any requested screenshot, audio dump or snapshot.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use emu_dragon::{
    Cartridge, Dragon, DragonConfig, DragonModel, FrameScheduler, NAME, Result, VERSION,
    VideoStandard, capture,
};
use log::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Model {
    #[value(name = "32")]
    Dragon32,
    #[value(name = "64")]
    Dragon64,
}

/// Dragon 32/64 emulator.
#[derive(Parser, Debug)]
#[command(name = NAME, version = VERSION, about, long_about = None)]
struct Args {
    /// BASIC ROM image (16K for the Dragon 32, 32K for the Dragon 64)
    #[arg(long)]
    rom: PathBuf,

    /// Cartridge ROM image
    #[arg(long)]
    cart: Option<PathBuf>,

    /// Drive the cartridge CART line so BASIC starts it
    #[arg(long, requires = "cart")]
    autostart: bool,

    /// Machine model
    #[arg(long, value_enum, default_value = "32")]
    model: Model,

    /// Use NTSC timing instead of PAL
    #[arg(long)]
    ntsc: bool,

    /// Number of frames to run
    #[arg(long, default_value_t = 250)]
    frames: u64,

    /// Text to type once BASIC is up (use \n for Enter)
    #[arg(long = "type")]
    type_text: Option<String>,

    /// Frame at which typing starts
    #[arg(long, default_value_t = 100)]
    type_at: u64,

    /// Save a PNG of the last frame
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Save a WAV of all audio
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Restore a snapshot before running
    #[arg(long)]
    load_snapshot: Option<PathBuf>,

    /// Write a snapshot after running
    #[arg(long)]
    save_snapshot: Option<PathBuf>,
}

fn make_machine(args: &Args) -> Result<Dragon> {
    let model = match args.model {
        Model::Dragon32 => DragonModel::Dragon32,
        Model::Dragon64 => DragonModel::Dragon64,
    };
    let mut config = DragonConfig::new(model, fs::read(&args.rom)?);
    if args.ntsc {
        config.video_standard = VideoStandard::Ntsc;
    }
    if let Some(path) = &args.cart {
        config.cartridge = Some(Cartridge::new(fs::read(path)?, args.autostart)?);
    }
    Dragon::new(config)
}

fn run(args: &Args) -> Result<()> {
    let mut scheduler = FrameScheduler::new(make_machine(args)?);

    if let Some(path) = &args.load_snapshot {
        scheduler.load_snapshot(&fs::read(path)?)?;
        info!("restored {}", path.display());
    }
    if let Some(text) = &args.type_text {
        let text = text.replace("\\n", "\n");
        scheduler
            .machine_mut()
            .input_queue()
            .enqueue_text(&text, args.type_at);
    }

    scheduler.start();
    let mut audio = Vec::new();
    for _ in 0..args.frames {
        if let Some(out) = scheduler.tick() {
            audio.extend_from_slice(&out.samples);
        }
    }

    if let Some(path) = &args.screenshot {
        capture::save_screenshot(scheduler.frame(), path)?;
        eprintln!("Screenshot saved to {}", path.display());
    }
    if let Some(path) = &args.audio {
        capture::save_audio(&audio, scheduler.machine().sample_rate(), path)?;
        eprintln!("Audio saved to {}", path.display());
    }
    if let Some(path) = &args.save_snapshot {
        fs::write(path, scheduler.save_snapshot())?;
        eprintln!("Snapshot saved to {}", path.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("emu-dragon: {e}");
        process::exit(1);
    }
}
