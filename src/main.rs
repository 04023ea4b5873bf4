use std::{fs::File, io::stdout, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, enable_raw_mode},
};
use log::{LevelFilter, error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, WriteLogger};

use gazeflip::app::{App, Tuning, run_app};
use gazeflip::event_source::KeyboardEventSource;
use gazeflip::haptics::{HapticSink, NullHaptics, TerminalHaptics};
use gazeflip::navigator::DocumentSession;
use gazeflip::panic_handler::{initialize_panic_handler, restore_terminal};
use gazeflip::pose_source::{PoseSource, ReplayPoseSource, SweepPoseSource, UdpPoseSource};
use gazeflip::settings;
use gazeflip::theme::{self, ThemeId};

/// Hands-free page turning: head yaw in, page turns out.
#[derive(Parser, Debug)]
#[command(name = "gazeflip", version, about)]
struct Cli {
    /// UDP address to receive opentrack-style pose datagrams on
    #[arg(long, value_name = "ADDR", conflicts_with_all = ["replay", "sweep"])]
    listen: Option<String>,

    /// Replay a JSONL recording of orientation samples instead of listening
    #[arg(long, value_name = "FILE", conflicts_with = "sweep")]
    replay: Option<PathBuf>,

    /// Generate a synthetic side-to-side head sweep (demo mode)
    #[arg(long)]
    sweep: bool,

    /// Page count of the simulated document; 0 runs without a document
    #[arg(long, default_value_t = 12)]
    pages: usize,

    /// Document title shown in the HUD
    #[arg(long, default_value = "manual.pdf")]
    title: String,

    /// Log file path
    #[arg(long, value_name = "FILE", default_value = "gazeflip.log")]
    log: PathBuf,

    /// Override the calibration bias for this session (degrees)
    #[arg(long, value_name = "DEG")]
    bias: Option<f64>,

    /// Override the sensitivity gain for this session (pixels per degree)
    #[arg(long, value_name = "PX_PER_DEG")]
    gain: Option<f64>,

    /// Override the logical viewport width for this session (pixels)
    #[arg(long, value_name = "PX")]
    width: Option<f64>,

    /// Silence the terminal bell entirely
    #[arg(long)]
    no_bell: bool,
}

fn build_source(cli: &Cli) -> Result<Box<dyn PoseSource>> {
    if let Some(path) = &cli.replay {
        let source = ReplayPoseSource::open(path)
            .with_context(|| format!("cannot open replay file {}", path.display()))?;
        return Ok(Box::new(source));
    }
    if cli.sweep {
        return Ok(Box::new(SweepPoseSource::default()));
    }
    let addr = cli
        .listen
        .clone()
        .unwrap_or_else(settings::get_listen_addr);
    let source =
        UdpPoseSource::bind(&addr).with_context(|| format!("cannot bind pose socket {addr}"))?;
    Ok(Box::new(source))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create(&cli.log)
            .with_context(|| format!("cannot create log file {}", cli.log.display()))?,
    )?;

    info!("Starting gazeflip");

    settings::load_settings();
    theme::set_theme(ThemeId::from_name(&settings::get_theme_name()));

    let mut tuning = Tuning::from_settings();
    if let Some(bias) = cli.bias {
        tuning.bias_degrees = bias;
    }
    if let Some(gain) = cli.gain {
        tuning.gain = gain;
    }
    if let Some(width) = cli.width {
        tuning.viewport_width = width;
    }

    let source = build_source(&cli)?;
    let session = if cli.pages == 0 {
        DocumentSession::empty()
    } else {
        DocumentSession::open(cli.title.clone(), cli.pages)
    };
    let haptics: Box<dyn HapticSink> = if cli.no_bell {
        Box::new(NullHaptics)
    } else {
        Box::new(TerminalHaptics::stdout(settings::is_haptic_bell_enabled()))
    };

    initialize_panic_handler();

    // Terminal initialization
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, session, haptics, &tuning);
    let mut events = KeyboardEventSource;
    let res = run_app(&mut terminal, &mut app, &mut events);

    restore_terminal();
    let _ = terminal.show_cursor();

    if let Err(err) = res {
        error!("Application error: {err:?}");
        println!("{err:?}");
    }

    info!("Shutting down gazeflip");
    Ok(())
}
