//! Resize subject demo entry point.
//!
//! Runs a scripted simulation of a user dragging a window edge: bursts of
//! raw `resize` (and occasional `orientationchange`) signals arrive faster
//! than the debounce delay, and only one event per burst reaches observers.
//!
//! Everything runs on a [`ManualHost`] with a virtual clock, so the output
//! is deterministic for a given `--seed`.
//!
//! # Main Loop
//!
//! 1. Build the subject from the config file (if any) and CLI overrides
//! 2. Register a printing observer and bridge the subject into an ECS world
//! 3. For each burst: resize + signal repeatedly, with gaps shorter than the delay
//! 4. Let the delay elapse, run the bridge schedule, report the viewport
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --bursts 4 --seed 7 --json
//! ```

use std::path::PathBuf;
use std::rc::Rc;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{info, warn};

use resizesubject::events::resize::ResizeEvent;
use resizesubject::host::SignalKind;
use resizesubject::host::manual::ManualHost;
use resizesubject::resources::resizebridge::setup_resize_bridge;
use resizesubject::resources::subjectconfig::SubjectConfig;
use resizesubject::resources::viewportsize::ViewportSize;
use resizesubject::subject::ResizeSubject;
use resizesubject::systems::resize::{
    apply_viewport_size, poll_resize_messages, update_resize_messages,
};

/// Virtual frame length used between bridge schedule runs.
const FRAME_MS: u64 = 16;
/// Render resolution the letterbox report is computed for.
const RENDER_SIZE: (u32, u32) = (640, 360);

/// Debounced viewport resize notifier demo
#[derive(Parser)]
#[command(version, about = "Simulates bursts of viewport resizes and prints debounced events")]
struct Cli {
    /// Debounce delay in milliseconds (overrides the config file).
    #[arg(long)]
    delay: Option<u32>,

    /// INI file with a [subject] section.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Initial viewport width.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial viewport height.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Number of resize bursts to simulate.
    #[arg(long, default_value_t = 3)]
    bursts: u32,

    /// Raw signals per burst.
    #[arg(long, default_value_t = 8)]
    burst_len: u32,

    /// Seed for the simulated sizes and gaps.
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a viewport; only a manual dispatch is shown.
    #[arg(long)]
    headless: bool,

    /// Print events as JSON lines.
    #[arg(long)]
    json: bool,
}

fn print_event(label: &str, event: ResizeEvent, json: bool) {
    if json {
        match serde_json::to_string(&event) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Failed to encode event: {}", e),
        }
    } else {
        println!("[{}] {}x{}", label, event.width, event.height);
    }
}

fn load_config(cli: &Cli) -> SubjectConfig {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = SubjectConfig::with_path(path);
            if let Err(e) = config.load_from_file() {
                warn!("Config file not found or invalid, using defaults: {}", e);
            }
            config
        }
        None => SubjectConfig::new(),
    };
    if let Some(delay) = cli.delay {
        config = config.with_delay(delay);
    }
    config
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli);
    let delay = u64::from(config.delay_ms);

    let host = Rc::new(if cli.headless {
        ManualHost::headless()
    } else {
        ManualHost::new(cli.width, cli.height)
    });
    let mut rng = match cli.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let mut subject = ResizeSubject::with_config(host.clone(), &config);
    let json = cli.json;
    subject
        .add_observer("printer", move |e| print_event("observer", e, json))
        .subscribe();

    let mut world = World::new();
    let bridge_token = setup_resize_bridge(&mut world, &mut subject);
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            poll_resize_messages,
            update_resize_messages,
            apply_viewport_size,
        )
            .chain(),
    );
    schedule.run(&mut world);

    info!(
        "Subject ready: delay={}ms subscribed={} observers={}",
        subject.delay_ms(),
        subject.is_subscribed(),
        subject.observer_count()
    );

    if cli.headless {
        subject.dispatch();
    } else {
        let (mut w, mut h) = (cli.width, cli.height);
        for burst in 0..cli.bursts {
            info!("Burst {}: {} raw signals", burst + 1, cli.burst_len);
            for _ in 0..cli.burst_len {
                let kind = if rng.u8(0..8) == 0 {
                    std::mem::swap(&mut w, &mut h);
                    SignalKind::OrientationChange
                } else {
                    w = rng.u32(320..=3840);
                    h = rng.u32(240..=2160);
                    SignalKind::Resize
                };
                host.set_size(w, h);
                host.emit(kind);
                host.advance(rng.u64(0..delay.max(1)));
            }
            // Quiet period long enough for the debounce timer to expire
            let mut waited = 0;
            while waited <= delay {
                host.advance(FRAME_MS);
                waited += FRAME_MS;
                schedule.run(&mut world);
            }
            let viewport = *world.resource::<ViewportSize>();
            let lb = viewport.letterbox(RENDER_SIZE.0, RENDER_SIZE.1);
            info!(
                "Viewport {}x{} at t={}ms; {}x{} render drawn at ({:.0},{:.0}) {:.0}x{:.0}",
                viewport.w,
                viewport.h,
                host.now_ms(),
                RENDER_SIZE.0,
                RENDER_SIZE.1,
                lb.x,
                lb.y,
                lb.width,
                lb.height
            );
        }
    }

    subject.delete_observer(bridge_token).unsubscribe();
    if let Some(last) = subject.last_event() {
        print_event("last", last, cli.json);
    }
}
