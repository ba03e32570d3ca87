//! Live stereogram of a few orbiting spheres.
//!
//! ```bash
//! cargo run --release -- --width 1280 --height 800
//! ```
//!
//! Keys: `R` reverse viewing, `H` hidden-surface removal, `Up`/`Down`
//! dot density, `Space` pause, `Esc` quit.

use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use log::info;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use sirds_rs::{
    SirdsEngine,
    cli::StereoArgs,
    scene::{DepthScene, Eye},
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, default_value_t = 1024)]
    width: usize,

    #[arg(long, default_value_t = 768)]
    height: usize,

    /// Number of orbiting spheres.
    #[arg(long, default_value_t = 5)]
    spheres: usize,

    #[command(flatten)]
    stereo: StereoArgs,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = cli.stereo.config();
    let mut remove_hidden = config.remove_hidden;
    let mut engine = SirdsEngine::new(config);

    let mut win = Window::new(
        "SIRDS",
        cli.width,
        cli.height,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )
    .context("opening window")?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    let start = Instant::now();
    let mut paused_at: Option<f32> = None;

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* --------------- knobs ------------------------------------------ */
        if win.is_key_pressed(Key::R, KeyRepeat::No) {
            let reverse = !engine.config().reverse;
            engine.set_reverse(reverse);
            info!("reverse viewing: {reverse}");
        }
        if win.is_key_pressed(Key::H, KeyRepeat::No) {
            remove_hidden = !remove_hidden;
            info!("hidden-surface removal: {remove_hidden}");
        }
        if win.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            engine.set_density(engine.config().style.density.saturating_add(8));
        }
        if win.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            engine.set_density(engine.config().style.density.saturating_sub(8));
        }
        if win.is_key_pressed(Key::Space, KeyRepeat::No) {
            paused_at = match paused_at {
                Some(_) => None,
                None => Some(start.elapsed().as_secs_f32()),
            };
        }

        /* --------------- geometry follows the window -------------------- */
        let (w, h) = win.get_size();
        if w == 0 || h == 0 {
            win.update();
            continue;
        }
        let geom = *engine
            .init_geometry(&cli.stereo.viewing(h), w, h)
            .context("viewing geometry")?;

        /* --------------- host side: one depth buffer per eye ------------- */
        let t = paused_at.unwrap_or_else(|| start.elapsed().as_secs_f32());
        let scene = DepthScene::orbit(cli.spheres, t * 0.6, &geom);
        let encoding = engine.config().encoding;
        let (left, right) = rayon::join(
            || scene.depth_buffer(Eye::Left, &geom, encoding),
            || scene.depth_buffer(Eye::Right, &geom, encoding),
        );

        /* --------------- stereogram -------------------------------------- */
        let t0 = Instant::now();
        engine.render(&left, &right, remove_hidden)?;
        acc_time += t0.elapsed();
        acc_frames += 1;

        engine
            .present(|fb, w, h| win.update_with_buffer(fb, w, h))
            .context("presenting frame")?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!("avg stereogram pass: {avg_ms:.2} ms over {acc_frames} frames");
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
