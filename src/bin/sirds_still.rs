//! Render one stereogram frame of the sphere scene to a PNG file.
//!
//! ```bash
//! cargo run --release --bin sirds_still -- --out sirds.png --time 1.5
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use image::{Rgba as Pixel, RgbaImage};
use log::info;

use sirds_rs::{
    Rgba, SirdsEngine,
    cli::StereoArgs,
    scene::{DepthScene, Eye},
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Output image (format picked from the extension).
    #[arg(long, value_name = "FILE", default_value = "sirds.png")]
    out: PathBuf,

    #[arg(long, default_value_t = 1024)]
    width: usize,

    #[arg(long, default_value_t = 768)]
    height: usize,

    /// Number of orbiting spheres.
    #[arg(long, default_value_t = 5)]
    spheres: usize,

    /// Orbit angle in radians.
    #[arg(long, default_value_t = 0.0)]
    time: f32,

    #[command(flatten)]
    stereo: StereoArgs,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = cli.stereo.config();
    let mut engine = SirdsEngine::new(config);
    let geom = *engine
        .init_geometry(&cli.stereo.viewing(cli.height), cli.width, cli.height)
        .context("viewing geometry")?;

    let scene = DepthScene::orbit(cli.spheres, cli.time, &geom);
    let left = scene.depth_buffer(Eye::Left, &geom, config.encoding);
    let right = scene.depth_buffer(Eye::Right, &geom, config.encoding);

    let (_, stats) = engine.render_with_stats(&left, &right, config.remove_hidden)?;
    info!("{stats:?}");

    let img = engine.present(|fb, w, h| to_image(fb, w, h));
    img.save(&cli.out)
        .with_context(|| format!("writing {}", cli.out.display()))?;
    println!("wrote {}", cli.out.display());
    Ok(())
}

/// 0xAARRGGBB frame-buffer → RGBA8 image.
fn to_image(fb: &[Rgba], w: usize, h: usize) -> RgbaImage {
    RgbaImage::from_fn(w as u32, h as u32, |x, y| {
        let [a, r, g, b] = fb[y as usize * w + x as usize].to_be_bytes();
        Pixel([r, g, b, a])
    })
}
