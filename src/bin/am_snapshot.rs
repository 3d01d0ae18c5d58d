//! Render one automap frame to a PPM file, no window needed.
//!
//! ```bash
//! cargo run --bin am_snapshot -- doom.wad --map 0 --out e1m1.ppm
//! ```
//!
//! Handy for eyeballing scheme tables and for smoke-testing the whole
//! pipeline in environments without a display.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use yamap_rs::{
    am::{AmConfig, AmEvent, AmKey, Automap, ColorScheme, RevealState, Scene},
    fixed::FRACUNIT,
    sim::TicRunner,
    video::{Rect, Surface},
    wad::{Wad, load_level, load_palette},
};

#[derive(Parser, Debug)]
#[command(about = "Headless automap frame dump")]
struct Args {
    /// Path to an IWAD or PWAD file.
    wad: PathBuf,

    /// Map index (0 = first map in the WAD).
    #[arg(long, default_value_t = 0)]
    map: usize,

    /// Output PPM path.
    #[arg(long, default_value = "automap.ppm")]
    out: PathBuf,

    /// Frame width / height in pixels.
    #[arg(long, default_value_t = 640)]
    width: usize,
    #[arg(long, default_value_t = 400)]
    height: usize,

    /// Show the grid.
    #[arg(long)]
    grid: bool,

    /// Zoom all the way out so the whole map is framed.
    #[arg(long)]
    full: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let wad = Wad::from_file(&args.wad)?;
    let markers = wad.level_indices();
    let marker = *markers
        .get(args.map)
        .ok_or_else(|| anyhow::anyhow!("map index {} out of range ({} maps)", args.map, markers.len()))?;
    let level = load_level(&wad, marker)?;
    let palette = load_palette(&wad)?;

    let sim = TicRunner::new(&level);
    let things = sim.thing_snapshots();

    let mut am = Automap::new(AmConfig {
        frame: Rect::new(0, 0, args.width as i32, args.height as i32),
        scheme: ColorScheme::Doom,
        grid: args.grid,
        ..AmConfig::default()
    });
    am.set_palette(&palette);
    am.activate();

    // everything visible without playing: walls + entities revealed
    let mut reveal = RevealState::default();
    reveal.cheat.advance();
    reveal.cheat.advance();

    let scene = Scene {
        lerp: FRACUNIT,
        player: sim.player_snapshot(),
        others: &[],
        things: &things,
        reveal,
    };

    let mut surf = Surface::new(args.width, args.height);
    am.render(&mut surf, &level, &scene);
    if args.full {
        am.handle_input(AmEvent::Press(AmKey::MaxZoomOut), &mut ());
        am.render(&mut surf, &level, &scene);
    }

    write_ppm(&args.out, &surf, &palette)?;
    println!("wrote {} ({}x{})", args.out.display(), args.width, args.height);
    Ok(())
}

fn write_ppm(
    path: &PathBuf,
    surf: &Surface,
    palette: &yamap_rs::world::Palette,
) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "P6\n{} {}\n255", surf.width(), surf.height())?;
    for &idx in surf.pixels() {
        let (r, g, b) = palette.rgb(idx as usize);
        out.write_all(&[r, g, b])?;
    }
    Ok(())
}
