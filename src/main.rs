//! Interactive automap viewer.
//!
//! ```bash
//! cargo run --release -- <doom.wad> [--map N] [--scheme boom] [--overlay]
//! ```
//!
//! Tab toggles the map, arrows pan, +/- zoom, 0/9 snap to the zoom
//! extremes, F/G/O/R toggle follow/grid/overlay/rotate, M marks a spot,
//! C removes the newest mark (Shift-C clears all), I cycles the reveal
//! cheat, P fakes the computer-area-map powerup. WASD flies the player.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use yamap_rs::{
    am::{AmConfig, AmEvent, AmKey, Automap, ColorScheme, MessageSink, RevealState, Scene},
    fixed::{FRACUNIT, Fixed},
    sim::{InputCmd, SIM_FPS, TicRunner},
    video::{Rect, Surface},
    wad::{Wad, load_level, load_palette},
};

const W: usize = 960;
const H: usize = 600;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemeArg {
    Doom,
    Boom,
    Jaguar,
    Raven,
    Strife,
    Unity,
}

impl From<SchemeArg> for ColorScheme {
    fn from(s: SchemeArg) -> Self {
        match s {
            SchemeArg::Doom => ColorScheme::Doom,
            SchemeArg::Boom => ColorScheme::Boom,
            SchemeArg::Jaguar => ColorScheme::Jaguar,
            SchemeArg::Raven => ColorScheme::Raven,
            SchemeArg::Strife => ColorScheme::Strife,
            SchemeArg::Unity => ColorScheme::Unity,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Yet Another Doom Automap")]
struct Args {
    /// Path to an IWAD or PWAD file.
    wad: PathBuf,

    /// Map index (0 = first map in the WAD).
    #[arg(long, default_value_t = 0)]
    map: usize,

    /// Automap color scheme.
    #[arg(long, value_enum, default_value_t = SchemeArg::Doom)]
    scheme: SchemeArg,

    /// Disable antialiased wall lines.
    #[arg(long)]
    no_aa: bool,

    /// Grid cell size in map units.
    #[arg(long, default_value_t = 128)]
    grid_size: i32,

    /// Start with the grid shown.
    #[arg(long)]
    grid: bool,

    /// Start in overlay mode.
    #[arg(long)]
    overlay: bool,

    /// Start in rotate mode.
    #[arg(long)]
    rotate: bool,

    /// Start with follow mode off.
    #[arg(long)]
    no_follow: bool,
}

/// Prints automap confirmations the way a HUD would show them.
struct Console;
impl MessageSink for Console {
    fn show(&mut self, msg: &str) {
        println!("[am] {msg}");
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let wad = Wad::from_file(&args.wad)?;
    let markers = wad.level_indices();
    let marker = *markers
        .get(args.map)
        .ok_or_else(|| anyhow::anyhow!("map index {} out of range ({} maps)", args.map, markers.len()))?;
    let mut level = load_level(&wad, marker)?;
    let palette = load_palette(&wad)?;
    println!("loaded {} ({} lines)", level.name, level.linedefs.len());

    let mut sim = TicRunner::new(&level);
    let things = sim.thing_snapshots();

    let mut am = Automap::new(AmConfig {
        frame: Rect::new(0, 0, W as i32, H as i32),
        scheme: args.scheme.into(),
        antialias: !args.no_aa,
        grid_units: args.grid_size,
        mark_color: None,
        crosshair_cross: true,
        follow: !args.no_follow,
        overlay: args.overlay,
        rotate: args.rotate,
        grid: args.grid,
    });
    am.set_palette(&palette);
    am.activate();

    let mut reveal = RevealState::default();
    let mut console = Console;

    let mut surf = Surface::new(W, H);
    let mut frame = vec![0u32; W * H];

    let mut win = Window::new("Yet Another Doom Automap", W, H, WindowOptions::default())?;
    win.set_target_fps(70);

    const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);
    let mut last_tic = Instant::now();

    const KEYMAP: [(Key, AmKey); 16] = [
        (Key::Tab, AmKey::Toggle),
        (Key::Right, AmKey::PanRight),
        (Key::Left, AmKey::PanLeft),
        (Key::Up, AmKey::PanUp),
        (Key::Down, AmKey::PanDown),
        (Key::Equal, AmKey::ZoomIn),
        (Key::Minus, AmKey::ZoomOut),
        (Key::Key0, AmKey::MaxZoomOut),
        (Key::Key9, AmKey::MaxZoomIn),
        (Key::F, AmKey::Follow),
        (Key::G, AmKey::Grid),
        (Key::O, AmKey::Overlay),
        (Key::R, AmKey::Rotate),
        (Key::M, AmKey::Mark),
        (Key::C, AmKey::ClearMarks),
        (Key::LeftShift, AmKey::Speed),
    ];

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* ------------- automap key events (edge-triggered) ------------ */
        for (key, am_key) in KEYMAP {
            if win.is_key_pressed(key, KeyRepeat::No) {
                am.handle_input(AmEvent::Press(am_key), &mut console);
            }
            if win.is_key_released(key) {
                am.handle_input(AmEvent::Release(am_key), &mut console);
            }
        }
        if win.is_key_pressed(Key::I, KeyRepeat::No) {
            reveal.cheat.advance();
            console.show("Reveal cheat cycled");
        }
        if win.is_key_pressed(Key::P, KeyRepeat::No) {
            reveal.computer_map = !reveal.computer_map;
            console.show("Computer map toggled");
        }

        /* ------------------- player movement ------------------------- */
        let mut cmd = InputCmd::default();
        if win.is_key_down(Key::W) {
            cmd.forward += 1;
        }
        if win.is_key_down(Key::S) {
            cmd.forward -= 1;
        }
        if win.is_key_down(Key::A) {
            cmd.turn += 1;
        }
        if win.is_key_down(Key::D) {
            cmd.turn -= 1;
        }
        if win.is_key_down(Key::Q) {
            cmd.strafe -= 1;
        }
        if win.is_key_down(Key::E) {
            cmd.strafe += 1;
        }
        cmd.run = win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift);

        /* ------------------ fixed-rate simulation -------------------- */
        while last_tic.elapsed() >= TIC {
            sim.tick(&mut level, cmd);
            am.tick();
            last_tic += TIC;
        }
        let lerp = ((last_tic.elapsed().as_secs_f64() / TIC.as_secs_f64())
            * FRACUNIT as f64) as Fixed;

        /* ------------------------ render ------------------------------ */
        // the "3D view" underneath: just the background the overlay shows
        surf.fill_rect(Rect::new(0, 0, W as i32, H as i32), 0);

        let scene = Scene {
            lerp: lerp.clamp(0, FRACUNIT),
            player: sim.player_snapshot(),
            others: &[],
            things: &things,
            reveal,
        };
        am.render(&mut surf, &level, &scene);

        surf.expand_to(&palette, &mut frame);
        win.update_with_buffer(&frame, W, H)?;
    }
    Ok(())
}
