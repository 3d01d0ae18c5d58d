//! The automap subsystem: a top-down line-map renderer with pan, zoom,
//! rotate, follow and overlay modes, cheat reveal, and numbered marks.
//!
//! The host owns the clock and the collaborators. Per tic it forwards
//! decoded input events through [`Automap::handle_input`] and calls
//! [`Automap::tick`]; per rendered frame it hands [`Automap::render`] a
//! surface, the level and a [`Scene`] (interpolation fraction, entity
//! snapshots, reveal state). Nothing in here blocks, allocates per frame,
//! or writes outside its destination rectangle.

mod clip;
mod color;
mod coords;
mod glyphs;
mod input;
mod marks;
mod raster;
mod viewport;

pub use color::{AmColors, CheatCycle, ColorScheme, RevealState, ShadeTable};
pub use coords::ViewWindow;
pub use input::{AmEvent, AmKey, MessageSink};
pub use marks::MarkStore;
pub use raster::NUM_SHADES;
pub use viewport::Viewport;

use smallvec::SmallVec;

use crate::defs::ThingCategory;
use crate::fixed::{
    FRACBITS, FRACTOMAPBITS, FRACUNIT, Fixed, MAPBITS, MapFixed, MapPoint, MapSeg, fixed_lerp,
    frac_to_map,
};
use crate::video::{Rect, Surface};
use crate::world::{Level, Palette};
use glyphs::GlyphSeg;

/*───────────────────────── scene inputs ──────────────────────────────*/

/// Position/orientation of one entity at the current and previous tic.
#[derive(Clone, Copy, Debug)]
pub struct EntitySnapshot {
    pub x: Fixed,
    pub y: Fixed,
    pub prev_x: Fixed,
    pub prev_y: Fixed,
    pub angle: f32,
    pub prev_angle: f32,
    pub radius: Fixed,
    pub category: ThingCategory,
    pub alive: bool,
}

impl EntitySnapshot {
    /// Map-space position blended `lerp` of the way into the current tic.
    pub fn interp_pos(&self, lerp: Fixed) -> MapPoint {
        MapPoint::new(
            frac_to_map(fixed_lerp(self.prev_x, self.x, lerp)),
            frac_to_map(fixed_lerp(self.prev_y, self.y, lerp)),
        )
    }

    /// Facing angle blended across the tic, shortest way around.
    pub fn interp_angle(&self, lerp: Fixed) -> f32 {
        use std::f32::consts::{PI, TAU};
        let t = lerp as f32 / FRACUNIT as f32;
        let mut d = self.angle - self.prev_angle;
        if d > PI {
            d -= TAU;
        } else if d < -PI {
            d += TAU;
        }
        self.prev_angle + d * t
    }
}

/// Everything the composer needs from the outside world for one frame.
pub struct Scene<'a> {
    /// Fraction of the way from the previous tic to the current one,
    /// 0..=FRACUNIT, supplied by the frame clock.
    pub lerp: Fixed,
    pub player: EntitySnapshot,
    /// Other connected players, drawn as extra arrows.
    pub others: &'a [EntitySnapshot],
    /// Non-player entities, drawn only under full cheat reveal.
    pub things: &'a [EntitySnapshot],
    pub reveal: RevealState,
}

/*───────────────────────── configuration ─────────────────────────────*/

/// Startup configuration; the host loads it from wherever it keeps
/// settings, this subsystem never parses files.
#[derive(Clone, Copy, Debug)]
pub struct AmConfig {
    pub frame: Rect,
    pub scheme: ColorScheme,
    pub antialias: bool,
    /// Grid cell edge in map units.
    pub grid_units: i32,
    /// Mark label color override; `None` uses the scheme's.
    pub mark_color: Option<u8>,
    /// Draw a small cross instead of a single center dot when panning
    /// free of follow mode.
    pub crosshair_cross: bool,
    pub follow: bool,
    pub overlay: bool,
    pub rotate: bool,
    pub grid: bool,
}

impl Default for AmConfig {
    fn default() -> Self {
        Self {
            frame: Rect::new(0, 0, 320, 200),
            scheme: ColorScheme::default(),
            antialias: true,
            grid_units: 128,
            mark_color: None,
            crosshair_cross: false,
            follow: true,
            overlay: false,
            rotate: false,
            grid: false,
        }
    }
}

/*───────────────────────── the subsystem ─────────────────────────────*/

pub struct Automap {
    active: bool,
    viewport: Viewport,
    marks: MarkStore,
    scheme: ColorScheme,
    antialias: bool,
    grid_units: i32,
    mark_color: Option<u8>,
    crosshair_cross: bool,

    palette: Option<Palette>,
    shade: Option<ShadeTable>,

    /// Name of the level the viewport was last initialised for; bounds
    /// and scale survive deactivate/activate on the same level.
    level_name: Option<String>,

    /* input-handler state */
    pan_keys: [bool; 4], // right, left, up, down
    speed_held: bool,
    /// +1 while zooming in, -1 while zooming out, 0 idle; the speed key
    /// re-engages the active direction with the faster presets.
    zoom_dir: i8,

    /// Player position cached each frame for follow-restore and marks.
    last_player: MapPoint,
    /// Rotation angle held over from the last attached frame; used while
    /// in detached overlay (overlay on, follow off).
    frozen_angle: f32,
}

impl Automap {
    pub fn new(cfg: AmConfig) -> Self {
        let mut viewport = Viewport::new(cfg.frame);
        viewport.follow = cfg.follow;
        viewport.overlay = cfg.overlay;
        viewport.rotate = cfg.rotate;
        viewport.grid = cfg.grid;
        Self {
            active: false,
            viewport,
            marks: MarkStore::new(),
            scheme: cfg.scheme,
            antialias: cfg.antialias,
            grid_units: cfg.grid_units,
            mark_color: cfg.mark_color,
            crosshair_cross: cfg.crosshair_cross,
            palette: None,
            shade: None,
            level_name: None,
            pan_keys: [false; 4],
            speed_held: false,
            zoom_dir: 0,
            last_player: MapPoint::new(0, 0),
            frozen_angle: 0.0,
        }
    }

    /*──────────────────── lifecycle / config ────────────────────────*/

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.viewport.stop_pan();
        self.viewport.stop_zoom();
        self.pan_keys = [false; 4];
        self.zoom_dir = 0;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Forget the current level so the next render re-homes the window
    /// (level-complete notification from the game loop).
    pub fn level_finished(&mut self) {
        self.level_name = None;
        self.deactivate();
    }

    /// Install the active palette; shade ramps are rebuilt from it.
    pub fn set_palette(&mut self, pal: &Palette) {
        self.palette = Some(pal.clone());
        self.rebuild_shades();
    }

    pub fn set_scheme(&mut self, scheme: ColorScheme) {
        self.scheme = scheme;
        self.rebuild_shades();
    }

    #[inline]
    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    pub fn set_antialias(&mut self, on: bool) {
        self.antialias = on;
    }

    pub fn set_grid_units(&mut self, units: i32) {
        self.grid_units = units.max(8);
    }

    pub fn set_mark_color(&mut self, color: Option<u8>) {
        self.mark_color = color;
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.viewport.set_frame(frame);
    }

    fn rebuild_shades(&mut self) {
        self.shade = self
            .palette
            .as_ref()
            .map(|pal| ShadeTable::build(pal, self.scheme.colors()));
    }

    /// Mark list, read/write, for the save/load collaborator.
    #[inline]
    pub fn marks(&self) -> &MarkStore {
        &self.marks
    }

    #[inline]
    pub fn marks_mut(&mut self) -> &mut MarkStore {
        &mut self.marks
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /*──────────────────────── simulation ────────────────────────────*/

    /// Advance one fixed-rate tic. Deterministic: identical inputs give
    /// bit-identical state, which demo playback depends on.
    pub fn tick(&mut self) {
        if !self.active {
            return;
        }
        self.viewport.tick();
    }

    /*───────────────────────── rendering ────────────────────────────*/

    /// Compose one frame into `surf`. Returns the touched rectangle, or
    /// `None` when inactive or the surface cannot hold the frame.
    pub fn render(&mut self, surf: &mut Surface, level: &Level, scene: &Scene) -> Option<Rect> {
        if !self.active {
            return None;
        }
        let frame = self.viewport.frame();
        if frame.w < 2
            || frame.h < 2
            || frame.x < 0
            || frame.y < 0
            || frame.x + frame.w > surf.width() as i32
            || frame.y + frame.h > surf.height() as i32
        {
            return None;
        }

        let player_pt = scene.player.interp_pos(scene.lerp);
        self.last_player = player_pt;

        // 0. first sight of a new level: bounds, scale, home, marks
        if self.level_name.as_deref() != Some(level.name.as_str()) {
            self.viewport.init_for_level(level, player_pt);
            self.marks.clear();
            self.level_name = Some(level.name.clone());
        }

        // 1. follow overrides the window origin every frame
        if self.viewport.follow {
            self.viewport.follow_update(player_pt);
        }

        // 2./3. zoom and pan advance per tic; here we only blend
        let vw = self.viewport.view(scene.lerp);

        // 4. rotation pivot and angle (frozen while in detached overlay)
        let rotating = self.viewport.rotate;
        let angle = if rotating {
            if self.viewport.overlay && !self.viewport.follow {
                self.frozen_angle
            } else {
                let a = std::f32::consts::FRAC_PI_2 - scene.player.interp_angle(scene.lerp);
                self.frozen_angle = a;
                a
            }
        } else {
            0.0
        };
        self.viewport.rot_angle = angle;
        let (rot_sin, rot_cos) = fixed_sin_cos(angle);
        let pivot = vw.center();
        let rot = rotating.then_some((pivot, rot_sin, rot_cos));

        let colors = self.scheme.colors();

        // 5. background, unless the 3D view shows through
        if !self.viewport.overlay {
            surf.fill_rect(frame, colors.background);
        }

        // 6. grid
        if self.viewport.grid {
            self.draw_grid(surf, &vw, rot, colors.grid);
        }

        // 7. walls
        self.draw_walls(surf, level, &vw, rot, scene.reveal);

        // 8. player arrows
        let player_angle = scene.player.interp_angle(scene.lerp) + angle;
        self.draw_glyph(
            surf,
            &vw,
            &glyphs::PLAYER_ARROW,
            glyphs::ARROW_RADIUS,
            player_angle,
            maybe_rotated(player_pt, rot),
            colors.player,
        );
        for (i, other) in scene.others.iter().enumerate() {
            self.draw_glyph(
                surf,
                &vw,
                &glyphs::PLAYER_ARROW,
                glyphs::ARROW_RADIUS,
                other.interp_angle(scene.lerp) + angle,
                maybe_rotated(other.interp_pos(scene.lerp), rot),
                colors.players[i % colors.players.len()],
            );
        }

        // 9. entity triangles under full reveal
        if scene.reveal.cheat.reveals_things() {
            for thing in scene.things {
                let color = match (thing.category, thing.alive) {
                    (ThingCategory::Monster, true) => colors.thing_monster,
                    (ThingCategory::Monster, false) => colors.thing_corpse,
                    (ThingCategory::Pickup, _) => colors.thing_pickup,
                    (ThingCategory::Hazard, _) => colors.thing_hazard,
                    _ => colors.thing_misc,
                };
                self.draw_glyph(
                    surf,
                    &vw,
                    &glyphs::THIN_TRIANGLE,
                    (thing.radius as MapFixed) >> FRACTOMAPBITS,
                    thing.angle + angle,
                    maybe_rotated(thing.interp_pos(scene.lerp), rot),
                    color,
                );
            }
        }

        // 10. crosshair while panning free
        if !self.viewport.follow {
            self.draw_crosshair(surf, frame, colors.crosshair);
        }

        // 11. marks
        let mark_color = self.mark_color.unwrap_or(colors.mark);
        for (i, p) in self.marks.iter().enumerate() {
            let p = maybe_rotated(p, rot);
            let x = vw.cx(p.x);
            let y = vw.cy(p.y);
            if frame.contains(x, y) {
                glyphs::draw_number(surf, x, y - glyphs::DIGIT_H / 2, i + 1, mark_color);
            }
        }

        // 12. the video layer can flush just this rectangle
        Some(frame)
    }

    /*────────────────────── draw helpers ────────────────────────────*/

    fn draw_walls(
        &self,
        surf: &mut Surface,
        level: &Level,
        vw: &ViewWindow,
        rot: Option<(MapPoint, Fixed, Fixed)>,
        reveal: RevealState,
    ) {
        let colors = self.scheme.colors();
        for ld in &level.linedefs {
            let Some(color) = color::classify_line(level, ld, colors, reveal) else {
                continue;
            };
            let (v1, v2) = level.line_verts(ld);
            let seg = MapSeg {
                a: maybe_rotated(MapPoint::new(frac_to_map(v1.x), frac_to_map(v1.y)), rot),
                b: maybe_rotated(MapPoint::new(frac_to_map(v2.x), frac_to_map(v2.y)), rot),
            };
            let Some(fl) = clip::clip_seg(seg, vw) else {
                continue;
            };
            match self.shade_row(color) {
                Some(row) => raster::draw_line_aa(surf, fl, row),
                None => raster::draw_line(surf, fl, color),
            }
        }
    }

    fn shade_row(&self, color: u8) -> Option<&[u8; NUM_SHADES]> {
        if !self.antialias {
            return None;
        }
        self.shade.as_ref().and_then(|t| t.row(color))
    }

    fn draw_grid(
        &self,
        surf: &mut Surface,
        vw: &ViewWindow,
        rot: Option<(MapPoint, Fixed, Fixed)>,
        color: u8,
    ) {
        let step = (self.grid_units as MapFixed) << MAPBITS;
        // extend beyond the window when rotating so corners stay covered
        let (ext_w, ext_h) = if rot.is_some() {
            (vw.m_h / 2, vw.m_w / 2)
        } else {
            (0, 0)
        };

        // vertical lines, aligned to world multiples of the cell size
        let mut x = vw.m_x - ext_w;
        let rem = x.rem_euclid(step);
        if rem != 0 {
            x += step - rem;
        }
        while x < vw.m_x + vw.m_w + ext_w {
            let seg = MapSeg {
                a: maybe_rotated(MapPoint::new(x, vw.m_y - ext_h), rot),
                b: maybe_rotated(MapPoint::new(x, vw.m_y + vw.m_h + ext_h), rot),
            };
            if let Some(fl) = clip::clip_seg(seg, vw) {
                raster::draw_line(surf, fl, color);
            }
            x += step;
        }

        // horizontal lines
        let mut y = vw.m_y - ext_h;
        let rem = y.rem_euclid(step);
        if rem != 0 {
            y += step - rem;
        }
        while y < vw.m_y + vw.m_h + ext_h {
            let seg = MapSeg {
                a: maybe_rotated(MapPoint::new(vw.m_x - ext_w, y), rot),
                b: maybe_rotated(MapPoint::new(vw.m_x + vw.m_w + ext_w, y), rot),
            };
            if let Some(fl) = clip::clip_seg(seg, vw) {
                raster::draw_line(surf, fl, color);
            }
            y += step;
        }
    }

    /// Scale, rotate and translate a glyph, then clip and draw each edge.
    fn draw_glyph(
        &self,
        surf: &mut Surface,
        vw: &ViewWindow,
        segs: &[GlyphSeg],
        radius: MapFixed,
        angle: f32,
        at: MapPoint,
        color: u8,
    ) {
        let (sin, cos) = fixed_sin_cos(angle);
        let placed: SmallVec<[MapSeg; 16]> = segs
            .iter()
            .map(|s| {
                let scale = |v: Fixed| (v as i64 * radius) >> FRACBITS;
                let origin = MapPoint::new(0, 0);
                let a = coords::rotate_about(
                    MapPoint::new(scale(s.ax), scale(s.ay)),
                    origin,
                    sin,
                    cos,
                );
                let b = coords::rotate_about(
                    MapPoint::new(scale(s.bx), scale(s.by)),
                    origin,
                    sin,
                    cos,
                );
                MapSeg {
                    a: MapPoint::new(a.x + at.x, a.y + at.y),
                    b: MapPoint::new(b.x + at.x, b.y + at.y),
                }
            })
            .collect();
        for seg in placed {
            if let Some(fl) = clip::clip_seg(seg, vw) {
                raster::draw_line(surf, fl, color);
            }
        }
    }

    fn draw_crosshair(&self, surf: &mut Surface, frame: Rect, color: u8) {
        let cx = frame.x + frame.w / 2;
        let cy = frame.y + frame.h / 2;
        surf.put(cx, cy, color);
        if self.crosshair_cross {
            for d in 1..=2 {
                surf.put(cx - d, cy, color);
                surf.put(cx + d, cy, color);
                surf.put(cx, cy - d, color);
                surf.put(cx, cy + d, color);
            }
        }
    }
}

/*────────────────────────── small helpers ────────────────────────────*/

/// Sine/cosine of a radian angle as 16.16 factors, computed once per use
/// site; rendering-only, so the f64 trig never touches tic state.
fn fixed_sin_cos(angle: f32) -> (Fixed, Fixed) {
    let (s, c) = (angle as f64).sin_cos();
    (
        (s * FRACUNIT as f64) as Fixed,
        (c * FRACUNIT as f64) as Fixed,
    )
}

#[inline]
fn maybe_rotated(p: MapPoint, rot: Option<(MapPoint, Fixed, Fixed)>) -> MapPoint {
    match rot {
        Some((pivot, sin, cos)) => coords::rotate_about(p, pivot, sin, cos),
        None => p,
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
