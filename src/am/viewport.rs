//! Automap view window: origin/extent in map space, the zoom scale pair,
//! pan/zoom velocities and the mode flags, advanced once per game tic.
//!
//! All fields live in an explicit struct owned by the [`crate::am::Automap`]
//! instance; nothing here is process-global, so split-screen automaps and
//! unit tests can each own one.

use crate::am::coords::{self, ViewWindow};
use crate::fixed::{
    FRACUNIT, Fixed, MAPUNIT, MapFixed, MapPoint, fixed_lerp, fixed_mul, map_lerp,
};
use crate::video::Rect;
use crate::world::Level;

/// Pan speed, framebuffer pixels per tic (doubled by the speed key).
pub const F_PANINC: i32 = 4;
/// Per-tic zoom multipliers, 16.16 (`1.02` and its reciprocal).
pub const ZOOM_IN: Fixed = 66846;
pub const ZOOM_OUT: Fixed = 64250;
/// Speed-key presets (`1.08` and its reciprocal).
pub const ZOOM_IN_FAST: Fixed = 70778;
pub const ZOOM_OUT_FAST: Fixed = 60681;

/// Player collision radius in map space; bounds the maximum zoom-in.
const PLAYER_RADIUS: MapFixed = 16 * MAPUNIT;

/// Which one-shot "snap to extreme zoom" is currently engaged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BigState {
    Off,
    MaxOut,
    MaxIn,
}

pub struct Viewport {
    /// Destination rectangle inside the framebuffer.
    frame: Rect,

    /* window in map space: lower-left origin + extent */
    m_x: MapFixed,
    m_y: MapFixed,
    m_w: MapFixed,
    m_h: MapFixed,

    /* scale pair; `ftom` is always the reciprocal of `mtof` */
    scale_mtof: Fixed,
    scale_ftom: Fixed,
    min_scale_mtof: Fixed,
    max_scale_mtof: Fixed,

    /* shadows captured at the top of each tic, for render interpolation */
    prev_m_x: MapFixed,
    prev_m_y: MapFixed,
    prev_scale_mtof: Fixed,

    /* world bounding box, computed once per level */
    min_x: MapFixed,
    min_y: MapFixed,
    max_x: MapFixed,
    max_y: MapFixed,

    /* velocities */
    paninc_x: MapFixed,
    paninc_y: MapFixed,
    mtof_zoommul: Fixed,
    ftom_zoommul: Fixed,

    /* mode flags */
    pub follow: bool,
    pub overlay: bool,
    pub rotate: bool,
    pub grid: bool,

    /// Rotation angle in radians; only meaningful while `rotate` is set.
    pub rot_angle: f32,

    /* one-slot snapshot for the max-zoom toggles */
    saved: (MapFixed, MapFixed, MapFixed, MapFixed),
    big_state: BigState,
}

impl Viewport {
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            m_x: 0,
            m_y: 0,
            m_w: 0,
            m_h: 0,
            scale_mtof: FRACUNIT,
            scale_ftom: FRACUNIT,
            min_scale_mtof: 1,
            max_scale_mtof: i32::MAX,
            prev_m_x: 0,
            prev_m_y: 0,
            prev_scale_mtof: FRACUNIT,
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
            paninc_x: 0,
            paninc_y: 0,
            mtof_zoommul: FRACUNIT,
            ftom_zoommul: FRACUNIT,
            follow: true,
            overlay: false,
            rotate: false,
            grid: false,
            rot_angle: 0.0,
            saved: (0, 0, 0, 0),
            big_state: BigState::Off,
        }
    }

    /*================== level / frame initialisation ==================*/

    /// Compute the level bounding box and the scale limits, then home the
    /// window on `center` at a comfortable initial zoom. Called once per
    /// new level.
    pub fn init_for_level(&mut self, level: &Level, center: MapPoint) {
        self.find_bounds(level);

        let map_w = (self.max_x - self.min_x).max(MAPUNIT);
        let map_h = (self.max_y - self.min_y).max(MAPUNIT);
        let a = coords::scale_for(self.frame.w, map_w);
        let b = coords::scale_for(self.frame.h, map_h);
        self.min_scale_mtof = a.min(b).max(1);
        self.max_scale_mtof = coords::scale_for(self.frame.h, 2 * PLAYER_RADIUS);

        // slightly zoomed in from "whole map visible"
        let initial = crate::fixed::fixed_div(self.min_scale_mtof, 7 * FRACUNIT / 10);
        self.set_scale(initial.clamp(self.min_scale_mtof, self.max_scale_mtof));

        self.m_x = center.x - self.m_w / 2;
        self.m_y = center.y - self.m_h / 2;
        self.clamp_window();
        self.sync_shadows();
        self.big_state = BigState::Off;
        self.stop_zoom();
        self.paninc_x = 0;
        self.paninc_y = 0;
    }

    /// Change the destination rectangle (window resize); extent follows.
    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
        self.activate_new_scale();
    }

    #[inline]
    pub fn frame(&self) -> Rect {
        self.frame
    }

    fn find_bounds(&mut self, level: &Level) {
        let mut min_x = i64::MAX;
        let mut min_y = i64::MAX;
        let mut max_x = i64::MIN;
        let mut max_y = i64::MIN;
        for v in &level.vertices {
            let x = crate::fixed::frac_to_map(v.x);
            let y = crate::fixed::frac_to_map(v.y);
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        if level.vertices.is_empty() {
            (min_x, min_y, max_x, max_y) = (0, 0, MAPUNIT, MAPUNIT);
        }
        self.min_x = min_x;
        self.min_y = min_y;
        self.max_x = max_x;
        self.max_y = max_y;
    }

    /*======================= scale management =========================*/

    /// Set both scale factors together; extent is re-derived and the
    /// window re-centered on its previous center.
    fn set_scale(&mut self, scale_mtof: Fixed) {
        self.scale_mtof = scale_mtof;
        self.scale_ftom = coords::invert_scale(scale_mtof);
        self.activate_new_scale();
    }

    fn activate_new_scale(&mut self) {
        self.m_x += self.m_w / 2;
        self.m_y += self.m_h / 2;
        self.m_w = coords::ftom(self.scale_ftom, self.frame.w);
        self.m_h = coords::ftom(self.scale_ftom, self.frame.h);
        self.m_x -= self.m_w / 2;
        self.m_y -= self.m_h / 2;
    }

    /// Apply the per-tic zoom multiplier; on hitting a bound, snap to it
    /// and stop the zoom rather than overshoot.
    fn change_window_scale(&mut self) {
        let next = fixed_mul(self.scale_mtof, self.mtof_zoommul);
        if next < self.min_scale_mtof {
            self.stop_zoom();
            self.set_scale(self.min_scale_mtof);
        } else if next > self.max_scale_mtof {
            self.stop_zoom();
            self.set_scale(self.max_scale_mtof);
        } else {
            self.set_scale(next);
        }
    }

    pub fn set_zoom(&mut self, mtof_mul: Fixed, ftom_mul: Fixed) {
        self.mtof_zoommul = mtof_mul;
        self.ftom_zoommul = ftom_mul;
    }

    pub fn stop_zoom(&mut self) {
        self.mtof_zoommul = FRACUNIT;
        self.ftom_zoommul = FRACUNIT;
    }

    #[inline]
    pub fn zooming(&self) -> bool {
        self.mtof_zoommul != FRACUNIT
    }

    #[inline]
    pub fn scale_mtof(&self) -> Fixed {
        self.scale_mtof
    }

    #[inline]
    pub fn scale_ftom(&self) -> Fixed {
        self.scale_ftom
    }

    #[inline]
    pub fn min_scale(&self) -> Fixed {
        self.min_scale_mtof
    }

    #[inline]
    pub fn max_scale(&self) -> Fixed {
        self.max_scale_mtof
    }

    /*========================= panning ================================*/

    /// Set the pan velocity from held direction keys, in whole pan steps
    /// (`-1`, `0`, `+1` per axis) at the current zoom.
    pub fn set_pan(&mut self, dx: i32, dy: i32, speed: bool) {
        let step = if speed { F_PANINC * 2 } else { F_PANINC };
        self.paninc_x = coords::ftom(self.scale_ftom, dx * step);
        self.paninc_y = coords::ftom(self.scale_ftom, dy * step);
    }

    pub fn stop_pan(&mut self) {
        self.paninc_x = 0;
        self.paninc_y = 0;
    }

    #[inline]
    pub fn panning(&self) -> bool {
        self.paninc_x != 0 || self.paninc_y != 0
    }

    fn change_window_loc(&mut self) {
        self.m_x += self.paninc_x;
        self.m_y += self.paninc_y;
        self.clamp_window();
    }

    /// Keep the window *center* inside the level bounding box.
    fn clamp_window(&mut self) {
        if self.m_x + self.m_w / 2 > self.max_x {
            self.m_x = self.max_x - self.m_w / 2;
        } else if self.m_x + self.m_w / 2 < self.min_x {
            self.m_x = self.min_x - self.m_w / 2;
        }
        if self.m_y + self.m_h / 2 > self.max_y {
            self.m_y = self.max_y - self.m_h / 2;
        } else if self.m_y + self.m_h / 2 < self.min_y {
            self.m_y = self.min_y - self.m_h / 2;
        }
    }

    /*==================== max-zoom one-shots ==========================*/

    /// Snap to the minimum scale (whole map framed), saving the current
    /// window; a second press restores it. While following, the restore
    /// recenters on `follow_center` instead of the stale saved origin.
    pub fn toggle_max_out(&mut self, follow_center: Option<MapPoint>) {
        match self.big_state {
            BigState::MaxOut => self.restore_scale_and_loc(follow_center),
            BigState::MaxIn => {
                self.set_scale(self.min_scale_mtof);
                self.big_state = BigState::MaxOut;
            }
            BigState::Off => {
                self.save_scale_and_loc();
                self.set_scale(self.min_scale_mtof);
                self.big_state = BigState::MaxOut;
            }
        }
    }

    /// Counterpart one-shot for the maximum zoom-in.
    pub fn toggle_max_in(&mut self, follow_center: Option<MapPoint>) {
        match self.big_state {
            BigState::MaxIn => self.restore_scale_and_loc(follow_center),
            BigState::MaxOut => {
                self.set_scale(self.max_scale_mtof);
                self.big_state = BigState::MaxIn;
            }
            BigState::Off => {
                self.save_scale_and_loc();
                self.set_scale(self.max_scale_mtof);
                self.big_state = BigState::MaxIn;
            }
        }
    }

    fn save_scale_and_loc(&mut self) {
        self.saved = (self.m_x, self.m_y, self.m_w, self.m_h);
    }

    fn restore_scale_and_loc(&mut self, follow_center: Option<MapPoint>) {
        let (sx, sy, sw, sh) = self.saved;
        self.m_w = sw;
        self.m_h = sh;
        match follow_center {
            Some(c) => {
                self.m_x = c.x - self.m_w / 2;
                self.m_y = c.y - self.m_h / 2;
            }
            None => {
                self.m_x = sx;
                self.m_y = sy;
            }
        }
        self.scale_mtof = coords::scale_for(self.frame.w, self.m_w);
        self.scale_ftom = coords::invert_scale(self.scale_mtof);
        self.big_state = BigState::Off;
    }

    /*=========================== ticking ==============================*/

    /// One deterministic simulation step: capture interpolation shadows,
    /// then advance zoom and pan.
    pub fn tick(&mut self) {
        self.sync_shadows();
        if self.zooming() {
            self.change_window_scale();
        }
        if self.panning() {
            self.change_window_loc();
        }
    }

    fn sync_shadows(&mut self) {
        self.prev_m_x = self.m_x;
        self.prev_m_y = self.m_y;
        self.prev_scale_mtof = self.scale_mtof;
    }

    /*====================== per-frame reads ===========================*/

    /// Recompute the origin from the followed entity's (already
    /// interpolated) position. Runs every rendered frame, not per tic;
    /// the round-trip through `mtof` keeps the glyph pinned to the same
    /// sub-pixel the walls snap to.
    pub fn follow_update(&mut self, p: MapPoint) {
        self.m_x = coords::ftom(self.scale_ftom, coords::mtof(self.scale_mtof, p.x))
            - self.m_w / 2;
        self.m_y = coords::ftom(self.scale_ftom, coords::mtof(self.scale_mtof, p.y))
            - self.m_h / 2;
        self.prev_m_x = self.m_x;
        self.prev_m_y = self.m_y;
    }

    /// The view used for drawing this frame: tick state blended toward
    /// the current tick by `lerp` (0..=FRACUNIT). The blend is local —
    /// nothing feeds back into tick state.
    pub fn view(&self, lerp: Fixed) -> ViewWindow {
        let scale_mtof = fixed_lerp(self.prev_scale_mtof, self.scale_mtof, lerp);
        let scale_ftom = coords::invert_scale(scale_mtof);
        let m_w = coords::ftom(scale_ftom, self.frame.w);
        let m_h = coords::ftom(scale_ftom, self.frame.h);
        // keep the interpolated window centered where the lerped origins say
        let m_x = map_lerp(self.prev_m_x, self.m_x, lerp) + (self.m_w - m_w) / 2;
        let m_y = map_lerp(self.prev_m_y, self.m_y, lerp) + (self.m_h - m_h) / 2;
        ViewWindow {
            frame: self.frame,
            m_x,
            m_y,
            m_w,
            m_h,
            scale_mtof,
            scale_ftom,
        }
    }

    /// Current (un-interpolated) window center.
    #[inline]
    pub fn center(&self) -> MapPoint {
        MapPoint::new(self.m_x + self.m_w / 2, self.m_y + self.m_h / 2)
    }

    /// World bounding box, map space.
    #[inline]
    pub fn bounds(&self) -> (MapFixed, MapFixed, MapFixed, MapFixed) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{FRACBITS, frac_to_map};
    use crate::world::{Level, Vertex};

    fn boxed_level(units: i32) -> Level {
        Level {
            name: "E1M1".into(),
            things: Vec::new(),
            linedefs: Vec::new(),
            sidedefs: Vec::new(),
            vertices: vec![
                Vertex { x: 0, y: 0 },
                Vertex {
                    x: units << FRACBITS,
                    y: units << FRACBITS,
                },
            ],
            sectors: Vec::new(),
        }
    }

    fn fresh(units: i32) -> Viewport {
        let mut vp = Viewport::new(Rect::new(0, 0, 320, 200));
        let lvl = boxed_level(units);
        vp.init_for_level(&lvl, MapPoint::new(0, 0));
        vp
    }

    #[test]
    fn scale_pair_stays_reciprocal() {
        let mut vp = fresh(1000);
        vp.set_zoom(ZOOM_IN, ZOOM_OUT);
        for _ in 0..50 {
            vp.tick();
            let expect = coords::invert_scale(vp.scale_mtof());
            assert_eq!(vp.scale_ftom(), expect);
        }
    }

    #[test]
    fn zoom_in_clamps_and_stops() {
        let mut vp = fresh(1000);
        vp.set_zoom(ZOOM_IN_FAST, ZOOM_OUT_FAST);
        for _ in 0..500 {
            vp.tick();
            if !vp.zooming() {
                break;
            }
        }
        assert_eq!(vp.scale_mtof(), vp.max_scale());
        assert!(!vp.zooming(), "zoom must stop at the bound");
        // further requests are no-ops at the bound
        vp.set_zoom(ZOOM_IN_FAST, ZOOM_OUT_FAST);
        vp.tick();
        assert_eq!(vp.scale_mtof(), vp.max_scale());
    }

    #[test]
    fn zoom_out_clamps_to_min() {
        let mut vp = fresh(1000);
        vp.set_zoom(ZOOM_OUT_FAST, ZOOM_IN_FAST);
        for _ in 0..500 {
            vp.tick();
        }
        assert_eq!(vp.scale_mtof(), vp.min_scale());
    }

    #[test]
    fn min_scale_frames_whole_map() {
        // Scenario: bbox (0,0)-(1000,1000), screen 320x200
        let mut vp = fresh(1000);
        vp.toggle_max_out(None);
        assert_eq!(vp.scale_mtof(), vp.min_scale());
        let vw = vp.view(FRACUNIT);
        // extent must equal the screen size converted through scale_ftom
        assert_eq!(vw.m_w, coords::ftom(vp.scale_ftom(), 320));
        assert_eq!(vw.m_h, coords::ftom(vp.scale_ftom(), 200));
        // and the whole bbox must fit inside the window (sub-pixel slop)
        let map_w = 1000 * MAPUNIT;
        assert!(vw.m_w >= map_w - MAPUNIT / 16);
        assert!(vw.m_h >= map_w - MAPUNIT / 16);
    }

    #[test]
    fn pan_keeps_center_in_bounds() {
        let mut vp = fresh(1000);
        vp.set_pan(1, 1, true);
        for _ in 0..10_000 {
            vp.tick();
        }
        let c = vp.center();
        let (min_x, min_y, max_x, max_y) = vp.bounds();
        assert!(c.x >= min_x && c.x <= max_x);
        assert!(c.y >= min_y && c.y <= max_y);
    }

    #[test]
    fn max_out_toggle_restores_window() {
        let mut vp = fresh(1000);
        vp.set_pan(1, 0, false);
        for _ in 0..10 {
            vp.tick();
        }
        vp.stop_pan();
        let before = (vp.center(), vp.scale_mtof());

        vp.toggle_max_out(None);
        assert_eq!(vp.scale_mtof(), vp.min_scale());
        vp.toggle_max_out(None);

        assert_eq!(vp.center().x, before.0.x);
        assert_eq!(vp.center().y, before.0.y);
        // scale restored within fixed-point rounding of the original
        assert!((vp.scale_mtof() - before.1).abs() <= 16);
    }

    #[test]
    fn restore_recentres_on_follow_target() {
        let mut vp = fresh(1000);
        vp.toggle_max_in(None);
        let target = MapPoint::new(700 * MAPUNIT, 300 * MAPUNIT);
        vp.toggle_max_in(Some(target));
        assert_eq!(vp.center().x, target.x);
        assert_eq!(vp.center().y, target.y);
    }

    #[test]
    fn view_interpolates_between_tics() {
        let mut vp = fresh(1000);
        vp.set_pan(1, 0, false);
        vp.tick();
        let prev_x = vp.prev_m_x;
        let cur_x = vp.m_x;
        assert_ne!(prev_x, cur_x);

        let half = vp.view(FRACUNIT / 2);
        assert_eq!(half.m_x, prev_x + (cur_x - prev_x) / 2);
        let full = vp.view(FRACUNIT);
        assert_eq!(full.m_x, cur_x);
    }

    #[test]
    fn follow_update_overrides_origin() {
        let mut vp = fresh(1000);
        let p = MapPoint::new(500 * MAPUNIT, 500 * MAPUNIT);
        vp.follow_update(p);
        let c = vp.center();
        // center within one pixel's worth of map units of the target
        let tol = coords::ftom(vp.scale_ftom(), 1) + 1;
        assert!((c.x - p.x).abs() <= tol);
        assert!((c.y - p.y).abs() <= tol);
    }

    #[test]
    fn bounds_from_vertices() {
        let vp = fresh(1000);
        let (min_x, min_y, max_x, max_y) = vp.bounds();
        assert_eq!(min_x, 0);
        assert_eq!(min_y, 0);
        assert_eq!(max_x, frac_to_map(1000 << FRACBITS));
        assert_eq!(max_y, frac_to_map(1000 << FRACBITS));
    }
}
