//! Map-space ↔ frame-space transforms.
//!
//! `scale_mtof` is framebuffer pixels per map unit in 16.16; `scale_ftom`
//! is its reciprocal. Every product runs through an i64 intermediate:
//! a zoomed-out view of a large map multiplied by a scale factor is exactly
//! the case that silently wraps 32-bit math and corrupts clipping.

use crate::fixed::{FRACBITS, FRACTOMAPBITS, FRACUNIT, Fixed, MAPBITS, MapFixed, MapPoint};
use crate::video::Rect;

/// Scale a map-space distance to a pixel distance.
#[inline(always)]
pub fn mtof(scale_mtof: Fixed, d: MapFixed) -> i32 {
    ((d * scale_mtof as i64) >> (FRACBITS + MAPBITS)) as i32
}

/// Scale a pixel distance to a map-space distance.
#[inline(always)]
pub fn ftom(scale_ftom: Fixed, px: i32) -> MapFixed {
    (px as i64 * scale_ftom as i64) >> FRACTOMAPBITS
}

/// `pixels / units` as a 16.16 scale, computed wide.
#[inline]
pub fn scale_for(px: i32, units: MapFixed) -> Fixed {
    (((px as i64) << (MAPBITS + FRACBITS)) / units) as Fixed
}

/// Reciprocal scale; the pair must always be recomputed together.
#[inline]
pub fn invert_scale(scale_mtof: Fixed) -> Fixed {
    crate::fixed::fixed_div(FRACUNIT, scale_mtof)
}

/// Rotate `p` about `pivot` by the angle whose sine/cosine are given in
/// 16.16. Used for rotate mode and for orienting glyphs.
#[inline]
pub fn rotate_about(p: MapPoint, pivot: MapPoint, sin: Fixed, cos: Fixed) -> MapPoint {
    let dx = p.x - pivot.x;
    let dy = p.y - pivot.y;
    MapPoint::new(
        pivot.x + ((dx * cos as i64 - dy * sin as i64) >> FRACBITS),
        pivot.y + ((dx * sin as i64 + dy * cos as i64) >> FRACBITS),
    )
}

/// One frame's effective view: window origin/extent in map space, the
/// scale pair, and the destination rectangle. Assembled fresh by the
/// composer every frame (possibly from interpolated values) and read-only
/// everywhere below it.
#[derive(Clone, Copy, Debug)]
pub struct ViewWindow {
    pub frame: Rect,
    pub m_x: MapFixed,
    pub m_y: MapFixed,
    pub m_w: MapFixed,
    pub m_h: MapFixed,
    pub scale_mtof: Fixed,
    pub scale_ftom: Fixed,
}

impl ViewWindow {
    /// Frame-space X of a map-space X. Screen X grows east like map X.
    #[inline(always)]
    pub fn cx(&self, x: MapFixed) -> i32 {
        self.frame.x + mtof(self.scale_mtof, x - self.m_x)
    }

    /// Frame-space Y of a map-space Y. Screen Y grows *down*, map Y
    /// grows north, hence the flip against the frame height.
    #[inline(always)]
    pub fn cy(&self, y: MapFixed) -> i32 {
        self.frame.y + (self.frame.h - mtof(self.scale_mtof, y - self.m_y))
    }

    /// Map-space center of the window.
    #[inline]
    pub fn center(&self) -> MapPoint {
        MapPoint::new(self.m_x + self.m_w / 2, self.m_y + self.m_h / 2)
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::MAPUNIT;

    #[test]
    fn mtof_ftom_inverse_within_one_unit() {
        for scale in [FRACUNIT / 7, FRACUNIT / 2, FRACUNIT, 3 * FRACUNIT] {
            let inv = invert_scale(scale);
            for px in [0, 1, 13, 199, 320] {
                let back = mtof(scale, ftom(inv, px));
                assert!(
                    (back - px).abs() <= 1,
                    "scale {scale}: {px} -> {back}"
                );
            }
        }
    }

    #[test]
    fn mtof_is_wide() {
        // A huge map distance at a big scale overflows i32 math but not ours.
        let d: MapFixed = 60_000 * MAPUNIT;
        let px = mtof(16 * FRACUNIT, d);
        assert_eq!(px, 960_000);
    }

    #[test]
    fn scale_for_round_trips_extent() {
        // 320 px across 1000 map units
        let scale = scale_for(320, 1000 * MAPUNIT);
        let extent = ftom(invert_scale(scale), 320);
        let err = (extent - 1000 * MAPUNIT).abs();
        assert!(err <= MAPUNIT / 16, "extent off by {err}");
    }

    #[test]
    fn view_y_axis_flips() {
        let vw = ViewWindow {
            frame: Rect::new(0, 0, 320, 200),
            m_x: 0,
            m_y: 0,
            m_w: 320 * MAPUNIT,
            m_h: 200 * MAPUNIT,
            scale_mtof: FRACUNIT,
            scale_ftom: FRACUNIT,
        };
        assert_eq!(vw.cy(0), 200);
        assert_eq!(vw.cy(200 * MAPUNIT), 0);
        assert_eq!(vw.cx(0), 0);
        assert_eq!(vw.cx(100 * MAPUNIT), 100);
    }

    #[test]
    fn rotate_quarter_turn() {
        let p = MapPoint::new(10 * MAPUNIT, 0);
        let r = rotate_about(p, MapPoint::new(0, 0), FRACUNIT, 0);
        assert!((r.x).abs() < MAPUNIT / 100);
        assert!((r.y - 10 * MAPUNIT).abs() < MAPUNIT / 100);
    }
}
