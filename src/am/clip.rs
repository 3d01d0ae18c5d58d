//! Cohen–Sutherland style segment clipping, run twice per wall: a cheap
//! outcode pass in map space throws away lines nowhere near the window
//! before the transform is paid for, then the full iterative clip runs in
//! frame space against the destination rectangle (extreme zoom can push
//! transformed coordinates outside the frame even after the map-space pass).

use crate::am::coords::ViewWindow;
use crate::fixed::{FramePoint, FrameSeg, MapSeg};

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

#[inline(always)]
fn frame_outcode(p: FramePoint, x0: i32, y0: i32, x1: i32, y1: i32) -> u8 {
    let mut oc = 0;
    if p.y < y0 {
        oc |= TOP;
    } else if p.y >= y1 {
        oc |= BOTTOM;
    }
    if p.x < x0 {
        oc |= LEFT;
    } else if p.x >= x1 {
        oc |= RIGHT;
    }
    oc
}

/// Clip `ml` against the window; `None` means nothing of it is visible.
/// On success the result lies fully inside the frame rectangle.
pub fn clip_seg(ml: MapSeg, vw: &ViewWindow) -> Option<FrameSeg> {
    let m_x2 = vw.m_x + vw.m_w;
    let m_y2 = vw.m_y + vw.m_h;

    /*---------------- map-space trivial reject ------------------------*/
    let mut oc1 = 0u8;
    let mut oc2 = 0u8;
    if ml.a.y > m_y2 {
        oc1 = TOP;
    } else if ml.a.y < vw.m_y {
        oc1 = BOTTOM;
    }
    if ml.b.y > m_y2 {
        oc2 = TOP;
    } else if ml.b.y < vw.m_y {
        oc2 = BOTTOM;
    }
    if (oc1 & oc2) != 0 {
        return None;
    }

    if ml.a.x < vw.m_x {
        oc1 |= LEFT;
    } else if ml.a.x > m_x2 {
        oc1 |= RIGHT;
    }
    if ml.b.x < vw.m_x {
        oc2 |= LEFT;
    } else if ml.b.x > m_x2 {
        oc2 |= RIGHT;
    }
    if (oc1 & oc2) != 0 {
        return None;
    }

    /*---------------- transform, then frame-space clip ----------------*/
    let x0 = vw.frame.x;
    let y0 = vw.frame.y;
    let x1 = vw.frame.x + vw.frame.w;
    let y1 = vw.frame.y + vw.frame.h;

    let mut a = FramePoint {
        x: vw.cx(ml.a.x),
        y: vw.cy(ml.a.y),
    };
    let mut b = FramePoint {
        x: vw.cx(ml.b.x),
        y: vw.cy(ml.b.y),
    };

    let mut oc1 = frame_outcode(a, x0, y0, x1, y1);
    let mut oc2 = frame_outcode(b, x0, y0, x1, y1);
    if (oc1 & oc2) != 0 {
        return None;
    }

    while (oc1 | oc2) != 0 {
        // pick an endpoint that is outside and move it onto the nearest
        // violated boundary; products are widened, a long nearly-axis-
        // aligned span times a pixel distance can exceed 32 bits
        let outside = if oc1 != 0 { oc1 } else { oc2 };

        let tmp = if outside & TOP != 0 {
            let dy = (a.y - b.y) as i64;
            let dx = (b.x - a.x) as i64;
            FramePoint {
                x: a.x + (dx * (a.y - y0) as i64 / dy) as i32,
                y: y0,
            }
        } else if outside & BOTTOM != 0 {
            let dy = (a.y - b.y) as i64;
            let dx = (b.x - a.x) as i64;
            FramePoint {
                x: a.x + (dx * (a.y - y1) as i64 / dy) as i32,
                y: y1 - 1,
            }
        } else if outside & RIGHT != 0 {
            let dy = (b.y - a.y) as i64;
            let dx = (b.x - a.x) as i64;
            FramePoint {
                x: x1 - 1,
                y: a.y + (dy * (x1 - 1 - a.x) as i64 / dx) as i32,
            }
        } else {
            let dy = (b.y - a.y) as i64;
            let dx = (b.x - a.x) as i64;
            FramePoint {
                x: x0,
                y: a.y + (dy * (x0 - a.x) as i64 / dx) as i32,
            }
        };

        if outside == oc1 {
            a = tmp;
            oc1 = frame_outcode(a, x0, y0, x1, y1);
        } else {
            b = tmp;
            oc2 = frame_outcode(b, x0, y0, x1, y1);
        }
        if (oc1 & oc2) != 0 {
            return None;
        }
    }

    Some(FrameSeg { a, b })
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{FRACUNIT, MAPUNIT, MapPoint};
    use crate::video::Rect;

    /// 1:1 window: 320x200 pixels over (0,0)-(320,200) map units.
    fn unit_view() -> ViewWindow {
        ViewWindow {
            frame: Rect::new(0, 0, 320, 200),
            m_x: 0,
            m_y: 0,
            m_w: 320 * MAPUNIT,
            m_h: 200 * MAPUNIT,
            scale_mtof: FRACUNIT,
            scale_ftom: FRACUNIT,
        }
    }

    fn seg(ax: i64, ay: i64, bx: i64, by: i64) -> MapSeg {
        MapSeg {
            a: MapPoint::new(ax * MAPUNIT, ay * MAPUNIT),
            b: MapPoint::new(bx * MAPUNIT, by * MAPUNIT),
        }
    }

    #[test]
    fn fully_outside_one_axis_rejects_both_orders() {
        let vw = unit_view();
        // entirely north of the window
        let s = seg(10, 300, 200, 250);
        assert!(clip_seg(s, &vw).is_none());
        assert!(clip_seg(MapSeg { a: s.b, b: s.a }, &vw).is_none());
        // entirely west of the window
        let s = seg(-50, -50, -20, 250);
        assert!(clip_seg(s, &vw).is_none());
        assert!(clip_seg(MapSeg { a: s.b, b: s.a }, &vw).is_none());
    }

    #[test]
    fn fully_inside_passes_unchanged() {
        let vw = unit_view();
        let out = clip_seg(seg(10, 10, 100, 50), &vw).unwrap();
        assert_eq!(out.a, FramePoint { x: 10, y: 190 });
        assert_eq!(out.b, FramePoint { x: 100, y: 150 });
    }

    #[test]
    fn one_endpoint_clipped_to_boundary() {
        let vw = unit_view();
        // b pokes out of the east edge; a stays put
        let out = clip_seg(seg(100, 100, 400, 100), &vw).unwrap();
        assert_eq!(out.a, FramePoint { x: 100, y: 100 });
        assert!((out.b.x - 319).abs() <= 1, "clipped to east edge");
        assert_eq!(out.b.y, 100);
    }

    #[test]
    fn diagonal_through_corner_survives() {
        let vw = unit_view();
        // crosses the window even though both endpoints are far outside
        let out = clip_seg(seg(-500, -500, 500, 500), &vw).unwrap();
        let inside = |p: FramePoint| {
            (0..320).contains(&p.x) && (0..200).contains(&p.y)
        };
        assert!(inside(out.a) && inside(out.b));
    }

    #[test]
    fn result_always_inside_frame() {
        let vw = unit_view();
        let cases = [
            seg(-1000, 100, 1000, 120),
            seg(160, -1000, 170, 1000),
            seg(-300, 500, 600, -300),
            seg(0, 0, 320, 200),
        ];
        for s in cases {
            if let Some(out) = clip_seg(s, &vw) {
                for p in [out.a, out.b] {
                    assert!((0..320).contains(&p.x), "{s:?} -> {p:?}");
                    assert!((0..200).contains(&p.y), "{s:?} -> {p:?}");
                }
            }
        }
    }

    #[test]
    fn zoomed_far_out_does_not_wrap() {
        // tiny scale over a huge map: the transform must stay exact
        let vw = ViewWindow {
            frame: Rect::new(0, 0, 320, 200),
            m_x: -30_000 * MAPUNIT,
            m_y: -30_000 * MAPUNIT,
            m_w: 60_000 * MAPUNIT,
            m_h: 60_000 * MAPUNIT,
            scale_mtof: FRACUNIT / 300,
            scale_ftom: 300 * FRACUNIT,
        };
        let out = clip_seg(seg(-29_000, 0, 29_000, 0), &vw);
        assert!(out.is_some());
        let out = out.unwrap();
        assert!(out.a.x >= 0 && out.b.x < 320);
    }
}
