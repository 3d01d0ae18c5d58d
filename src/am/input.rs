//! Input responder: a flat dispatch from decoded automap keys to viewport
//! and mark mutations. Pure state changes; the only output is the boolean
//! "consumed" flag and fire-and-forget confirmation text through a
//! [`MessageSink`].

use crate::am::{Automap, viewport};

/// Abstract automap keys; the host's binding layer resolves real
/// scancodes to these before calling [`Automap::handle_input`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmKey {
    PanRight,
    PanLeft,
    PanUp,
    PanDown,
    ZoomIn,
    ZoomOut,
    /// One-shot toggle: frame the whole map / restore.
    MaxZoomOut,
    /// One-shot toggle: closest zoom / restore.
    MaxZoomIn,
    Follow,
    Grid,
    Overlay,
    Rotate,
    /// Drop a numbered mark at the view center.
    Mark,
    /// Remove the newest mark; with the speed modifier held, clear all.
    ClearMarks,
    /// Speed modifier: doubles pan, selects the fast zoom presets.
    Speed,
    /// Open / close the whole automap.
    Toggle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmEvent {
    Press(AmKey),
    Release(AmKey),
}

/// Receiver for user-facing confirmation lines ("Follow Mode ON", …).
/// Fire-and-forget; the HUD collaborator owns presentation.
pub trait MessageSink {
    fn show(&mut self, msg: &str);
}

/// Discard sink for hosts without a HUD.
impl MessageSink for () {
    fn show(&mut self, _msg: &str) {}
}

impl Automap {
    /// Feed one decoded event. Returns whether the event was consumed;
    /// direction keys are deliberately left unconsumed in follow mode so
    /// the caller's responder chain can reuse them.
    pub fn handle_input(&mut self, ev: AmEvent, msgs: &mut dyn MessageSink) -> bool {
        if !self.active {
            if ev == AmEvent::Press(AmKey::Toggle) {
                self.activate();
                return true;
            }
            return false;
        }

        match ev {
            AmEvent::Press(key) => self.key_down(key, msgs),
            AmEvent::Release(key) => self.key_up(key),
        }
    }

    fn key_down(&mut self, key: AmKey, msgs: &mut dyn MessageSink) -> bool {
        use AmKey::*;
        match key {
            PanRight | PanLeft | PanUp | PanDown => {
                if self.viewport.follow {
                    return false;
                }
                self.pan_keys[pan_slot(key)] = true;
                self.apply_pan();
            }
            ZoomIn => {
                self.zoom_dir = 1;
                self.apply_zoom();
            }
            ZoomOut => {
                self.zoom_dir = -1;
                self.apply_zoom();
            }
            MaxZoomOut => {
                let center = self.viewport.follow.then_some(self.last_player);
                self.viewport.toggle_max_out(center);
            }
            MaxZoomIn => {
                let center = self.viewport.follow.then_some(self.last_player);
                self.viewport.toggle_max_in(center);
            }
            Follow => {
                self.viewport.follow = !self.viewport.follow;
                // manual panning and follow are mutually exclusive
                self.pan_keys = [false; 4];
                self.viewport.stop_pan();
                msgs.show(if self.viewport.follow {
                    "Follow Mode ON"
                } else {
                    "Follow Mode OFF"
                });
            }
            Grid => {
                self.viewport.grid = !self.viewport.grid;
                msgs.show(if self.viewport.grid { "Grid ON" } else { "Grid OFF" });
            }
            Overlay => {
                self.viewport.overlay = !self.viewport.overlay;
                msgs.show(if self.viewport.overlay {
                    "Overlay Mode ON"
                } else {
                    "Overlay Mode OFF"
                });
            }
            Rotate => {
                self.viewport.rotate = !self.viewport.rotate;
                msgs.show(if self.viewport.rotate {
                    "Rotate Mode ON"
                } else {
                    "Rotate Mode OFF"
                });
            }
            Mark => {
                self.marks.add(self.viewport.center());
                msgs.show(&format!("Marked Spot {}", self.marks.count()));
            }
            ClearMarks => {
                if self.speed_held {
                    self.marks.clear();
                    msgs.show("All Marks Cleared");
                } else if !self.marks.is_empty() {
                    self.marks.remove_last();
                    msgs.show("Cleared Last Mark");
                }
            }
            Speed => {
                self.speed_held = true;
                self.refresh_velocities();
            }
            Toggle => {
                self.deactivate();
            }
        }
        true
    }

    fn key_up(&mut self, key: AmKey) -> bool {
        use AmKey::*;
        match key {
            PanRight | PanLeft | PanUp | PanDown => {
                if self.viewport.follow {
                    return false;
                }
                self.pan_keys[pan_slot(key)] = false;
                self.apply_pan();
            }
            ZoomIn | ZoomOut => {
                self.zoom_dir = 0;
                self.viewport.stop_zoom();
            }
            Speed => {
                self.speed_held = false;
                self.refresh_velocities();
            }
            _ => {}
        }
        true
    }

    /// Recompute pan velocity from the currently held direction keys.
    fn apply_pan(&mut self) {
        let [right, left, up, down] = self.pan_keys;
        let dx = right as i32 - left as i32;
        let dy = up as i32 - down as i32;
        if dx == 0 && dy == 0 {
            self.viewport.stop_pan();
        } else {
            self.viewport.set_pan(dx, dy, self.speed_held);
        }
    }

    /// Engage the zoom multiplier pair for the remembered direction.
    fn apply_zoom(&mut self) {
        match (self.zoom_dir, self.speed_held) {
            (1, false) => self.viewport.set_zoom(viewport::ZOOM_IN, viewport::ZOOM_OUT),
            (1, true) => self
                .viewport
                .set_zoom(viewport::ZOOM_IN_FAST, viewport::ZOOM_OUT_FAST),
            (-1, false) => self.viewport.set_zoom(viewport::ZOOM_OUT, viewport::ZOOM_IN),
            (-1, true) => self
                .viewport
                .set_zoom(viewport::ZOOM_OUT_FAST, viewport::ZOOM_IN_FAST),
            _ => self.viewport.stop_zoom(),
        }
    }

    /// The speed modifier changed while keys may be held: rebuild both
    /// velocities with the new presets.
    fn refresh_velocities(&mut self) {
        if self.pan_keys.iter().any(|&k| k) {
            self.apply_pan();
        }
        if self.zoom_dir != 0 {
            self.apply_zoom();
        }
    }
}

fn pan_slot(key: AmKey) -> usize {
    match key {
        AmKey::PanRight => 0,
        AmKey::PanLeft => 1,
        AmKey::PanUp => 2,
        AmKey::PanDown => 3,
        _ => unreachable!("not a pan key"),
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
