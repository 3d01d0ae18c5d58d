use hecs::{Entity, World};

use super::{Heading, InputCmd, Position};
use crate::fixed::{FRACUNIT, Fixed};
use crate::world::{Level, LinedefFlags};

/// Map units moved per tic while walking / running.
const WALK_SPEED: Fixed = 8 * FRACUNIT;
const RUN_SPEED: Fixed = 16 * FRACUNIT;
/// Radians turned per tic while walking / running.
const TURN_STEP: f32 = 0.0524; // 3 degrees
/// Lines within this distance of the player become MAPPED.
const REVEAL_RADIUS: Fixed = 384 * FRACUNIT;

/// Integrate one tic of player movement. No collision: the viewer flies
/// through walls, which is exactly what a map inspector wants.
pub fn player_move(world: &mut World, player: Entity, cmd: InputCmd) {
    let Ok(mut q) = world.query_one::<(&mut Position, &mut Heading)>(player) else {
        return;
    };
    let Some((pos, head)) = q.get() else { return };

    head.angle += cmd.turn as f32 * if cmd.run { TURN_STEP * 2.0 } else { TURN_STEP };
    head.angle = head.angle.rem_euclid(std::f32::consts::TAU);

    let speed = if cmd.run { RUN_SPEED } else { WALK_SPEED };
    let (sin, cos) = head.angle.sin_cos();
    let fwd = cmd.forward * speed;
    let side = cmd.strafe * speed;
    pos.x += (cos * fwd as f32) as Fixed + (sin * side as f32) as Fixed;
    pos.y += (sin * fwd as f32) as Fixed - (cos * side as f32) as Fixed;
}

/// Stand-in for the 3D renderer's "wall entered the view" bookkeeping:
/// mark every line with an endpoint near `(x, y)` as seen.
pub fn reveal_nearby(level: &mut Level, x: Fixed, y: Fixed) {
    let near = |vx: Fixed, vy: Fixed| {
        let dx = ((vx - x) as i64).abs();
        let dy = ((vy - y) as i64).abs();
        dx <= REVEAL_RADIUS as i64 && dy <= REVEAL_RADIUS as i64
    };
    for i in 0..level.linedefs.len() {
        let (v1, v2) = level.line_verts(&level.linedefs[i]);
        if near(v1.x, v1.y) || near(v2.x, v2.y) {
            level.linedefs[i].flags |= LinedefFlags::MAPPED;
        }
    }
}
