use hecs::{Entity, World};

use super::{Class, Heading, InputCmd, Position, Vitals, systems};
use crate::am::EntitySnapshot;
use crate::defs::{self, ThingCategory};
use crate::world::Level;

pub const SIM_FPS: u32 = 35;

/// Owns the ECS world and drives the (deliberately tiny) game logic: one
/// flying player plus the static bestiary spawned from the THINGS lump.
///
/// `tick` is fixed-rate and deterministic; the host owns the clock and the
/// fractional-tic value used for rendering.
pub struct TicRunner {
    world: World,
    player: Entity,
}

impl TicRunner {
    /// Spawn every skill-agnostic thing in `level` and a player at the
    /// player-1 start (or the map origin if the start is missing).
    pub fn new(level: &Level) -> Self {
        let mut world = World::new();

        for thing in &level.things {
            if thing.type_id == 1 || thing.multiplayer {
                continue;
            }
            let info = defs::by_doomednum(thing.type_id);
            world.spawn((
                Position::at(thing.x, thing.y),
                Heading::at(thing.angle),
                Class {
                    category: info.category,
                    radius: info.radius,
                },
                Vitals { alive: true },
            ));
        }

        let start = level.things.iter().find(|t| t.type_id == 1);
        let (x, y, angle) = match start {
            Some(t) => (t.x, t.y, t.angle),
            None => (0, 0, 0.0),
        };
        let player = world.spawn((
            Position::at(x, y),
            Heading::at(angle),
            Class {
                category: ThingCategory::Player,
                radius: 16 * crate::fixed::FRACUNIT,
            },
            Vitals { alive: true },
        ));

        Self { world, player }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    /* ---------------------------------------------------------------- */
    /* one fixed-rate game tic                                           */
    /* ---------------------------------------------------------------- */
    pub fn tick(&mut self, level: &mut Level, cmd: InputCmd) {
        // snapshot previous state first so rendering can interpolate
        for (_, (pos, head)) in self.world.query_mut::<(&mut Position, &mut Heading)>() {
            pos.prev_x = pos.x;
            pos.prev_y = pos.y;
            head.prev = head.angle;
        }

        systems::player_move(&mut self.world, self.player, cmd);

        if let Some((x, y)) = self.player_pos() {
            systems::reveal_nearby(level, x, y);
        }
    }

    fn player_pos(&self) -> Option<(i32, i32)> {
        let mut q = self.world.query_one::<&Position>(self.player).ok()?;
        q.get().map(|p| (p.x, p.y))
    }

    /* ---------------------------------------------------------------- */
    /* snapshots for the automap                                         */
    /* ---------------------------------------------------------------- */

    pub fn player_snapshot(&self) -> EntitySnapshot {
        self.snapshot_of(self.player)
            .expect("player entity always present")
    }

    /// Every non-player entity, for cheat-mode display.
    pub fn thing_snapshots(&self) -> Vec<EntitySnapshot> {
        self.world
            .query::<(&Position, &Heading, &Class, &Vitals)>()
            .iter()
            .filter(|(e, _)| *e != self.player)
            .map(|(_, (pos, head, class, vit))| snapshot(pos, head, class, vit))
            .collect()
    }

    fn snapshot_of(&self, ent: Entity) -> Option<EntitySnapshot> {
        let mut q = self
            .world
            .query_one::<(&Position, &Heading, &Class, &Vitals)>(ent)
            .ok()?;
        q.get().map(|(p, h, c, v)| snapshot(p, h, c, v))
    }
}

fn snapshot(pos: &Position, head: &Heading, class: &Class, vit: &Vitals) -> EntitySnapshot {
    EntitySnapshot {
        x: pos.x,
        y: pos.y,
        prev_x: pos.prev_x,
        prev_y: pos.prev_y,
        angle: head.angle,
        prev_angle: head.prev,
        radius: class.radius,
        category: class.category,
        alive: vit.alive,
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::FRACUNIT;
    use crate::world::{Thing, Vertex};

    fn empty_level() -> Level {
        Level {
            name: "E1M1".into(),
            things: vec![
                Thing {
                    x: 100 * FRACUNIT,
                    y: 200 * FRACUNIT,
                    angle: 0.0,
                    type_id: 1,
                    multiplayer: false,
                },
                Thing {
                    x: 0,
                    y: 0,
                    angle: 0.0,
                    type_id: 3001,
                    multiplayer: false,
                },
            ],
            linedefs: Vec::new(),
            sidedefs: Vec::new(),
            vertices: vec![Vertex { x: 0, y: 0 }],
            sectors: Vec::new(),
        }
    }

    #[test]
    fn spawns_player_and_things() {
        let lvl = empty_level();
        let sim = TicRunner::new(&lvl);
        let player = sim.player_snapshot();
        assert_eq!(player.x, 100 * FRACUNIT);
        assert_eq!(sim.thing_snapshots().len(), 1);
    }

    #[test]
    fn tick_snapshots_previous_position() {
        let mut lvl = empty_level();
        let mut sim = TicRunner::new(&lvl);
        let before = sim.player_snapshot();

        let cmd = InputCmd {
            forward: 1,
            ..Default::default()
        };
        sim.tick(&mut lvl, cmd);

        let after = sim.player_snapshot();
        assert_eq!(after.prev_x, before.x);
        assert!(after.x > after.prev_x); // facing east, moved east
    }

    #[test]
    fn identical_input_is_deterministic() {
        let mut la = empty_level();
        let mut lb = empty_level();
        let mut a = TicRunner::new(&la);
        let mut b = TicRunner::new(&lb);
        let cmd = InputCmd {
            forward: 1,
            turn: 1,
            run: true,
            ..Default::default()
        };
        for _ in 0..100 {
            a.tick(&mut la, cmd);
            b.tick(&mut lb, cmd);
        }
        let (pa, pb) = (a.player_snapshot(), b.player_snapshot());
        assert_eq!(pa.x, pb.x);
        assert_eq!(pa.y, pb.y);
        assert_eq!(pa.angle, pb.angle);
    }
}
