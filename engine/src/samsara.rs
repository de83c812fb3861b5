//! Death and what comes after.

use crate::{ecs::*, prelude::*, Msg};

/// Reap creatures that have run out of health.
#[derive(Copy, Clone, Default, Debug)]
pub struct Samsara;

impl System for Samsara {
    fn requires(&self) -> &'static [ComponentKind] {
        &[
            ComponentKind::Health,
            ComponentKind::Actor,
            ComponentKind::Position,
        ]
    }

    fn update(&mut self, r: &mut Runtime, entities: &[Entity]) {
        for &e in entities {
            if e.get::<Health>(r).0 > 0 {
                continue;
            }

            let actor = e.get::<Actor>(r);
            let Some(pos) = e.pos(r) else { continue };

            r.send_msg(Msg::Death {
                who: actor.glyph(),
                pos,
            });

            match actor.kind {
                ActorKind::Player => {
                    log::info!("Player {e} died at {pos}");
                    r.send_msg(Msg::GameOver);
                }
                ActorKind::Monster => {
                    // TODO: Respawn a new monster at one of the level's
                    // spawn points.
                    log::debug!("Monster {e} died at {pos}, not respawning");
                }
            }

            e.unplace(r);
            r.ecs.queue_destroy(e);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Action, ScenarioStatus};

    const MAP: &str = "
        ######
        #@...#
        ######";

    #[test]
    fn monster_death() {
        let mut r = Runtime::fixture(MAP);
        let p = r.spawn_player(ivec2(1, 1)).unwrap();
        let m = r.spawn_monster(ivec2(2, 1)).unwrap();
        r.update();
        r.drain_msgs().for_each(drop);

        m.with_mut(&mut r, |h: &mut Health| **h = 0);
        r.update();

        assert!(!m.is_alive(&r));
        assert!(!r.level().is_blocked(ivec2(2, 1)));
        assert_eq!(
            r.drain_msgs().collect::<Vec<_>>(),
            vec![Msg::Death {
                who: 'm',
                pos: ivec2(2, 1)
            }]
        );
        assert!(matches!(r.scenario_status(), ScenarioStatus::Ongoing));

        // The cell is free to walk into.
        p.execute(&mut r, Action::Move(ivec2(1, 0)));
        assert_eq!(p.pos(&r), Some(ivec2(2, 1)));
    }

    #[test]
    fn player_death() {
        let mut r = Runtime::fixture(MAP);
        let p = r.spawn_player(ivec2(1, 1)).unwrap();
        r.update();

        p.with_mut(&mut r, |h: &mut Health| **h = -3);
        r.update();

        assert!(!p.is_alive(&r));
        assert!(r.player().is_none());
        assert!(!r.level().is_blocked(ivec2(1, 1)));
        assert_eq!(
            r.drain_msgs().collect::<Vec<_>>(),
            vec![
                Msg::Death {
                    who: '@',
                    pos: ivec2(1, 1)
                },
                Msg::GameOver
            ]
        );
        assert!(matches!(r.scenario_status(), ScenarioStatus::Lost));
    }

    #[test]
    fn healthy_survive() {
        let mut r = Runtime::fixture(MAP);
        let m = r.spawn_monster(ivec2(3, 1)).unwrap();
        m.with_mut(&mut r, |h: &mut Health| **h = 1);
        r.update();
        assert!(m.is_alive(&r));
        assert!(r.level().is_blocked(ivec2(3, 1)));
    }
}
