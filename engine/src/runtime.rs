use std::collections::VecDeque;

use anyhow::{bail, Result};
use util::GameRng;

use crate::{
    ai::MonsterAi, ecs::*, prelude::*, samsara::Samsara, Config, Level, Msg,
    VisibilitySystem,
};

/// What happened on a scheduler tick.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Turn {
    /// The entity performed its queued action.
    Acted(Entity),
    /// It's the player's turn and no command has been queued.
    AwaitingInput(Entity),
    /// There's nobody left to act.
    Idle,
    /// The player is dead.
    GameOver,
}

/// Main data container for game engine runtime.
pub struct Runtime {
    pub(crate) ecs: Ecs,
    pub(crate) level: Level,
    pub(crate) player: Option<Entity>,
    pub(crate) rng: GameRng,
    config: Config,
    turn: u64,
    pub(crate) msgs: VecDeque<Msg>,
}

impl AsRef<Runtime> for Runtime {
    fn as_ref(&self) -> &Runtime {
        self
    }
}

impl AsMut<Runtime> for Runtime {
    fn as_mut(&mut self) -> &mut Runtime {
        self
    }
}

impl Runtime {
    /// Set up a game on the level with the player at the entrance and a
    /// monster on every spawn point.
    pub fn new(level: Level, rng: GameRng, config: Config) -> Result<Self> {
        level.validate()?;

        let entrance = level.entrance;
        let spawn_points = level.spawn_points.clone();

        let mut ret = Runtime::with_level(level, rng, config);
        ret.spawn_player(entrance)?;

        for pos in spawn_points {
            if let Err(e) = ret.spawn_monster(pos) {
                log::warn!("Runtime::new: skipping monster: {e}");
            }
        }

        // Get the initial field of view in place.
        ret.update();

        Ok(ret)
    }

    /// Create a runtime with systems set up but no entities.
    pub fn with_level(level: Level, rng: GameRng, config: Config) -> Self {
        let mut ecs = Ecs::default();
        ecs.add_system(VisibilitySystem::new(config.fov));
        ecs.add_system(MonsterAi);
        ecs.add_system(Samsara);

        Runtime {
            ecs,
            level,
            player: None,
            rng,
            config,
            turn: 0,
            msgs: Default::default(),
        }
    }

    pub fn spawn_player(&mut self, pos: IVec2) -> Result<Entity> {
        if self.player().is_some() {
            bail!("Runtime::spawn_player: player already exists");
        }
        let e = self.spawn_actor(
            ActorKind::Player,
            pos,
            self.config.player_view_radius,
        )?;
        self.player = Some(e);
        Ok(e)
    }

    pub fn spawn_monster(&mut self, pos: IVec2) -> Result<Entity> {
        self.spawn_actor(
            ActorKind::Monster,
            pos,
            self.config.monster_view_radius,
        )
    }

    fn spawn_actor(
        &mut self,
        kind: ActorKind,
        pos: IVec2,
        view_radius: i32,
    ) -> Result<Entity> {
        if self.level.is_blocked(pos) {
            bail!("Runtime::spawn_actor: {pos} is not free");
        }

        let actor = Actor::roll(kind, &mut self.rng);
        let e = self.ecs.add_entity();
        e.set(self, Health(actor.max_health()));
        e.set(self, actor);
        e.set(self, Viewshed::new(view_radius));
        e.set(self, ActionQueue::default());
        e.place(self, pos);

        log::debug!("Runtime: spawned {kind:?} {e} at {pos}");
        Ok(e)
    }

    pub fn player(&self) -> Option<Entity> {
        self.player.filter(|e| e.is_alive(self))
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Number of actions performed so far.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Entities that take turns, in turn order.
    pub fn actors(&self) -> Vec<Entity> {
        self.ecs
            .get_all_components(ComponentKind::ActionQueue)
            .map(|(e, _)| e)
            .collect()
    }

    /// Return the entity standing on a cell.
    pub fn entity_at(&self, pos: IVec2) -> Option<Entity> {
        self.ecs
            .get_all_components(ComponentKind::Position)
            .find_map(|(e, c)| {
                c.get::<&Position>()
                    .is_some_and(|p| p.0 == pos)
                    .then_some(e)
            })
    }

    /// Give an entity its next action, replacing any earlier one.
    pub fn queue_action(&mut self, e: Entity, action: Action) {
        if !e.has(self, ComponentKind::ActionQueue) {
            log::warn!("Runtime::queue_action: {e} can't take actions");
            return;
        }
        e.with_mut(self, |q: &mut ActionQueue| **q = Some(action));
    }

    /// Run every system once in registration order, then destroy the
    /// entities that died during the pass.
    pub fn update(&mut self) {
        for i in 0..self.ecs.system_count() {
            let Some((mut system, entities)) = self.ecs.checkout_system(i)
            else {
                continue;
            };
            system.update(self, &entities);
            self.ecs.return_system(i, system);
        }

        for e in self.ecs.flush_destroyed() {
            log::debug!("Runtime::update: destroyed {e}");
        }
    }

    /// Advance the game by one actor's turn.
    ///
    /// Actors take turns round-robin. When the player comes up without a
    /// queued command, nothing happens and the player's turn stays pending
    /// until a command is queued. Other actors with nothing queued pass.
    pub fn tick(&mut self) -> Turn {
        if self.player.is_some() && self.player().is_none() {
            return Turn::GameOver;
        }

        let actors = self.actors();
        if actors.is_empty() {
            return Turn::Idle;
        }
        let e = actors[(self.turn % actors.len() as u64) as usize];

        let Some(action) = e.with_mut(self, |q: &mut ActionQueue| q.take())
        else {
            if e.is_player(self) {
                return Turn::AwaitingInput(e);
            }
            self.end_turn();
            return Turn::Acted(e);
        };

        e.execute(self, action);
        self.end_turn();
        Turn::Acted(e)
    }

    fn end_turn(&mut self) {
        self.update();
        self.turn += 1;
    }

    /// Return whether the overall game scenario is still going or if it has
    /// ended in defeat.
    pub fn scenario_status(&self) -> ScenarioStatus {
        if self.player().is_none() {
            return ScenarioStatus::Lost;
        }

        ScenarioStatus::Ongoing
    }

    /// Remaining health of the player.
    pub fn player_health(&self) -> Option<i32> {
        self.player()?.try_get::<Health>(self).map(|h| h.0)
    }

    /// Actors standing where the player can currently see, with their
    /// display glyphs.
    pub fn visible_actors(&self) -> Vec<(IVec2, char)> {
        self.ecs
            .get_all_components(ComponentKind::Actor)
            .filter_map(|(e, _)| {
                let pos = e.pos(self)?;
                let tile = self.level.tile(pos)?;
                tile.visible.then(|| (pos, e.glyph(self)))
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn fixture(map: &str) -> Runtime {
        let level = Level::from_ascii(map).unwrap();
        Runtime::with_level(level, util::srng("fixture"), Default::default())
    }
}
