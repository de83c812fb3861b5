//! Entities doing things

use crate::{ecs::*, prelude::*, Msg};

/// A deferred command for an entity.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Action {
    /// Do nothing for a turn.
    #[default]
    Pass,
    /// Step one cell in a direction, attacking whoever is in the way.
    Move(IVec2),
    /// Attack a specific entity.
    MeleeAttack(Entity),
}

/// Result of performing a single action.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Done,
    /// Perform this action right away in place of the original one.
    Chain(Action),
}

impl Entity {
    /// Perform an action and any actions it chains into.
    pub fn execute(&self, r: &mut impl AsMut<Runtime>, action: Action) {
        let r = r.as_mut();

        let mut action = action;
        while let Outcome::Chain(next) = self.perform(r, action) {
            log::debug!("{self}: {action:?} chains into {next:?}");
            action = next;
        }
    }

    /// Perform a single action step.
    pub fn perform(
        &self,
        r: &mut impl AsMut<Runtime>,
        action: Action,
    ) -> Outcome {
        let r = r.as_mut();
        if !self.is_alive(r) {
            return Outcome::Done;
        }

        match action {
            Action::Pass => Outcome::Done,
            Action::Move(dir) => self.step(r, dir),
            Action::MeleeAttack(target) => {
                self.attack(r, &target);
                Outcome::Done
            }
        }
    }

    fn step(&self, r: &mut impl AsMut<Runtime>, dir: IVec2) -> Outcome {
        let r = r.as_mut();

        let Some(pos) = self.pos(r) else {
            return Outcome::Done;
        };
        if dir == IVec2::ZERO {
            return Outcome::Done;
        }

        let target = pos + dir;
        if !r.level.in_bounds(target) {
            return Outcome::Done;
        }

        if r.level.is_blocked(target) {
            return match r.entity_at(target) {
                Some(mob) => Outcome::Chain(Action::MeleeAttack(mob)),
                // Bumped into a wall.
                None => Outcome::Done,
            };
        }

        self.place(r, target);
        if self.has(r, ComponentKind::Viewshed) {
            self.with_mut(r, |v: &mut Viewshed| v.dirty = true);
        }
        Outcome::Done
    }

    fn attack(&self, r: &mut impl AsMut<Runtime>, target: &Entity) {
        let r = r.as_mut();

        if target == self || !target.is_alive(r) {
            return;
        }

        let attacker = self.get::<Actor>(r);
        let defender = target.get::<Actor>(r);

        if !attacker.hits(&defender, &mut r.rng) {
            log::debug!("{self} misses {target}");
            return;
        }

        let damage = attacker.damage_against(&defender, &mut r.rng);
        r.send_msg(Msg::Hit {
            attacker: attacker.glyph(),
            defender: defender.glyph(),
            damage,
        });

        let health = target.with_mut(r, |h: &mut Health| {
            **h -= damage;
            h.0
        });
        r.send_msg(Msg::HealthLeft {
            who: defender.glyph(),
            health,
        });
    }
}
