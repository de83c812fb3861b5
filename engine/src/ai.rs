//! Monsters figuring out what to do on their own.

use crate::{ecs::*, prelude::*};

/// Monsters that can see the player walk towards them.
#[derive(Copy, Clone, Default, Debug)]
pub struct MonsterAi;

impl System for MonsterAi {
    fn requires(&self) -> &'static [ComponentKind] {
        &[
            ComponentKind::Monster,
            ComponentKind::Position,
            ComponentKind::Viewshed,
            ComponentKind::ActionQueue,
        ]
    }

    fn update(&mut self, r: &mut Runtime, entities: &[Entity]) {
        let target = r.player().and_then(|p| p.pos(r));

        for &e in entities {
            let action = match target {
                Some(goal) => e.decide(r, goal).unwrap_or_default(),
                None => Action::Pass,
            };
            e.with_mut(r, |q: &mut ActionQueue| **q = Some(action));
        }
    }
}

impl Entity {
    /// Pick the next step towards a visible target.
    fn decide(&self, r: &impl AsRef<Runtime>, goal: IVec2) -> Option<Action> {
        let r = r.as_ref();
        let pos = self.pos(r)?;

        let idx = r.level.index(goal);
        if !self.with(r, |v: &Viewshed| v.can_see(idx)) {
            return None;
        }

        let path = r.level.get_path(pos, goal);
        let next = path.get(1)?;
        Some(Action::Move(*next - pos))
    }
}
