//! Logic for revealing game terrain

use crate::{ecs::*, prelude::*, Level};

impl Level {
    /// Return the level indices of cells visible from `origin`.
    ///
    /// Obstructed tiles block sight, space outside the level is opaque and
    /// never shows up in the result.
    pub fn fov_from(
        &self,
        origin: IVec2,
        radius: i32,
        config: &::fov::Config,
    ) -> HashSet<usize> {
        config
            .visible_cells(origin, radius, |p: IVec2| {
                self.tile(p).is_some_and(|t| !t.obstructed())
            })
            .into_iter()
            .filter(|&p| self.in_bounds(p))
            .map(|p| self.index(p))
            .collect()
    }
}

/// Recompute fields of view that have gone stale.
pub struct VisibilitySystem {
    pub config: ::fov::Config,
}

impl VisibilitySystem {
    pub fn new(config: ::fov::Config) -> Self {
        VisibilitySystem { config }
    }
}

impl System for VisibilitySystem {
    fn requires(&self) -> &'static [ComponentKind] {
        &[ComponentKind::Position, ComponentKind::Viewshed]
    }

    fn update(&mut self, r: &mut Runtime, entities: &[Entity]) {
        for &e in entities {
            if !e.with(r, |v: &Viewshed| v.dirty) {
                continue;
            }

            let Some(pos) = e.pos(r) else { continue };
            let range = e.with(r, |v: &Viewshed| v.range);
            let visible = r.level.fov_from(pos, range, &self.config);

            e.with_mut(r, |v: &mut Viewshed| {
                v.visible = visible;
                v.dirty = false;
            });

            // The lit area is always the player's view, whoever's view just
            // changed.
            r.level.clear_visible();
            r.light_player_view();
        }
    }
}

impl Runtime {
    /// Mark the cells in the player's current viewshed as visible and seen.
    pub(crate) fn light_player_view(&mut self) {
        let Some(player) = self.player() else { return };
        let Some(view) = player.try_get::<Viewshed>(self) else {
            return;
        };
        for i in view.visible {
            self.level.reveal(i);
        }
    }
}
