//! Creature stats and combat rolls.
use rand::Rng;
use util::RngExt;

use crate::ecs::{Actor, ActorKind};

/// Dice rolled for each stat when a creature is created.
const STAT_DICE: usize = 8;

/// How many of the lowest stat dice are kept.
const STAT_KEEP: usize = 2;

const DIE: i32 = 10;

/// Roll a single stat, ends up between 4 and 13 with low values favored.
fn roll_stat(rng: &mut (impl Rng + ?Sized)) -> i32 {
    let mut dice = rng.roll_dice(STAT_DICE, DIE);
    dice.sort_unstable();
    let sum: i32 = dice.iter().take(STAT_KEEP).sum();
    // Halve rounding half up.
    (sum + 1) / 2 + 3
}

impl Actor {
    /// Create a creature with freshly rolled stats.
    pub fn roll(kind: ActorKind, rng: &mut (impl Rng + ?Sized)) -> Self {
        Actor {
            kind,
            strength: roll_stat(rng),
            endurance: roll_stat(rng),
            agility: roll_stat(rng),
            luck: roll_stat(rng),
        }
    }

    pub fn max_health(&self) -> i32 {
        self.endurance + self.luck
    }

    pub fn glyph(&self) -> char {
        match self.kind {
            ActorKind::Player => '@',
            ActorKind::Monster => 'm',
        }
    }

    /// Opposed agility roll, attacker must beat the defender outright.
    pub fn hits(
        &self,
        defender: &Actor,
        rng: &mut (impl Rng + ?Sized),
    ) -> bool {
        let attack = rng.roll_pool(self.agility.max(0) as usize, DIE);
        let evade = rng.roll_pool(defender.agility.max(0) as usize, DIE);
        attack > evade
    }

    /// Damage of a landed blow, the gap between attacker's strength and
    /// defender's endurance rolls.
    pub fn damage_against(
        &self,
        defender: &Actor,
        rng: &mut (impl Rng + ?Sized),
    ) -> i32 {
        let strength = rng.roll_pool(self.strength.max(0) as usize, DIE);
        let endurance =
            rng.roll_pool(defender.endurance.max(0) as usize, DIE);
        (strength - endurance).abs()
    }
}
