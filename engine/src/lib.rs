//! Game logic layer machinery.

/// How far can the player see.
pub const FOV_RADIUS: i32 = 8;

/// How far can monsters see.
pub const MONSTER_FOV_RADIUS: i32 = 8;

mod action;
pub use action::{Action, Outcome};

mod ai;
pub use ai::MonsterAi;

pub mod ecs;

mod entity;
pub use entity::Entity;

mod fov;
pub use crate::fov::VisibilitySystem;

mod level;
pub use level::{Level, Room};

mod mob;

mod msg;
pub use msg::Msg;

mod pathing;

pub mod prelude;

mod runtime;
pub use runtime::{Runtime, Turn};

mod samsara;
pub use samsara::Samsara;

mod tile;
pub use tile::{Tile, TileKind};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScenarioStatus {
    Ongoing,
    Lost,
}

/// Engine tunables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub player_view_radius: i32,
    pub monster_view_radius: i32,
    pub fov: ::fov::Config,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            player_view_radius: FOV_RADIUS,
            monster_view_radius: MONSTER_FOV_RADIUS,
            fov: Default::default(),
        }
    }
}
