pub use crate::{
    Action, Entity, Level, Msg, Runtime, ScenarioStatus, Tile, Turn,
};
pub use glam::{ivec2, IVec2};
pub use util::{HashMap, HashSet, IndexSet, VecExt, DIR_4};
