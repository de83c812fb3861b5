//! Path planning over the level grid

use crate::{prelude::*, Level};

impl Level {
    /// Find a shortest path between two cells walking in the four cardinal
    /// directions.
    ///
    /// Only walls stop the search, cells that are currently occupied are
    /// still routed through. Returns the path with both endpoints included,
    /// or an empty path if the goal can't be reached.
    pub fn get_path(&self, start: IVec2, goal: IVec2) -> Vec<IVec2> {
        util::astar_path(
            &start,
            &goal,
            |&p| {
                self.tiles_near(p)
                    .filter(|(_, t)| !t.is_wall())
                    .map(|(p, _)| p)
                    .collect::<Vec<_>>()
            },
            |a, b| (*b - *a).taxi_len() as usize,
        )
    }
}
