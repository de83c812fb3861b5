//! Room and corridor level generation.

use anyhow::{bail, Result};
use engine::{prelude::*, Room};
use rand::Rng;
use util::RngExt;

const MIN_ROOM_SIZE: i32 = 3;
const MAX_ROOM_SIZE: i32 = 10;

/// Scatter rooms at random and join each to the previous one with a
/// corridor.
pub struct SimpleLevelBuilder {
    width: i32,
    height: i32,
    max_rooms: usize,
}

impl SimpleLevelBuilder {
    pub fn new(width: i32, height: i32, max_rooms: usize) -> Self {
        SimpleLevelBuilder {
            width,
            height,
            max_rooms,
        }
    }

    pub fn build(&self, rng: &mut impl Rng) -> Result<Level> {
        if self.width < MIN_ROOM_SIZE + 2 || self.height < MIN_ROOM_SIZE + 2 {
            bail!(
                "SimpleLevelBuilder: {}x{} is too small",
                self.width,
                self.height
            );
        }

        let mut level = Level::new(self.width, self.height)?;

        for _ in 0..self.max_rooms {
            let w = rng.random_range(MIN_ROOM_SIZE..=MAX_ROOM_SIZE);
            let h = rng.random_range(MIN_ROOM_SIZE..=MAX_ROOM_SIZE);
            // Leave a wall border around the whole level.
            let (w, h) = (w.min(self.width - 2), h.min(self.height - 2));
            let x = rng.random_range(1..=self.width - w - 1);
            let y = rng.random_range(1..=self.height - h - 1);
            let room = Room::new(x, y, w, h);

            if level.rooms.iter().any(|r| r.intersects(&room)) {
                continue;
            }

            if let Some(prev) = level.rooms.last() {
                let (a, b) = (prev.center(), room.center());
                if rng.one_chance_in(2) {
                    level.carve_h_tunnel(a.x, b.x, a.y);
                    level.carve_v_tunnel(a.y, b.y, b.x);
                } else {
                    level.carve_v_tunnel(a.y, b.y, a.x);
                    level.carve_h_tunnel(a.x, b.x, b.y);
                }
            }
            level.carve_room(room);
        }

        let Some(first) = level.rooms.first() else {
            bail!("SimpleLevelBuilder: failed to place any rooms");
        };
        level.entrance = first.center();
        level.spawn_points =
            level.rooms.iter().skip(1).map(Room::center).collect();

        log::debug!(
            "SimpleLevelBuilder: {} rooms on a {}x{} level",
            level.rooms.len(),
            self.width,
            self.height
        );
        Ok(level)
    }
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[quickcheck]
    fn everything_reachable(seed: u64) -> bool {
        let mut rng = util::srng(&seed);
        let level =
            SimpleLevelBuilder::new(60, 40, 30).build(&mut rng).unwrap();

        level.validate().is_ok()
            && level.spawn_points.iter().all(|&p| {
                !level.get_path(level.entrance, p).is_empty()
            })
    }

    #[test]
    fn rooms_stay_apart() {
        let mut rng = util::srng("apart");
        let level =
            SimpleLevelBuilder::new(80, 50, 40).build(&mut rng).unwrap();
        let rooms = &level.rooms;
        assert!(!rooms.is_empty());
        for (i, a) in rooms.iter().enumerate() {
            for b in &rooms[i + 1..] {
                assert!(!a.intersects(b));
            }
            assert!(a.x >= 1 && a.y >= 1);
            assert!(a.x + a.w < level.width() && a.y + a.h < level.height());
        }
    }

    #[test]
    fn too_small() {
        let mut rng = util::srng("tiny");
        assert!(SimpleLevelBuilder::new(4, 40, 10).build(&mut rng).is_err());
    }

    #[test]
    fn too_large() {
        let mut rng = util::srng("huge");
        let builder = SimpleLevelBuilder::new(70_000, 70_000, 10);
        assert!(builder.build(&mut rng).is_err());
    }
}
