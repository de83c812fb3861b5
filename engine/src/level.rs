//! Static level grid

use anyhow::{bail, ensure, Result};

use crate::{prelude::*, Tile};

/// Rectangular room carved out of solid rock.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Room { x, y, w, h }
    }

    /// Center cell, rounded towards the bottom right on even sizes.
    pub fn center(&self) -> IVec2 {
        ivec2(self.x + (self.w + 1) / 2, self.y + (self.h + 1) / 2)
    }

    /// Rooms that touch along an edge also count as intersecting, so there's
    /// always at least one wall between separate rooms.
    pub fn intersects(&self, other: &Room) -> bool {
        !(self.x + self.w < other.x
            || other.x + other.w < self.x
            || self.y + self.h < other.y
            || other.y + other.h < self.y)
    }
}

/// Fixed-size grid of tiles with the level's entry and spawn points.
#[derive(Clone, Debug)]
pub struct Level {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    pub rooms: Vec<Room>,
    pub entrance: IVec2,
    pub spawn_points: Vec<IVec2>,
}

impl Level {
    /// Create a level filled with solid wall.
    ///
    /// Fails on negative dimensions or when the cell count doesn't fit in an
    /// `i32`.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        ensure!(
            width >= 0 && height >= 0,
            "Level::new: bad dimensions {width}x{height}"
        );
        let Some(n) = width.checked_mul(height) else {
            bail!("Level::new: {width}x{height} is too large");
        };

        Ok(Level {
            width,
            height,
            tiles: vec![Tile::wall(); n as usize],
            rooms: Vec::new(),
            entrance: Default::default(),
            spawn_points: Vec::new(),
        })
    }

    /// Parse a level from an ASCII map.
    ///
    /// `#` is wall, `.` is floor, `@` is the floor cell where the player
    /// enters and `m` is a floor cell where a monster spawns. Leading and
    /// trailing whitespace on lines and blank lines are ignored.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let Some(first) = lines.first() else {
            bail!("Level::from_ascii: empty map");
        };
        let width = first.chars().count() as i32;
        let height = lines.len() as i32;

        let mut ret = Level::new(width, height)?;
        let mut entrance = None;

        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() as i32 != width {
                bail!("Level::from_ascii: line {} has a bad length", y + 1);
            }

            for (x, c) in line.chars().enumerate() {
                let p = ivec2(x as i32, y as i32);
                match c {
                    '#' => continue,
                    '.' => {}
                    '@' => {
                        if entrance.is_some() {
                            bail!("Level::from_ascii: multiple entrances");
                        }
                        entrance = Some(p);
                    }
                    'm' => ret.spawn_points.push(p),
                    c => bail!("Level::from_ascii: unknown glyph {c:?}"),
                }
                if let Some(t) = ret.tile_mut(p) {
                    t.convert_to_floor();
                }
            }
        }

        let Some(entrance) = entrance else {
            bail!("Level::from_ascii: no entrance");
        };
        ret.entrance = entrance;

        Ok(ret)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, p: IVec2) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }

    /// Index of the cell in row-major order.
    ///
    /// Only meaningful for in-bounds points.
    pub fn index(&self, p: IVec2) -> usize {
        (p.y * self.width + p.x) as usize
    }

    /// Inverse of `index`.
    pub fn point(&self, i: usize) -> IVec2 {
        let i = i as i32;
        ivec2(i % self.width, i / self.width)
    }

    pub fn tile(&self, p: IVec2) -> Option<&Tile> {
        if !self.in_bounds(p) {
            return None;
        }
        self.tiles.get(self.index(p))
    }

    pub fn tile_mut(&mut self, p: IVec2) -> Option<&mut Tile> {
        if !self.in_bounds(p) {
            return None;
        }
        let i = self.index(p);
        self.tiles.get_mut(i)
    }

    /// Iterate all tiles with their positions in index order.
    pub fn tiles(&self) -> impl Iterator<Item = (IVec2, &Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| (self.point(i), t))
    }

    pub fn block(&mut self, p: IVec2) {
        if let Some(t) = self.tile_mut(p) {
            t.blocked = true;
        }
    }

    pub fn unblock(&mut self, p: IVec2) {
        if let Some(t) = self.tile_mut(p) {
            t.blocked = false;
        }
    }

    /// Out-of-bounds cells count as blocked.
    pub fn is_blocked(&self, p: IVec2) -> bool {
        self.tile(p).is_none_or(|t| t.blocked)
    }

    /// In-bounds orthogonal neighbors, in west, east, north, south order.
    pub fn tiles_near(
        &self,
        p: IVec2,
    ) -> impl Iterator<Item = (IVec2, &Tile)> + '_ {
        DIR_4
            .iter()
            .map(move |&d| p + d)
            .filter_map(move |p| self.tile(p).map(|t| (p, t)))
    }

    /// Clear the transient visibility flags of the whole level.
    pub fn clear_visible(&mut self) {
        for t in self.tiles.iter_mut() {
            t.visible = false;
        }
    }

    /// Mark the cell at `i` as currently visible and seen.
    pub fn reveal(&mut self, i: usize) {
        if let Some(t) = self.tiles.get_mut(i) {
            t.seen = true;
            t.visible = true;
        }
    }

    /// Turn the room's area into floor and add it to the room list.
    pub fn carve_room(&mut self, room: Room) {
        for y in room.y..room.y + room.h {
            for x in room.x..room.x + room.w {
                if let Some(t) = self.tile_mut(ivec2(x, y)) {
                    t.convert_to_floor();
                }
            }
        }
        self.rooms.push(room);
    }

    /// Carve a horizontal corridor between columns `x1` and `x2` inclusive.
    pub fn carve_h_tunnel(&mut self, x1: i32, x2: i32, y: i32) {
        for x in x1.min(x2)..=x1.max(x2) {
            if let Some(t) = self.tile_mut(ivec2(x, y)) {
                t.convert_to_floor();
            }
        }
    }

    /// Carve a vertical corridor between rows `y1` and `y2` inclusive.
    pub fn carve_v_tunnel(&mut self, y1: i32, y2: i32, x: i32) {
        for y in y1.min(y2)..=y1.max(y2) {
            if let Some(t) = self.tile_mut(ivec2(x, y)) {
                t.convert_to_floor();
            }
        }
    }

    /// Check that the entrance and spawn points are standable floor.
    pub fn validate(&self) -> Result<()> {
        let is_floor =
            |p: IVec2| self.tile(p).is_some_and(|t| !t.is_wall());

        ensure!(
            is_floor(self.entrance),
            "Level: entrance {} is not on floor",
            self.entrance
        );

        for &p in &self.spawn_points {
            ensure!(is_floor(p), "Level: spawn point {p} is not on floor");
            ensure!(
                p != self.entrance,
                "Level: spawn point {p} overlaps entrance"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;

    use super::*;

    const MAP: &str = "
        #######
        #@....#
        #..#..#
        #....m#
        #######";

    #[test]
    fn parse_ascii() {
        let level = Level::from_ascii(MAP).unwrap();
        assert_eq!(level.width(), 7);
        assert_eq!(level.height(), 5);
        assert_eq!(level.entrance, ivec2(1, 1));
        assert_eq!(level.spawn_points, vec![ivec2(5, 3)]);

        assert!(level.tile(ivec2(0, 0)).unwrap().is_wall());
        assert!(level.tile(ivec2(3, 2)).unwrap().obstructed());
        assert!(!level.tile(ivec2(1, 1)).unwrap().is_wall());
        assert!(!level.is_blocked(ivec2(5, 3)));
        assert!(level.validate().is_ok());
    }

    #[test]
    fn bad_ascii() {
        assert!(Level::from_ascii("").is_err());
        assert!(Level::from_ascii("###\n#.#\n###").is_err());
        assert!(Level::from_ascii("#@#\n#.\n###").is_err());
        assert!(Level::from_ascii("#@#\n#x#\n###").is_err());
        assert!(Level::from_ascii("#@#\n#@#\n###").is_err());
    }

    #[quickcheck]
    fn index_bijection(w: u8, h: u8, i: u16) -> bool {
        let (w, h) = (w as i32 % 40 + 1, h as i32 % 40 + 1);
        let level = Level::new(w, h).unwrap();
        let i = i as usize % (w * h) as usize;
        let p = level.point(i);
        level.in_bounds(p) && level.index(p) == i
    }

    #[test]
    fn bad_dimensions() {
        assert!(Level::new(70_000, 70_000).is_err());
        assert!(Level::new(-1, 5).is_err());

        let level = Level::new(0, 0).unwrap();
        assert!(!level.in_bounds(ivec2(0, 0)));
    }

    #[test]
    fn bounds() {
        let level = Level::new(4, 3).unwrap();
        assert!(level.in_bounds(ivec2(3, 2)));
        assert!(!level.in_bounds(ivec2(4, 2)));
        assert!(!level.in_bounds(ivec2(-1, 0)));
        assert!(level.tile(ivec2(0, 3)).is_none());
        assert!(level.is_blocked(ivec2(-1, -1)));
    }

    #[test]
    fn neighbors() {
        let level = Level::new(5, 5).unwrap();
        let near: Vec<IVec2> =
            level.tiles_near(ivec2(2, 2)).map(|(p, _)| p).collect();
        assert_eq!(
            near,
            vec![ivec2(1, 2), ivec2(3, 2), ivec2(2, 1), ivec2(2, 3)]
        );

        // Corner cell only has the in-bounds neighbors.
        let near: Vec<IVec2> =
            level.tiles_near(ivec2(0, 0)).map(|(p, _)| p).collect();
        assert_eq!(near, vec![ivec2(1, 0), ivec2(0, 1)]);
    }

    #[test]
    fn rooms() {
        let a = Room::new(1, 1, 4, 3);
        assert_eq!(a.center(), ivec2(3, 3));

        assert!(a.intersects(&Room::new(3, 2, 4, 4)));
        // Touching counts.
        assert!(a.intersects(&Room::new(5, 1, 2, 2)));
        assert!(!a.intersects(&Room::new(6, 1, 2, 2)));

        let mut level = Level::new(10, 10).unwrap();
        level.carve_room(a);
        level.carve_h_tunnel(4, 8, 2);
        level.carve_v_tunnel(2, 7, 8);
        assert_eq!(level.rooms, vec![a]);
        assert!(!level.tile(ivec2(1, 1)).unwrap().is_wall());
        assert!(level.tile(ivec2(0, 0)).unwrap().is_wall());
        assert!(!level.tile(ivec2(8, 2)).unwrap().is_wall());
        assert!(!level.tile(ivec2(8, 7)).unwrap().is_wall());
        assert!(level.tile(ivec2(8, 8)).unwrap().is_wall());
    }

    #[test]
    fn visibility_flags() {
        let mut level = Level::from_ascii(MAP).unwrap();
        let i = level.index(ivec2(2, 1));
        level.reveal(i);
        assert!(level.tile(ivec2(2, 1)).unwrap().visible);

        level.clear_visible();
        let t = level.tile(ivec2(2, 1)).unwrap();
        assert!(t.seen && !t.visible);
    }

    #[test]
    fn invalid_spawn() {
        let mut level = Level::from_ascii(MAP).unwrap();
        level.spawn_points.push(ivec2(0, 0));
        assert!(level.validate().is_err());
    }
}
