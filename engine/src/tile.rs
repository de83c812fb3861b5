/// Terrain type of a map cell.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub enum TileKind {
    #[default]
    Wall,
    Floor,
}

use TileKind::*;

impl TileKind {
    pub fn glyph(self) -> char {
        match self {
            Wall => '#',
            Floor => '.',
        }
    }
}

/// A single level map cell.
///
/// `blocked` tracks occupancy and changes whenever something moves.
/// `obstructed` blocks line of sight and is fixed once the level has been
/// carved. `seen` only ever goes from false to true, `visible` is rebuilt on
/// every visibility pass.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Tile {
    kind: TileKind,
    pub blocked: bool,
    obstructed: bool,
    pub seen: bool,
    pub visible: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Tile::wall()
    }
}

impl Tile {
    pub fn wall() -> Self {
        Tile {
            kind: Wall,
            blocked: true,
            obstructed: true,
            seen: false,
            visible: false,
        }
    }

    pub fn floor() -> Self {
        Tile {
            kind: Floor,
            blocked: false,
            obstructed: false,
            seen: false,
            visible: false,
        }
    }

    /// Turn a wall into open floor during level carving.
    pub fn convert_to_floor(&mut self) {
        if self.kind == Wall {
            *self = Tile {
                seen: self.seen,
                visible: self.visible,
                ..Tile::floor()
            };
        }
    }

    pub fn is_wall(&self) -> bool {
        self.kind == Wall
    }

    pub fn obstructed(&self) -> bool {
        self.obstructed
    }

    pub fn glyph(&self) -> char {
        self.kind.glyph()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn carving() {
        let mut t = Tile::default();
        assert!(t.is_wall() && t.blocked && t.obstructed());

        t.convert_to_floor();
        assert_eq!(t, Tile::floor());
        assert_eq!(t.glyph(), '.');

        // Memory of the cell survives carving.
        let mut t = Tile::wall();
        t.seen = true;
        t.convert_to_floor();
        assert!(t.seen && !t.blocked && !t.is_wall());

        // Converting floor again leaves occupancy alone.
        t.blocked = true;
        t.convert_to_floor();
        assert!(t.blocked);
    }
}
