use std::fmt::Write;

use engine::prelude::*;

const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Render the level as text.
///
/// Unexplored cells are blank, remembered cells are dimmed and actors are
/// only drawn where the player can see them.
pub fn render(r: &Runtime, color: bool) -> String {
    let level = r.level();
    let (w, h) = (level.width() as usize, level.height() as usize);
    let mut grid: Vec<Vec<(char, bool)>> = vec![vec![(' ', false); w]; h];

    for (p, t) in level.tiles() {
        if t.seen {
            grid[p.y as usize][p.x as usize] = (t.glyph(), !t.visible);
        }
    }

    for (p, c) in r.visible_actors() {
        grid[p.y as usize][p.x as usize] = (c, false);
    }

    let mut ret = String::new();
    for row in grid {
        let mut dim = false;
        for (c, d) in row {
            if color && d != dim {
                ret.push_str(if d { DIM } else { RESET });
                dim = d;
            }
            ret.push(c);
        }
        if color && dim {
            ret.push_str(RESET);
        }
        // Trailing blanks are just noise on a terminal.
        let len = ret.trim_end_matches(' ').len();
        ret.truncate(len);
        ret.push('\n');
    }
    ret
}

pub fn status_line(r: &Runtime) -> String {
    let mut ret = String::new();
    match r.player_health() {
        Some(hp) => {
            let _ = write!(ret, "HP: {hp}  Turn: {}", r.turn());
        }
        None => ret.push_str("You are dead."),
    }
    ret
}
