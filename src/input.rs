use engine::prelude::*;

/// What the player asked for on a line of input.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Act(Action),
    Quit,
}

/// Map an input line to a command.
///
/// Unrecognized input is a wait.
pub fn parse(line: &str) -> Command {
    let dir = |x, y| Command::Act(Action::Move(ivec2(x, y)));

    match line.trim() {
        "h" | "a" => dir(-1, 0),
        "l" | "d" => dir(1, 0),
        "k" | "w" => dir(0, -1),
        "j" | "s" => dir(0, 1),
        "q" => Command::Quit,
        "" | "." => Command::Act(Action::Pass),
        other => {
            log::debug!("input: unknown command {other:?}");
            Command::Act(Action::Pass)
        }
    }
}
