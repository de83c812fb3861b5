use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::Result;
use engine::prelude::*;

use crate::{input, view};

/// Play the game on stdin and stdout until the player quits or dies.
pub fn run(mut r: Runtime) -> Result<()> {
    let color = io::stdout().is_terminal();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        advance(&mut r);
        draw(&mut r, color)?;

        if matches!(r.scenario_status(), ScenarioStatus::Lost) {
            return Ok(());
        }

        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            log::info!("run: end of input");
            return Ok(());
        };

        match input::parse(&line?) {
            input::Command::Quit => return Ok(()),
            input::Command::Act(action) => {
                if let Some(player) = r.player() {
                    r.queue_action(player, action);
                }
            }
        }
    }
}

/// Run the scheduler until the player needs to make a decision.
fn advance(r: &mut Runtime) {
    loop {
        match r.tick() {
            Turn::Acted(_) => {}
            Turn::AwaitingInput(_) | Turn::Idle | Turn::GameOver => break,
        }
    }
}

fn draw(r: &mut Runtime, color: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    for msg in r.drain_msgs() {
        writeln!(out, "{msg}")?;
    }
    write!(out, "{}", view::render(r, color))?;
    writeln!(out, "{}", view::status_line(r))?;
    Ok(())
}
