//! Game event messages for the UI layer

use std::fmt;

use crate::prelude::*;

/// Things that happened that the player should be told about.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Msg {
    /// Attacker landed a blow on the defender.
    Hit {
        attacker: char,
        defender: char,
        damage: i32,
    },

    /// Remaining health after a hit.
    HealthLeft { who: char, health: i32 },

    /// Something died at the given position.
    Death { who: char, pos: IVec2 },

    /// The player died.
    GameOver,
}

impl fmt::Display for Msg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Msg::Hit {
                attacker,
                defender,
                damage,
            } => write!(
                f,
                "{attacker} hits {defender} for {damage} points of damage"
            ),
            Msg::HealthLeft { who, health } => {
                write!(f, "{who} is at {health} health")
            }
            Msg::Death { who, .. } => write!(f, "{who} has died"),
            Msg::GameOver => write!(f, "Game Over."),
        }
    }
}

impl Runtime {
    pub(crate) fn send_msg(&mut self, msg: Msg) {
        log::info!("{msg}");
        self.msgs.push_back(msg);
    }

    /// Take all messages sent since the last call.
    pub fn drain_msgs(&mut self) -> impl Iterator<Item = Msg> + '_ {
        self.msgs.drain(..)
    }
}
