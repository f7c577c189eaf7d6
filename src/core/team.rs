//! Teams and their elemental affinities

use crate::LudoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four competing teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Team {
    pub const ALL: [Team; 4] = [Team::Red, Team::Green, Team::Blue, Team::Yellow];

    /// Affinity used to decide whether an offer is native to this team
    pub fn element(&self) -> Element {
        match self {
            Team::Red => Element::Fire,
            Team::Green => Element::Earth,
            Team::Blue => Element::Water,
            Team::Yellow => Element::Air,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Green => "green",
            Team::Blue => "blue",
            Team::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = LudoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "red" => Ok(Team::Red),
            "green" => Ok(Team::Green),
            "blue" => Ok(Team::Blue),
            "yellow" => Ok(Team::Yellow),
            _ => Err(LudoError::UnknownTeam(s.to_string())),
        }
    }
}

/// Elemental affinity tag carried by teams and offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Earth,
    Fire,
    Air,
    Water,
}
