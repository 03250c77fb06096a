//! Doors, door sets, and the color palette

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::random::RandomSource;

/// Names the partner's two doors carry.
pub const PARTNER_DOOR_NAMES: [DoorName; 2] = [DoorName::A, DoorName::B];

/// Names the player's two doors carry.
pub const PLAYER_DOOR_NAMES: [DoorName; 2] = [DoorName::C, DoorName::D];

/// Fixed palette door colors are drawn from, without replacement per set.
pub const DOOR_COLOR_POOL: [&str; 7] = [
    "#503D3F", "#8C1C13", "#2A9D8F", "#264653", "#E76F51", "#457B9D", "#6A4C93",
];

/// A door name from the fixed vocabulary.
///
/// Doors A and B belong to the partner, C and D to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorName {
    A,
    B,
    C,
    D,
}

impl DoorName {
    /// Display label, e.g. `"Door A"`.
    pub fn label(self) -> &'static str {
        match self {
            DoorName::A => "Door A",
            DoorName::B => "Door B",
            DoorName::C => "Door C",
            DoorName::D => "Door D",
        }
    }
}

impl fmt::Display for DoorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DoorName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Door A" => Ok(DoorName::A),
            "Door B" => Ok(DoorName::B),
            "Door C" => Ok(DoorName::C),
            "Door D" => Ok(DoorName::D),
            other => Err(format!("Unknown door name: {}", other)),
        }
    }
}

/// A single door: fixed name, per-round color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub name: DoorName,
    pub color: String,
}

/// An ordered pair of doors for one role.
///
/// Names are fixed per role; colors are re-drawn each round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSet {
    doors: [Door; 2],
}

impl DoorSet {
    /// Build a set with the given names and two distinct colors drawn
    /// without replacement from [`DOOR_COLOR_POOL`]. Consumes two draws.
    pub fn sample(names: [DoorName; 2], rng: &mut dyn RandomSource) -> Self {
        let first = rng.pick(DOOR_COLOR_POOL.len());
        let mut second = rng.pick(DOOR_COLOR_POOL.len() - 1);
        if second >= first {
            second += 1;
        }
        Self {
            doors: [
                Door { name: names[0], color: DOOR_COLOR_POOL[first].to_string() },
                Door { name: names[1], color: DOOR_COLOR_POOL[second].to_string() },
            ],
        }
    }

    pub fn doors(&self) -> &[Door; 2] {
        &self.doors
    }

    pub fn names(&self) -> [DoorName; 2] {
        [self.doors[0].name, self.doors[1].name]
    }

    pub fn contains(&self, name: DoorName) -> bool {
        self.doors.iter().any(|door| door.name == name)
    }

    /// The member whose name differs from `name`.
    ///
    /// With exactly two members this is always well-defined: for a name
    /// outside the set the first member is returned.
    pub fn other(&self, name: DoorName) -> DoorName {
        if self.doors[0].name == name {
            self.doors[1].name
        } else {
            self.doors[0].name
        }
    }
}
