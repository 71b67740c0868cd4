//! User-related models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// User presence status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Online,
    Offline,
    Away,
    Brb,
    Busy,
}

impl Presence {
    /// Statuses the local user can pick from the sidebar, in cycle order.
    pub const SELECTABLE: [Presence; 3] = [Presence::Online, Presence::Brb, Presence::Busy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Online => "online",
            Presence::Offline => "offline",
            Presence::Away => "away",
            Presence::Brb => "brb",
            Presence::Busy => "busy",
        }
    }

    /// Next selectable status after this one. Non-selectable values restart the cycle.
    pub fn next_selectable(self) -> Presence {
        let pos = Self::SELECTABLE.iter().position(|p| *p == self);
        match pos {
            Some(i) => Self::SELECTABLE[(i + 1) % Self::SELECTABLE.len()],
            None => Self::SELECTABLE[0],
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Presence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(Presence::Online),
            "offline" => Ok(Presence::Offline),
            "away" => Ok(Presence::Away),
            "brb" => Ok(Presence::Brb),
            "busy" => Ok(Presence::Busy),
            other => Err(format!(
                "Unknown status: {}. Use: online, offline, away, brb, busy",
                other
            )),
        }
    }
}

/// User profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Avatar image URL (terminal renders an initial instead)
    pub avatar: String,
    pub status: Presence,
    pub online: bool,
    /// Transient typing flag
    pub typing: bool,
}

impl User {
    /// First letter of the display name, used as a terminal avatar.
    pub fn initial(&self) -> char {
        self.name.chars().next().unwrap_or('?')
    }
}
