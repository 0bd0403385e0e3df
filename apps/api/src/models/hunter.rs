use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hunter rank tier. Variants are declared weakest first so `Ord` follows the tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    E,
    D,
    C,
    B,
    A,
    S,
    SSS,
}

impl Rank {
    pub const ALL: [Rank; 7] = [
        Rank::E,
        Rank::D,
        Rank::C,
        Rank::B,
        Rank::A,
        Rank::S,
        Rank::SSS,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::E => "E",
            Rank::D => "D",
            Rank::C => "C",
            Rank::B => "B",
            Rank::A => "A",
            Rank::S => "S",
            Rank::SSS => "SSS",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Rank", self.as_str())
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rank::ALL
            .into_iter()
            .find(|rank| rank.as_str() == s)
            .ok_or_else(|| format!("unknown rank tier '{s}'"))
    }
}

/// A registered hunter as every read path sees it. The password hash is not
/// part of this type; only the credential store ever touches it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hunter {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Blob-store key of the avatar image, empty when none was uploaded.
    pub avatar: String,
    pub rank: Rank,
    pub level: i32,
    pub experience: i32,
    pub is_active: bool,
    pub last_login: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new hunter; `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewHunter {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Allow-listed profile fields. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}
