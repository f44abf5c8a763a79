//! Room data models.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Characters used in join codes.
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Join code length
pub const CODE_LENGTH: usize = 6;

/// Short code players share to join a room.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Random code over `A-Z0-9`. Uniqueness is checked by the manager.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let code = (0..CODE_LENGTH)
            .map(|_| char::from(CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())]))
            .collect();
        Self(code)
    }

    /// Normalizes user input: surrounding whitespace is dropped and letters
    /// uppercased.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomCode {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Opaque credential identifying one seat in one room.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlayerToken(Uuid);

impl PlayerToken {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl fmt::Display for PlayerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Demographic details collected when a participant starts or joins.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ParticipantInfo {
    pub name: String,
    pub age: String,
    pub mobile: String,
    pub nationality: String,
    pub gender: String,
    pub education: String,
}

impl ParticipantInfo {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// `(label, value)` pairs in display order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("Name", &self.name),
            ("Age", &self.age),
            ("Mobile", &self.mobile),
            ("Nationality", &self.nationality),
            ("Gender", &self.gender),
            ("Education", &self.education),
        ]
    }
}

/// Room lifecycle
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// Host seated, waiting for the second participant
    Waiting,
    /// Game in progress
    Playing,
    /// Game over, report available
    Finished,
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomStatus::Waiting => write!(f, "waiting"),
            RoomStatus::Playing => write!(f, "playing"),
            RoomStatus::Finished => write!(f, "finished"),
        }
    }
}
