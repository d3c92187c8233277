//! Gemeinsame Identifikations- und Identitaetstypen fuer Gobang
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GobangError;

/// Eindeutige Benutzer-ID (vom AccountStore vergeben)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Erstellt eine neue zufaellige UserId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// Eindeutige Verbindungs-ID (eine pro TCP-Verbindung)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Erstellt eine neue zufaellige ConnectionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn:{}", self.0)
    }
}

/// Eindeutige Raum-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub Uuid);

impl RoomId {
    /// Erstellt eine neue zufaellige RoomId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "room:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Grade – Spielstaerke
// ---------------------------------------------------------------------------

/// Spielstaerke als Kyu-artiger Rang: 1 = staerkster, 18 = schwaechster.
///
/// Der Wertebereich ist geschlossen; die Auf- und Abstiegslogik liegt
/// ausserhalb dieses Servers (externe Punkteverwaltung).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    /// Staerkster Rang
    pub const STAERKSTER: u8 = 1;
    /// Schwaechster Rang (zugleich Standardrang neuer Konten)
    pub const SCHWAECHSTER: u8 = 18;

    /// Erstellt einen Grade, validiert den Wertebereich 1..=18
    pub fn neu(wert: u8) -> Result<Self, GobangError> {
        if (Self::STAERKSTER..=Self::SCHWAECHSTER).contains(&wert) {
            Ok(Self(wert))
        } else {
            Err(GobangError::UngueltigerGrade(wert))
        }
    }

    /// Gibt den Zahlenwert zurueck
    pub fn wert(&self) -> u8 {
        self.0
    }

    /// Gibt den Rang im Abstand `abstand` zurueck, falls er im
    /// gueltigen Bereich liegt. Negative Abstaende sind staerkere Raenge.
    pub fn nachbar(&self, abstand: i8) -> Option<Self> {
        let wert = i16::from(self.0) + i16::from(abstand);
        u8::try_from(wert).ok().and_then(|w| Self::neu(w).ok())
    }

    /// Absoluter Rangabstand zu einem anderen Grade
    pub fn abstand(&self, anderer: Grade) -> u8 {
        self.0.abs_diff(anderer.0)
    }
}

impl TryFrom<u8> for Grade {
    type Error = GobangError;

    fn try_from(wert: u8) -> Result<Self, Self::Error> {
        Self::neu(wert)
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> u8 {
        grade.0
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}k", self.0)
    }
}

// ---------------------------------------------------------------------------
// Spieler – Identitaets-Schnappschuss
// ---------------------------------------------------------------------------

/// Identitaet eines Teilnehmers, einmalig beim Authentifizieren aus dem
/// AccountStore geladen und fuer die Lebensdauer der Verbindung
/// unveraenderlich.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spieler {
    pub user_id: UserId,
    pub username: String,
    pub nickname: String,
    pub grade: Grade,
    pub profile_image: Option<String>,
}
