//! gobang-core – Gemeinsame Typen und Fehlertypen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Gobang-Crates gemeinsam genutzt werden: ID-Newtypes, die
//! Spielstaerke (`Grade`), der Identitaets-Schnappschuss (`Spieler`) und
//! der zentrale Fehlertyp.

pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::GobangError;
pub use types::{ConnectionId, Grade, RoomId, Spieler, UserId};
