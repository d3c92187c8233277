//! Fehlertypen fuer die Raum-Verwaltung

use gobang_core::types::{ConnectionId, RoomId};
use thiserror::Error;

/// Fehlertyp fuer Raum-Operationen
#[derive(Debug, Error)]
pub enum RoomError {
    /// Die Verbindung ist keinem Raum zugeordnet
    #[error("Kein Raum fuer Verbindung {0}")]
    RaumNichtGefunden(ConnectionId),

    /// Eine beteiligte Verbindung ist nicht mehr erreichbar
    #[error("Verbindung nicht mehr erreichbar: {0}")]
    VerbindungGetrennt(ConnectionId),

    /// Operation erfordert ein laufendes Spiel
    #[error("Kein laufendes Spiel in Raum {0}")]
    KeinLaufendesSpiel(RoomId),
}

/// Result-Typ fuer Raum-Operationen
pub type RoomResult<T> = Result<T, RoomError>;
