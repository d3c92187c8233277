//! Steuer-Protokoll (TCP)
//!
//! Definiert alle benannten Ereignisse die ueber die persistente
//! Duplex-Verbindung zwischen Client und Server laufen.
//!
//! ## Design
//! - Tagged Enums fuer typsichere Ereignistypen
//! - JSON-Serialisierung via serde (TCP, nicht zeitkritisch)
//! - Ereignisnamen auf dem Draht in camelCase (`{"event": ..., "data": ...}`)

use serde::{Deserialize, Serialize};
use gobang_core::types::{Grade, RoomId, Spieler, UserId};

// ---------------------------------------------------------------------------
// Payload-Typen
// ---------------------------------------------------------------------------

/// Einfache Text-Meldung als Ereignis-Payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meldung {
    pub message: String,
}

impl Meldung {
    /// Erstellt eine neue Meldung
    pub fn neu(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Oeffentliche Spieler-Informationen
///
/// Wird sowohl fuer `userInfoLoaded` (die eigene Identitaet) als auch
/// fuer den Gegner-Teil von `matchFound`/`rematchStarted` verwendet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpielerInfo {
    pub user_id: UserId,
    pub username: String,
    pub nickname: String,
    pub grade: Grade,
    pub profile_image: Option<String>,
}

impl From<&Spieler> for SpielerInfo {
    fn from(spieler: &Spieler) -> Self {
        Self {
            user_id: spieler.user_id,
            username: spieler.username.clone(),
            nickname: spieler.nickname.clone(),
            grade: spieler.grade,
            profile_image: spieler.profile_image.clone(),
        }
    }
}

/// Payload fuer `matchFound` und `rematchStarted`
///
/// Jede Seite erhaelt die Identitaet des *Gegners*; die beiden
/// `is_player1_first`-Flags sind zueinander immer logisch negiert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub room_id: RoomId,
    pub opponent: SpielerInfo,
    pub is_player1_first: bool,
}

/// Raum-Bezug fuer Raum-Ereignisse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaumBezug {
    pub room_id: RoomId,
}

impl RaumBezug {
    pub fn neu(room_id: RoomId) -> Self {
        Self { room_id }
    }
}

/// Brettkoordinate eines Zuges
///
/// Der Server validiert Zuege nicht; er reicht die Koordinate
/// unveraendert an den Gegner weiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZugDaten {
    pub x: u16,
    pub y: u16,
}

/// Payload der Authentifizierungs-Anfrage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthAnfrage {
    pub username: String,
}

// ---------------------------------------------------------------------------
// Client -> Server
// ---------------------------------------------------------------------------

/// Ereignisse vom Client an den Server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Einmalige Authentifizierung per Benutzername
    Authenticate(AuthAnfrage),
    /// Match-Suche starten
    RequestMatch,
    /// Match-Suche abbrechen
    CancelMatch,
    /// Revanche anfragen
    RequestRematch,
    /// Revanche annehmen
    AcceptRematch,
    /// Revanche ablehnen
    RejectRematch,
    /// Eigene Revanche-Anfrage zurueckziehen
    CancelRematch,
    /// Laufendes Spiel aufgeben
    Surrender,
    /// Natuerliches Spielende melden (Sieg/Remis clientseitig erkannt)
    GameEnded,
    /// Eigenen Zug setzen
    DoPlayer(ZugDaten),
    /// Raum verlassen
    LeaveRoom,
    /// Client beendet die Anwendung (vollstaendiges Aufraeumen)
    ApplicationQuit,
}

// ---------------------------------------------------------------------------
// Server -> Client
// ---------------------------------------------------------------------------

/// Ereignisse vom Server an den Client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Authentifizierung erfolgreich, eigene Identitaet geladen
    UserInfoLoaded(SpielerInfo),
    /// Authentifizierung fehlgeschlagen
    AuthFailed(Meldung),

    /// In die Warteschlange eingereiht
    MatchWaiting(Meldung),
    /// Suchradius wurde erweitert (hoechstens einmal pro Eintrag)
    MatchExpanded(Meldung),
    /// Suche nach Zeitueberschreitung aufgegeben
    MatchFailed(Meldung),
    /// Suche auf Wunsch abgebrochen
    MatchCanceled(Meldung),
    /// Match-Operation abgelehnt
    MatchError(Meldung),
    /// Gegner gefunden, Raum erstellt
    MatchFound(MatchInfo),

    /// Der Gegner moechte eine Revanche
    RematchRequested(Meldung),
    /// Eigene Revanche-Anfrage wurde uebermittelt
    RematchRequestSent(Meldung),
    /// Der Gegner hat die Revanche abgelehnt
    RematchRejected(Meldung),
    /// Der Gegner hat seine Revanche-Anfrage zurueckgezogen
    RematchCanceled(Meldung),
    /// Revanche-Operation abgelehnt
    RematchError(Meldung),
    /// Revanche gestartet (strukturgleich zu `matchFound`)
    RematchStarted(MatchInfo),

    /// Der Gegner hat aufgegeben (Sieg durch Aufgabe)
    OpponentSurrender(RaumBezug),
    /// Der Gegner hat den Raum verlassen
    OpponentLeft(RaumBezug),
    /// Ein Gegner ist dem eigenen Warteraum beigetreten
    OpponentJoined(RaumBezug),
    /// Bestaetigung: eigener Raum-Austritt
    ExitRoom(RaumBezug),

    /// Zug des Gegners
    DoOpponent(ZugDaten),
}
