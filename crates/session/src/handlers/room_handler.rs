//! Raum-Handler – Verlassen, Aufgabe und Spielende
//!
//! Raum-Fehler werden als `matchError`-Ereignis an den Aufrufer
//! gemeldet; der Raum-Zustand bleibt dabei unveraendert.

use std::sync::Arc;

use gobang_accounts::AccountStore;
use gobang_core::types::ConnectionId;
use gobang_match::Uhr;
use gobang_protocol::control::{Meldung, ServerEvent};
use gobang_room::{EventSink, Muenzwurf, RoomError};

use crate::server_state::SessionState;

/// `leaveRoom`: expliziter Austritt
pub fn handle_leave<A, M, U>(state: &Arc<SessionState<A, M, U>>, verbindung: &ConnectionId)
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    if let Err(fehler) = state.raeume.verlassen(verbindung) {
        fehler_melden(state, verbindung, &fehler);
    }
}

/// `surrender`: Aufgabe der laufenden Partie
pub fn handle_surrender<A, M, U>(state: &Arc<SessionState<A, M, U>>, verbindung: &ConnectionId)
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    if let Err(fehler) = state.raeume.aufgeben(verbindung) {
        fehler_melden(state, verbindung, &fehler);
    }
}

/// `gameEnded`: regulaerer Abschluss der Partie
pub fn handle_game_ended<A, M, U>(state: &Arc<SessionState<A, M, U>>, verbindung: &ConnectionId)
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    if let Err(fehler) = state.raeume.spiel_beendet(verbindung) {
        fehler_melden(state, verbindung, &fehler);
    }
}

fn fehler_melden<A, M, U>(
    state: &Arc<SessionState<A, M, U>>,
    verbindung: &ConnectionId,
    fehler: &RoomError,
) where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    tracing::debug!(verbindung = %verbindung, fehler = %fehler, "Raum-Operation abgelehnt");
    let meldung = match fehler {
        RoomError::RaumNichtGefunden(_) => "Du bist in keinem Raum",
        RoomError::KeinLaufendesSpiel(_) => "Kein laufendes Spiel",
        _ => "Raum-Operation fehlgeschlagen",
    };
    state.verbindungen.senden(
        verbindung,
        ServerEvent::MatchError(Meldung::neu(meldung)),
    );
}
