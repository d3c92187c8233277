//! Match-Handler – Gegnersuche starten und abbrechen

use std::sync::Arc;

use gobang_accounts::AccountStore;
use gobang_core::types::{ConnectionId, Spieler};
use gobang_match::Uhr;
use gobang_room::Muenzwurf;

use crate::server_state::SessionState;

/// `requestMatch`: sofortige Paarung oder Einreihung
pub fn handle_request<A, M, U>(
    state: &Arc<SessionState<A, M, U>>,
    verbindung: &ConnectionId,
    spieler: &Spieler,
) where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    state.matchmaker.match_anfragen(verbindung, spieler);
}

/// `cancelMatch`: eigene Suche beenden
pub fn handle_cancel<A, M, U>(
    state: &Arc<SessionState<A, M, U>>,
    verbindung: &ConnectionId,
    spieler: &Spieler,
) where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    state.matchmaker.match_abbrechen(verbindung, spieler);
}
