//! Zug-Handler – Weiterleitung der Brett-Koordinaten

use std::sync::Arc;

use gobang_accounts::AccountStore;
use gobang_core::types::ConnectionId;
use gobang_match::Uhr;
use gobang_protocol::control::ZugDaten;
use gobang_room::Muenzwurf;

use crate::server_state::SessionState;

/// `doPlayer`: Koordinaten unveraendert an den Gegner durchreichen
pub fn handle_do_player<A, M, U>(
    state: &Arc<SessionState<A, M, U>>,
    verbindung: &ConnectionId,
    zug: ZugDaten,
) where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    state.zuege.zug_weiterleiten(verbindung, zug);
}
