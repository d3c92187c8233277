//! Revanche-Handler – Durchreichung an den RematchCoordinator
//!
//! Die komplette Abstimmungs-Logik inklusive Fehler-Ereignissen lebt
//! im Koordinator; hier wird nur delegiert.

use std::sync::Arc;

use gobang_accounts::AccountStore;
use gobang_core::types::ConnectionId;
use gobang_match::Uhr;
use gobang_room::Muenzwurf;

use crate::server_state::SessionState;

pub fn handle_request<A, M, U>(state: &Arc<SessionState<A, M, U>>, verbindung: &ConnectionId)
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    state.revanche.revanche_anfragen(verbindung);
}

pub fn handle_accept<A, M, U>(state: &Arc<SessionState<A, M, U>>, verbindung: &ConnectionId)
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    state.revanche.revanche_annehmen(verbindung);
}

pub fn handle_reject<A, M, U>(state: &Arc<SessionState<A, M, U>>, verbindung: &ConnectionId)
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    state.revanche.revanche_ablehnen(verbindung);
}

pub fn handle_cancel<A, M, U>(state: &Arc<SessionState<A, M, U>>, verbindung: &ConnectionId)
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    state.revanche.revanche_abbrechen(verbindung);
}
