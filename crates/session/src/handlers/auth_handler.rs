//! Auth-Handler – einmaliger Konto-Lookup pro Verbindung
//!
//! Schlaegt das Profil im AccountStore nach, legt bei Erfolg die
//! Sitzung an und schickt `userInfoLoaded`. Ein nicht erreichbarer
//! Kontodienst lehnt die Anmeldung ab (fail closed); bereits
//! angemeldete Verbindungen bleiben davon unberuehrt.

use std::sync::Arc;

use gobang_accounts::{AccountError, AccountStore};
use gobang_core::types::{ConnectionId, Spieler};
use gobang_match::Uhr;
use gobang_protocol::control::{AuthAnfrage, Meldung, ServerEvent, SpielerInfo};
use gobang_room::{EventSink, Muenzwurf};

use crate::server_state::SessionState;

/// Verarbeitet eine Authentifizierungs-Anfrage
///
/// Gibt bei Erfolg den geladenen Spieler zurueck, den der Dispatcher
/// im Verbindungskontext cached.
pub async fn handle_authenticate<A, M, U>(
    anfrage: &AuthAnfrage,
    verbindung: &ConnectionId,
    state: &Arc<SessionState<A, M, U>>,
) -> Option<Spieler>
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    match state.konten.lookup(&anfrage.username).await {
        Ok(spieler) => {
            tracing::info!(
                verbindung = %verbindung,
                username = %spieler.username,
                grade = spieler.grade.wert(),
                "Verbindung authentifiziert"
            );
            state.sessions.anmelden(*verbindung, spieler.clone());
            state.verbindungen.senden(
                verbindung,
                ServerEvent::UserInfoLoaded(SpielerInfo::from(&spieler)),
            );
            Some(spieler)
        }
        Err(AccountError::NichtGefunden(username)) => {
            tracing::warn!(verbindung = %verbindung, username = %username, "Unbekannter Benutzer");
            state.verbindungen.senden(
                verbindung,
                ServerEvent::AuthFailed(Meldung::neu("Unbekannter Benutzer")),
            );
            None
        }
        Err(AccountError::NichtErreichbar(grund)) => {
            tracing::error!(verbindung = %verbindung, grund = %grund, "Kontodienst nicht erreichbar");
            state.verbindungen.senden(
                verbindung,
                ServerEvent::AuthFailed(Meldung::neu("Kontodienst nicht erreichbar")),
            );
            None
        }
    }
}
