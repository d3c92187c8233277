//! Event-Dispatcher – Routet Client-Ereignisse an die Handler
//!
//! Der Dispatcher empfaengt Ereignisse von einer ClientConnection,
//! prueft den Authentifizierungs-Zustand und delegiert an die
//! Handler-Module. Antworten laufen ausschliesslich ueber die
//! Send-Queue der ConnectionRegistry; der Dispatcher gibt nur zurueck,
//! ob die Verbindung weiterlaufen soll.
//!
//! ## Zustandspruefung
//! - `authenticate` nur solange die Verbindung nicht angemeldet ist
//! - Alle anderen Ereignisse erfordern eine angemeldete Sitzung

use std::net::SocketAddr;
use std::sync::Arc;

use gobang_accounts::AccountStore;
use gobang_core::types::{ConnectionId, Spieler};
use gobang_match::Uhr;
use gobang_protocol::control::{ClientEvent, Meldung, ServerEvent};
use gobang_room::{EventSink, Muenzwurf};

use crate::handlers::{auth_handler, match_handler, move_handler, rematch_handler, room_handler};
use crate::server_state::SessionState;

/// Dispatcher-Kontext – Informationen ueber die aktuelle Verbindung
pub struct DispatcherContext {
    /// Peer-Adresse (nur fuer Logging)
    pub peer_addr: SocketAddr,
    /// Verbindungs-ID, beim Aufbau vergeben
    pub verbindung: ConnectionId,
    /// Angemeldeter Spieler (None solange nicht authentifiziert)
    pub spieler: Option<Spieler>,
}

/// Soll die Verbindung nach dem Ereignis weiterlaufen?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchAusgang {
    Weiter,
    Beenden,
}

/// Zentraler Event-Dispatcher
pub struct EventDispatcher<A, M, U>
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    state: Arc<SessionState<A, M, U>>,
}

impl<A, M, U> EventDispatcher<A, M, U>
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    pub fn neu(state: Arc<SessionState<A, M, U>>) -> Self {
        Self { state }
    }

    /// Verarbeitet ein eingehendes Client-Ereignis
    ///
    /// Der einzige Suspension-Punkt ist der Konto-Lookup bei der
    /// Authentifizierung; alle Spiellogik-Aufrufe sind synchron.
    pub async fn dispatch(
        &self,
        ereignis: ClientEvent,
        ctx: &mut DispatcherContext,
    ) -> DispatchAusgang {
        match ereignis {
            // ---------------------------------------------------------------
            // Authentifizierung
            // ---------------------------------------------------------------
            ClientEvent::Authenticate(anfrage) => {
                if ctx.spieler.is_some() {
                    self.state.verbindungen.senden(
                        &ctx.verbindung,
                        ServerEvent::AuthFailed(Meldung::neu("Bereits angemeldet")),
                    );
                    return DispatchAusgang::Weiter;
                }
                ctx.spieler =
                    auth_handler::handle_authenticate(&anfrage, &ctx.verbindung, &self.state).await;
                DispatchAusgang::Weiter
            }

            // ---------------------------------------------------------------
            // Matchmaking
            // ---------------------------------------------------------------
            ClientEvent::RequestMatch => {
                if let Some(spieler) = self.angemeldet(ctx) {
                    match_handler::handle_request(&self.state, &ctx.verbindung, &spieler);
                }
                DispatchAusgang::Weiter
            }
            ClientEvent::CancelMatch => {
                if let Some(spieler) = self.angemeldet(ctx) {
                    match_handler::handle_cancel(&self.state, &ctx.verbindung, &spieler);
                }
                DispatchAusgang::Weiter
            }

            // ---------------------------------------------------------------
            // Revanche-Abstimmung
            // ---------------------------------------------------------------
            ClientEvent::RequestRematch => {
                if self.angemeldet(ctx).is_some() {
                    rematch_handler::handle_request(&self.state, &ctx.verbindung);
                }
                DispatchAusgang::Weiter
            }
            ClientEvent::AcceptRematch => {
                if self.angemeldet(ctx).is_some() {
                    rematch_handler::handle_accept(&self.state, &ctx.verbindung);
                }
                DispatchAusgang::Weiter
            }
            ClientEvent::RejectRematch => {
                if self.angemeldet(ctx).is_some() {
                    rematch_handler::handle_reject(&self.state, &ctx.verbindung);
                }
                DispatchAusgang::Weiter
            }
            ClientEvent::CancelRematch => {
                if self.angemeldet(ctx).is_some() {
                    rematch_handler::handle_cancel(&self.state, &ctx.verbindung);
                }
                DispatchAusgang::Weiter
            }

            // ---------------------------------------------------------------
            // Raum und Spiel
            // ---------------------------------------------------------------
            ClientEvent::Surrender => {
                if self.angemeldet(ctx).is_some() {
                    room_handler::handle_surrender(&self.state, &ctx.verbindung);
                }
                DispatchAusgang::Weiter
            }
            ClientEvent::GameEnded => {
                if self.angemeldet(ctx).is_some() {
                    room_handler::handle_game_ended(&self.state, &ctx.verbindung);
                }
                DispatchAusgang::Weiter
            }
            ClientEvent::DoPlayer(zug) => {
                if self.angemeldet(ctx).is_some() {
                    move_handler::handle_do_player(&self.state, &ctx.verbindung, zug);
                }
                DispatchAusgang::Weiter
            }
            ClientEvent::LeaveRoom => {
                if self.angemeldet(ctx).is_some() {
                    room_handler::handle_leave(&self.state, &ctx.verbindung);
                }
                DispatchAusgang::Weiter
            }

            // ---------------------------------------------------------------
            // Geordneter Abgang
            // ---------------------------------------------------------------
            ClientEvent::ApplicationQuit => {
                tracing::info!(verbindung = %ctx.verbindung, "Client meldet Beenden");
                self.verbindung_getrennt(ctx);
                DispatchAusgang::Beenden
            }
        }
    }

    /// Komplettes Aufraeumen bei Verbindungsende
    ///
    /// Reihenfolge: Send-Queue zuerst (der Socket ist weg), dann
    /// Raum-Austritt bzw. Queue-Eintrag, zuletzt die Sitzung.
    /// Idempotent; ein zweiter Aufruf findet nichts mehr vor.
    pub fn verbindung_getrennt(&self, ctx: &DispatcherContext) {
        self.state.verbindungen.entfernen(&ctx.verbindung);

        if self.state.raeume.getrennt(&ctx.verbindung).is_none() {
            if let Some(spieler) = &ctx.spieler {
                self.state.queue.entfernen(&ctx.verbindung, spieler.grade);
            }
        }

        self.state.sessions.abmelden(&ctx.verbindung);
    }

    /// Liefert den Spieler der Sitzung oder meldet `authFailed`
    fn angemeldet(&self, ctx: &DispatcherContext) -> Option<Spieler> {
        match &ctx.spieler {
            Some(spieler) => Some(spieler.clone()),
            None => {
                self.state.verbindungen.senden(
                    &ctx.verbindung,
                    ServerEvent::AuthFailed(Meldung::neu(
                        "Nicht authentifiziert – bitte zuerst anmelden",
                    )),
                );
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
