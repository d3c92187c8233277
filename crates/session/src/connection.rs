//! Client-Connection – Verwaltet eine einzelne TCP-Verbindung
//!
//! Jede TCP-Verbindung bekommt eine `ClientConnection` in einem eigenen
//! tokio-Task. Die Verbindung registriert sich sofort bei der
//! ConnectionRegistry (vor der Authentifizierung), damit auch die
//! Auth-Antworten ueber die normale Send-Queue laufen.
//!
//! ## Ablauf
//! ```text
//! registrieren -> select { Frame lesen / Queue senden / Shutdown }
//!     -> Aufraeumen (Raum/Queue/Sitzung/Registry)
//! ```

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use gobang_accounts::AccountStore;
use gobang_core::types::ConnectionId;
use gobang_match::Uhr;
use gobang_protocol::wire::ServerCodec;
use gobang_room::Muenzwurf;

use crate::dispatcher::{DispatchAusgang, DispatcherContext, EventDispatcher};
use crate::server_state::SessionState;

/// Verarbeitet eine einzelne TCP-Verbindung
///
/// Liest Frames via `ServerCodec`, dispatcht an den `EventDispatcher`
/// und schreibt Ereignisse aus der Send-Queue zurueck auf den Socket.
pub struct ClientConnection<A, M, U>
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    state: Arc<SessionState<A, M, U>>,
    peer_addr: SocketAddr,
}

impl<A, M, U> ClientConnection<A, M, U>
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    pub fn neu(state: Arc<SessionState<A, M, U>>, peer_addr: SocketAddr) -> Self {
        Self { state, peer_addr }
    }

    /// Startet die Verbindungs-Verarbeitungsschleife
    ///
    /// Laeuft bis die Verbindung getrennt wird, der Client sich
    /// abmeldet oder ein Shutdown-Signal eingeht.
    pub async fn verarbeiten(
        self,
        stream: TcpStream,
        mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
    ) {
        let peer_addr = self.peer_addr;
        let verbindung = ConnectionId::new();

        tracing::info!(peer = %peer_addr, verbindung = %verbindung, "Neue Verbindung");

        let mut framed = Framed::new(stream, ServerCodec::new());
        let mut sende_rx = self.state.verbindungen.registrieren(verbindung);

        let dispatcher = EventDispatcher::neu(Arc::clone(&self.state));
        let mut ctx = DispatcherContext {
            peer_addr,
            verbindung,
            spieler: None,
        };

        loop {
            tokio::select! {
                // Eingehendes Ereignis vom Client
                frame = framed.next() => {
                    match frame {
                        Some(Ok(ereignis)) => {
                            tracing::trace!(peer = %peer_addr, ?ereignis, "Ereignis empfangen");
                            if dispatcher.dispatch(ereignis, &mut ctx).await == DispatchAusgang::Beenden {
                                break;
                            }
                        }
                        Some(Err(e)) => {
                            tracing::warn!(peer = %peer_addr, fehler = %e, "Frame-Lesefehler");
                            break;
                        }
                        None => {
                            tracing::info!(peer = %peer_addr, "Verbindung vom Client getrennt");
                            break;
                        }
                    }
                }

                // Ausgehendes Ereignis aus der Send-Queue
                Some(ausgehend) = sende_rx.recv() => {
                    if let Err(e) = framed.send(ausgehend).await {
                        tracing::warn!(peer = %peer_addr, fehler = %e, "Senden fehlgeschlagen");
                        break;
                    }
                }

                // Shutdown-Signal
                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!(peer = %peer_addr, "Shutdown-Signal – Verbindung wird getrennt");
                        break;
                    }
                }
            }
        }

        // Aufraeumen beim Verbindungsende (idempotent, auch nach
        // applicationQuit unschaedlich)
        dispatcher.verbindung_getrennt(&ctx);

        tracing::info!(peer = %peer_addr, verbindung = %verbindung, "Verbindungs-Task beendet");
    }
}
