//! ConnectionRegistry – Send-Queues aller verbundenen Clients
//!
//! Jede Verbindung registriert sich beim Aufbau (vor der
//! Authentifizierung) und erhaelt ihre Empfangs-Queue; die
//! `ClientConnection` liest daraus und schreibt auf den Socket. Die
//! Registry implementiert den [`EventSink`] der Spiellogik: Matching,
//! Raeume und Revanche sprechen nur gegen diesen Trait.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use gobang_core::types::ConnectionId;
use gobang_protocol::control::ServerEvent;
use gobang_room::EventSink;

// ---------------------------------------------------------------------------
// Konfiguration
// ---------------------------------------------------------------------------

/// Groesse der Send-Queue pro Client
const SEND_QUEUE_GROESSE: usize = 64;

// ---------------------------------------------------------------------------
// ClientSender
// ---------------------------------------------------------------------------

/// Handle auf die Send-Queue einer verbundenen Client-Verbindung
#[derive(Clone, Debug)]
struct ClientSender {
    verbindung: ConnectionId,
    tx: mpsc::Sender<ServerEvent>,
}

impl ClientSender {
    /// Sendet ein Ereignis nicht-blockierend an den Client
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    fn senden(&self, ereignis: ServerEvent) -> bool {
        match self.tx.try_send(ereignis) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(verbindung = %self.verbindung, "Send-Queue voll – Ereignis verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(verbindung = %self.verbindung, "Send-Queue geschlossen (Client getrennt)");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ConnectionRegistry
// ---------------------------------------------------------------------------

/// Zentrale Registry aller Verbindungs-Send-Queues
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct ConnectionRegistry {
    inner: Arc<ConnectionRegistryInner>,
}

struct ConnectionRegistryInner {
    clients: DashMap<ConnectionId, ClientSender>,
}

impl ConnectionRegistry {
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(ConnectionRegistryInner {
                clients: DashMap::new(),
            }),
        }
    }

    /// Registriert eine Verbindung und gibt ihre Empfangs-Queue zurueck
    ///
    /// Die `ClientConnection` liest aus dieser Queue und sendet via TCP.
    pub fn registrieren(&self, verbindung: ConnectionId) -> mpsc::Receiver<ServerEvent> {
        let (tx, rx) = mpsc::channel(SEND_QUEUE_GROESSE);
        self.inner
            .clients
            .insert(verbindung, ClientSender { verbindung, tx });
        tracing::debug!(verbindung = %verbindung, "Verbindung registriert");
        rx
    }

    /// Entfernt eine Verbindung aus der Registry
    pub fn entfernen(&self, verbindung: &ConnectionId) {
        self.inner.clients.remove(verbindung);
        tracing::debug!(verbindung = %verbindung, "Verbindung entfernt");
    }

    /// Anzahl registrierter Verbindungen
    pub fn anzahl(&self) -> usize {
        self.inner.clients.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::neu()
    }
}

impl EventSink for ConnectionRegistry {
    fn senden(&self, verbindung: &ConnectionId, ereignis: ServerEvent) -> bool {
        match self.inner.clients.get(verbindung) {
            Some(sender) => sender.senden(ereignis),
            None => {
                tracing::debug!(verbindung = %verbindung, "Senden an unbekannte Verbindung");
                false
            }
        }
    }

    fn ist_verbunden(&self, verbindung: &ConnectionId) -> bool {
        self.inner.clients.contains_key(verbindung)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
