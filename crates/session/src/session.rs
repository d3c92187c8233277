//! SessionManager – Verbindung zu authentifiziertem Spieler
//!
//! Haelt pro Verbindung den einmal geladenen Spieler-Schnappschuss.
//! Das Profil ist fuer die Lebensdauer der Verbindung unveraenderlich;
//! der AccountStore wird nie ein zweites Mal befragt.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use gobang_core::types::{ConnectionId, Spieler};

/// Thread-sichere Zuordnung Verbindung -> Spieler
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<DashMap<ConnectionId, Spieler>>,
}

impl SessionManager {
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Hinterlegt den Spieler nach erfolgreicher Authentifizierung
    pub fn anmelden(&self, verbindung: ConnectionId, spieler: Spieler) {
        debug!(verbindung = %verbindung, username = %spieler.username, "Sitzung angelegt");
        self.inner.insert(verbindung, spieler);
    }

    /// Spieler-Schnappschuss der Verbindung
    pub fn spieler_von(&self, verbindung: &ConnectionId) -> Option<Spieler> {
        self.inner.get(verbindung).map(|eintrag| eintrag.clone())
    }

    /// Loescht die Sitzung der Verbindung
    pub fn abmelden(&self, verbindung: &ConnectionId) -> Option<Spieler> {
        self.inner.remove(verbindung).map(|(_, spieler)| spieler)
    }

    /// Anzahl aktiver Sitzungen
    pub fn anzahl(&self) -> usize {
        self.inner.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::neu()
    }
}
