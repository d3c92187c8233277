//! AccountStore – Abfrage-Vertrag und In-Memory-Implementierung
//!
//! Der Vertrag ist bewusst schmal: eine Abfrage nach Benutzername,
//! konsultiert einmalig beim Authentifizieren. Passwoerter, Punkte und
//! Statistiken liegen ausserhalb dieses Servers.

use dashmap::DashMap;
use gobang_core::types::Spieler;

use crate::error::{AccountError, AccountResult};

/// Abfrage-Vertrag fuer Konten
#[allow(async_fn_in_trait)]
pub trait AccountStore: Send + Sync {
    /// Laedt das Profil zu einem Benutzernamen
    async fn lookup(&self, username: &str) -> AccountResult<Spieler>;
}

/// In-Memory-AccountStore
///
/// Haelt Profile in einer DashMap, indiziert nach Benutzername.
/// Thread-safe; der Store wird Arc-geteilt.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    konten: DashMap<String, Spieler>,
}

impl MemoryAccountStore {
    /// Erstellt einen leeren Store
    pub fn neu() -> Self {
        Self {
            konten: DashMap::new(),
        }
    }

    /// Fuegt ein Konto hinzu oder ersetzt es
    pub fn einfuegen(&self, spieler: Spieler) {
        tracing::debug!(username = %spieler.username, grade = %spieler.grade, "Konto registriert");
        self.konten.insert(spieler.username.clone(), spieler);
    }

    /// Gibt die Anzahl der registrierten Konten zurueck
    pub fn anzahl(&self) -> usize {
        self.konten.len()
    }
}

impl AccountStore for MemoryAccountStore {
    async fn lookup(&self, username: &str) -> AccountResult<Spieler> {
        match self.konten.get(username) {
            Some(eintrag) => Ok(eintrag.clone()),
            None => Err(AccountError::NichtGefunden(username.to_string())),
        }
    }
}
