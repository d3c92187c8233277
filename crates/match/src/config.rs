//! Schwellwerte des Eskalations-Sweepers

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Matchmaking-Konfiguration (Abschnitt `[matchmaking]` der Server-Config)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Wartezeit bis zur ersten Suchausweitung
    pub erweiterung_nach_sek: u64,
    /// Wartezeit bis zum endgueltigen Fehlschlag
    pub fehlschlag_nach_sek: u64,
    /// Takt des Sweeper-Durchlaufs
    pub sweep_intervall_ms: u64,
    /// Zusaetzliche Wartezeit pro weiterem Radius-Schritt
    pub erweiterungs_schritt_sek: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            erweiterung_nach_sek: 10,
            fehlschlag_nach_sek: 30,
            sweep_intervall_ms: 1000,
            erweiterungs_schritt_sek: 2,
        }
    }
}

impl MatchConfig {
    pub fn erweiterung_nach(&self) -> Duration {
        Duration::from_secs(self.erweiterung_nach_sek)
    }

    pub fn fehlschlag_nach(&self) -> Duration {
        Duration::from_secs(self.fehlschlag_nach_sek)
    }

    pub fn sweep_intervall(&self) -> Duration {
        Duration::from_millis(self.sweep_intervall_ms)
    }

    pub fn erweiterungs_schritt(&self) -> Duration {
        Duration::from_secs(self.erweiterungs_schritt_sek)
    }
}
