//! Uhr – injizierte Zeitquelle fuer das Matchmaking
//!
//! Wartezeiten werden nie gegen `Instant::now()` direkt gemessen,
//! sondern gegen diesen Trait. Tests spulen mit [`TestUhr`] virtuelle
//! Zeit vor, ohne echte Timer laufen zu lassen.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Monotone Zeitquelle
pub trait Uhr: Send + Sync {
    fn jetzt(&self) -> Instant;
}

/// Echte Systemzeit
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUhr;

impl Uhr for SystemUhr {
    fn jetzt(&self) -> Instant {
        Instant::now()
    }
}

/// Manuell vorspulbare Uhr fuer deterministische Tests
///
/// Klone teilen denselben Zeitstand.
#[derive(Debug, Clone)]
pub struct TestUhr {
    stand: Arc<Mutex<Instant>>,
}

impl TestUhr {
    pub fn neu() -> Self {
        Self {
            stand: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Spult die Uhr um die angegebene Dauer vor
    pub fn vorspulen(&self, dauer: Duration) {
        let mut stand = self.stand.lock();
        *stand += dauer;
    }
}

impl Default for TestUhr {
    fn default() -> Self {
        Self::neu()
    }
}

impl Uhr for TestUhr {
    fn jetzt(&self) -> Instant {
        *self.stand.lock()
    }
}
