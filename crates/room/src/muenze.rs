//! Muenzwurf – injizierte Zufallsquelle fuer den ersten Zug
//!
//! Bei jeder Paarung (und jeder Revanche) entscheidet ein gleichverteilter
//! Muenzwurf, welches Mitglied zuerst zieht. Die Quelle ist injiziert,
//! damit Tests das Ergebnis fixieren koennen.

/// Entscheidet welches Raum-Mitglied den ersten Zug erhaelt
pub trait Muenzwurf: Send + Sync {
    /// `true` wenn Mitglied A (das zuerst wartende) beginnt
    fn erster_zug_fuer_a(&self) -> bool;
}

/// Echter gleichverteilter Muenzwurf
#[derive(Debug, Clone, Copy, Default)]
pub struct ZufallsMuenze;

impl Muenzwurf for ZufallsMuenze {
    fn erster_zug_fuer_a(&self) -> bool {
        rand::random::<bool>()
    }
}

/// Fixierter Muenzwurf fuer deterministische Tests
#[derive(Debug, Clone, Copy)]
pub struct FesterMuenzwurf(pub bool);

impl Muenzwurf for FesterMuenzwurf {
    fn erster_zug_fuer_a(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fester_muenzwurf_ist_deterministisch() {
        assert!(FesterMuenzwurf(true).erster_zug_fuer_a());
        assert!(!FesterMuenzwurf(false).erster_zug_fuer_a());
    }
}
