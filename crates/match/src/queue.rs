//! MatchQueue – Grade-gebuckelte FIFO-Wartepools
//!
//! Pro Grade ein Bucket, pro Bucket strikte Einreihungs-Reihenfolge.
//! Die Queue erzwingt selbst keine Eindeutigkeit pro Verbindung; der
//! MatchMaker prueft das vor dem Einreihen.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use gobang_core::types::{ConnectionId, Grade, Spieler};

/// Ein wartender Eintrag in einem Grade-Bucket
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub verbindung: ConnectionId,
    pub spieler: Spieler,
    pub eingereiht_um: Instant,
    /// Einmalige Erweiterungs-Meldung bereits verschickt
    pub erweiterung_gemeldet: bool,
}

impl QueueEntry {
    pub fn wartezeit(&self, jetzt: Instant) -> Duration {
        jetzt.duration_since(self.eingereiht_um)
    }
}

/// Thread-sichere Wartepools, ein Bucket pro Grade
#[derive(Debug, Default)]
pub struct MatchQueue {
    buckets: DashMap<u8, VecDeque<QueueEntry>>,
}

impl MatchQueue {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Haengt einen Eintrag ans Ende des Grade-Buckets an
    pub fn einreihen(&self, verbindung: ConnectionId, spieler: Spieler, jetzt: Instant) {
        let grade = spieler.grade;
        self.buckets
            .entry(grade.wert())
            .or_default()
            .push_back(QueueEntry {
                verbindung,
                spieler,
                eingereiht_um: jetzt,
                erweiterung_gemeldet: false,
            });
        debug!(verbindung = %verbindung, grade = grade.wert(), "In Warteschlange eingereiht");
    }

    /// Entfernt den Eintrag der Verbindung aus ihrem Grade-Bucket
    ///
    /// Nur das adressierte Bucket wird durchsucht. No-op wenn die
    /// Verbindung dort nicht wartet.
    pub fn entfernen(&self, verbindung: &ConnectionId, grade: Grade) -> bool {
        let Some(mut bucket) = self.buckets.get_mut(&grade.wert()) else {
            return false;
        };
        let vorher = bucket.len();
        bucket.retain(|eintrag| eintrag.verbindung != *verbindung);
        bucket.len() < vorher
    }

    /// Holt den aeltesten Eintrag des Buckets, falls vorhanden
    pub fn pop_sofort(&self, grade: Grade) -> Option<QueueEntry> {
        self.buckets
            .get_mut(&grade.wert())
            .and_then(|mut bucket| bucket.pop_front())
    }

    /// Wartet die Verbindung im Bucket dieses Grades?
    pub fn enthaelt(&self, verbindung: &ConnectionId, grade: Grade) -> bool {
        self.buckets
            .get(&grade.wert())
            .is_some_and(|bucket| bucket.iter().any(|e| e.verbindung == *verbindung))
    }

    /// Anzahl wartender Eintraege im Bucket
    pub fn laenge(&self, grade: Grade) -> usize {
        self.buckets
            .get(&grade.wert())
            .map_or(0, |bucket| bucket.len())
    }

    /// Gesamtzahl wartender Eintraege
    pub fn gesamt(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.len()).sum()
    }

    // ---------------------------------------------------------------
    // Sweeper-Schnittstelle
    // ---------------------------------------------------------------

    /// Entfernt alle Eintraege, deren Wartezeit die Schwelle erreicht
    ///
    /// Gibt die entfernten Eintraege zurueck; die FIFO-Reihenfolge der
    /// verbleibenden bleibt erhalten.
    pub fn abgelaufene_entfernen(&self, jetzt: Instant, schwelle: Duration) -> Vec<QueueEntry> {
        let mut entfernt = Vec::new();
        for mut bucket in self.buckets.iter_mut() {
            let deque = bucket.value_mut();
            let mut verbleibend = VecDeque::with_capacity(deque.len());
            while let Some(eintrag) = deque.pop_front() {
                if eintrag.wartezeit(jetzt) >= schwelle {
                    entfernt.push(eintrag);
                } else {
                    verbleibend.push_back(eintrag);
                }
            }
            *deque = verbleibend;
        }
        entfernt
    }

    /// Setzt das Erweiterungs-Flag fuer neu ueber der Schwelle liegende Eintraege
    ///
    /// Gibt nur die in diesem Aufruf markierten Verbindungen zurueck;
    /// bereits markierte Eintraege bleiben unberuehrt (die Meldung ist
    /// einmalig).
    pub fn erweiterung_markieren(&self, jetzt: Instant, schwelle: Duration) -> Vec<ConnectionId> {
        let mut markiert = Vec::new();
        for mut bucket in self.buckets.iter_mut() {
            for eintrag in bucket.value_mut().iter_mut() {
                if !eintrag.erweiterung_gemeldet && eintrag.wartezeit(jetzt) >= schwelle {
                    eintrag.erweiterung_gemeldet = true;
                    markiert.push(eintrag.verbindung);
                }
            }
        }
        markiert
    }

    /// Momentaufnahme aller bereits markierten Eintraege
    pub fn erweiterte(&self) -> Vec<QueueEntry> {
        self.buckets
            .iter()
            .flat_map(|bucket| {
                bucket
                    .iter()
                    .filter(|e| e.erweiterung_gemeldet)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testhilfe::spieler;

    fn grade(wert: u8) -> Grade {
        Grade::neu(wert).unwrap()
    }

    #[test]
    fn pop_liefert_in_einreihungs_reihenfolge() {
        let queue = MatchQueue::neu();
        let jetzt = Instant::now();
        let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

        queue.einreihen(a, spieler("anna", 6), jetzt);
        queue.einreihen(b, spieler("bert", 6), jetzt);
        queue.einreihen(c, spieler("carla", 6), jetzt);

        let reihenfolge: Vec<_> = std::iter::from_fn(|| queue.pop_sofort(grade(6)))
            .map(|e| e.verbindung)
            .collect();
        assert_eq!(reihenfolge, vec![a, b, c]);
    }

    #[test]
    fn entfernen_trifft_nur_die_eigene_verbindung() {
        let queue = MatchQueue::neu();
        let jetzt = Instant::now();
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        queue.einreihen(a, spieler("anna", 6), jetzt);
        queue.einreihen(b, spieler("bert", 6), jetzt);

        assert!(queue.entfernen(&a, grade(6)));
        assert!(!queue.entfernen(&a, grade(6)));
        assert!(queue.enthaelt(&b, grade(6)));
        assert_eq!(queue.laenge(grade(6)), 1);
    }

    #[test]
    fn pop_aus_leerem_bucket_ist_none() {
        let queue = MatchQueue::neu();
        assert!(queue.pop_sofort(grade(1)).is_none());
    }

    #[test]
    fn erweiterung_wird_nur_einmal_markiert() {
        let queue = MatchQueue::neu();
        let start = Instant::now();
        let a = ConnectionId::new();
        queue.einreihen(a, spieler("anna", 6), start);

        let spaeter = start + Duration::from_secs(11);
        let schwelle = Duration::from_secs(10);
        assert_eq!(queue.erweiterung_markieren(spaeter, schwelle), vec![a]);
        assert!(queue.erweiterung_markieren(spaeter, schwelle).is_empty());
        assert_eq!(queue.erweiterte().len(), 1);
    }

    #[test]
    fn abgelaufene_verlassen_die_queue_die_juengeren_bleiben() {
        let queue = MatchQueue::neu();
        let start = Instant::now();
        let (alt, jung) = (ConnectionId::new(), ConnectionId::new());
        queue.einreihen(alt, spieler("anna", 6), start);
        queue.einreihen(jung, spieler("bert", 6), start + Duration::from_secs(25));

        let jetzt = start + Duration::from_secs(31);
        let raus = queue.abgelaufene_entfernen(jetzt, Duration::from_secs(30));

        assert_eq!(raus.len(), 1);
        assert_eq!(raus[0].verbindung, alt);
        assert!(queue.enthaelt(&jung, grade(6)));
    }
}
