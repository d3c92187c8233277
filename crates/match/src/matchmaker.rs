//! MatchMaker – sofortige Paarung oder Einreihung
//!
//! Beantwortet eine Suchanfrage in fester Praeferenz-Reihenfolge:
//! gleicher Grade zuerst, dann die staerkere vor der schwaecheren
//! Nachbarklasse, bis Abstand 2. Erst wenn alle fuenf Buckets leer
//! sind, wird der Anfragende eingereiht; die weitere Ausweitung
//! uebernimmt der Sweeper.

use std::sync::Arc;

use tracing::{debug, info};

use gobang_core::types::{ConnectionId, Spieler};
use gobang_protocol::control::{Meldung, ServerEvent};
use gobang_room::{EventSink, Muenzwurf, RoomRegistry};

use crate::queue::MatchQueue;
use crate::uhr::Uhr;

/// Praeferenz-Reihenfolge der Sofort-Suche relativ zum eigenen Grade
const SOFORT_REIHENFOLGE: [i8; 5] = [0, -1, 1, -2, 2];

pub struct MatchMaker<S, M, U> {
    queue: Arc<MatchQueue>,
    raeume: RoomRegistry<S, M>,
    sink: S,
    uhr: U,
}

impl<S: Clone, M, U: Clone> Clone for MatchMaker<S, M, U> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
            raeume: self.raeume.clone(),
            sink: self.sink.clone(),
            uhr: self.uhr.clone(),
        }
    }
}

impl<S: EventSink + Clone, M: Muenzwurf, U: Uhr> MatchMaker<S, M, U> {
    pub fn neu(queue: Arc<MatchQueue>, raeume: RoomRegistry<S, M>, sink: S, uhr: U) -> Self {
        Self {
            queue,
            raeume,
            sink,
            uhr,
        }
    }

    /// Startet eine Gegnersuche
    ///
    /// Wer bereits sucht oder in einem Raum steht, erhaelt nur
    /// `matchError`; es entsteht kein doppelter Zustand.
    pub fn match_anfragen(&self, verbindung: &ConnectionId, spieler: &Spieler) {
        if self.raeume.raum_von(verbindung).is_some()
            || self.queue.enthaelt(verbindung, spieler.grade)
        {
            self.sink.senden(
                verbindung,
                ServerEvent::MatchError(Meldung::neu("Du suchst bereits oder bist in einem Raum")),
            );
            return;
        }

        for abstand in SOFORT_REIHENFOLGE {
            let Some(ziel) = spieler.grade.nachbar(abstand) else {
                continue;
            };
            let Some(gegner) = self.queue.pop_sofort(ziel) else {
                continue;
            };

            match self.raeume.raum_erstellen(
                (gegner.verbindung, gegner.spieler),
                (*verbindung, spieler.clone()),
            ) {
                Ok(raum) => {
                    info!(raum = %raum, "Sofortige Paarung");
                }
                Err(fehler) => {
                    // Keine Seite wird erneut eingereiht
                    debug!(fehler = %fehler, "Sofortige Paarung fehlgeschlagen");
                    self.sink.senden(
                        verbindung,
                        ServerEvent::MatchError(Meldung::neu("Gegner nicht mehr verbunden")),
                    );
                }
            }
            return;
        }

        self.queue
            .einreihen(*verbindung, spieler.clone(), self.uhr.jetzt());
        self.sink.senden(
            verbindung,
            ServerEvent::MatchWaiting(Meldung::neu("Warte auf einen Gegner")),
        );
    }

    /// Bricht die eigene Gegnersuche ab
    pub fn match_abbrechen(&self, verbindung: &ConnectionId, spieler: &Spieler) {
        if self.raeume.raum_von(verbindung).is_some() {
            self.sink.senden(
                verbindung,
                ServerEvent::MatchError(Meldung::neu("Du bist bereits in einem Raum")),
            );
            return;
        }

        self.queue.entfernen(verbindung, spieler.grade);
        self.sink.senden(
            verbindung,
            ServerEvent::MatchCanceled(Meldung::neu("Suche abgebrochen")),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testhilfe::{spieler, TestSink};
    use crate::uhr::SystemUhr;
    use gobang_core::types::Grade;
    use gobang_room::FesterMuenzwurf;

    type TestMaker = MatchMaker<Arc<TestSink>, FesterMuenzwurf, SystemUhr>;

    fn aufbau() -> (TestMaker, Arc<MatchQueue>, Arc<TestSink>) {
        let sink = TestSink::neu();
        let queue = Arc::new(MatchQueue::neu());
        let raeume = RoomRegistry::neu(Arc::clone(&sink), FesterMuenzwurf(true));
        let maker = MatchMaker::neu(Arc::clone(&queue), raeume, Arc::clone(&sink), SystemUhr);
        (maker, queue, sink)
    }

    fn hat<F: Fn(&ServerEvent) -> bool>(sink: &TestSink, verbindung: &ConnectionId, f: F) -> bool {
        sink.ereignisse_fuer(verbindung).iter().any(f)
    }

    #[test]
    fn gleicher_grade_wird_sofort_gepaart() {
        let (maker, queue, sink) = aufbau();
        let (a, b) = (ConnectionId::new(), ConnectionId::new());

        maker.match_anfragen(&a, &spieler("anna", 10));
        assert!(hat(&sink, &a, |e| matches!(e, ServerEvent::MatchWaiting(_))));

        maker.match_anfragen(&b, &spieler("bert", 10));
        for verbindung in [&a, &b] {
            assert!(hat(&sink, verbindung, |e| matches!(e, ServerEvent::MatchFound(_))));
        }
        assert_eq!(queue.gesamt(), 0);
    }

    #[test]
    fn staerkerer_nachbar_vor_schwaecherem() {
        let (maker, queue, sink) = aufbau();
        let (staerker, schwaecher, anfragend) =
            (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
        let jetzt = std::time::Instant::now();
        queue.einreihen(staerker, spieler("anna", 7), jetzt);
        queue.einreihen(schwaecher, spieler("bert", 9), jetzt);

        maker.match_anfragen(&anfragend, &spieler("carla", 8));

        assert!(hat(&sink, &staerker, |e| matches!(e, ServerEvent::MatchFound(_))));
        assert!(!hat(&sink, &schwaecher, |e| matches!(e, ServerEvent::MatchFound(_))));
        assert!(queue.enthaelt(&schwaecher, Grade::neu(9).unwrap()));
    }

    #[test]
    fn abstand_zwei_wird_noch_sofort_gefunden() {
        let (maker, queue, sink) = aufbau();
        let (wartend, anfragend) = (ConnectionId::new(), ConnectionId::new());
        queue.einreihen(wartend, spieler("anna", 12), std::time::Instant::now());

        maker.match_anfragen(&anfragend, &spieler("carla", 10));

        assert!(hat(&sink, &wartend, |e| matches!(e, ServerEvent::MatchFound(_))));
    }

    #[test]
    fn doppelte_anfrage_erzeugt_keinen_zweiten_eintrag() {
        let (maker, queue, sink) = aufbau();
        let a = ConnectionId::new();
        let anna = spieler("anna", 10);

        maker.match_anfragen(&a, &anna);
        maker.match_anfragen(&a, &anna);

        assert_eq!(queue.gesamt(), 1);
        assert!(hat(&sink, &a, |e| matches!(e, ServerEvent::MatchError(_))));
    }

    #[test]
    fn anfrage_aus_einem_raum_heraus_ist_fehler() {
        let (maker, queue, sink) = aufbau();
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        maker.match_anfragen(&a, &spieler("anna", 10));
        maker.match_anfragen(&b, &spieler("bert", 10));
        sink.leeren();

        maker.match_anfragen(&a, &spieler("anna", 10));

        assert!(hat(&sink, &a, |e| matches!(e, ServerEvent::MatchError(_))));
        assert_eq!(queue.gesamt(), 0);
    }

    #[test]
    fn abbrechen_entfernt_den_eintrag() {
        let (maker, queue, sink) = aufbau();
        let a = ConnectionId::new();
        let anna = spieler("anna", 10);
        maker.match_anfragen(&a, &anna);

        maker.match_abbrechen(&a, &anna);

        assert_eq!(queue.gesamt(), 0);
        assert!(hat(&sink, &a, |e| matches!(e, ServerEvent::MatchCanceled(_))));
    }

    #[test]
    fn abbrechen_im_raum_ist_fehler() {
        let (maker, _queue, sink) = aufbau();
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        maker.match_anfragen(&a, &spieler("anna", 10));
        maker.match_anfragen(&b, &spieler("bert", 10));
        sink.leeren();

        maker.match_abbrechen(&a, &spieler("anna", 10));

        assert!(hat(&sink, &a, |e| matches!(e, ServerEvent::MatchError(_))));
    }

    #[test]
    fn toter_gegner_wird_nicht_wieder_eingereiht() {
        let (maker, queue, sink) = aufbau();
        let (tot, anfragend) = (ConnectionId::new(), ConnectionId::new());
        queue.einreihen(tot, spieler("anna", 10), std::time::Instant::now());
        sink.trennen(tot);

        maker.match_anfragen(&anfragend, &spieler("bert", 10));

        assert_eq!(queue.gesamt(), 0);
        assert!(hat(&sink, &anfragend, |e| matches!(e, ServerEvent::MatchError(_))));
        assert!(!hat(&sink, &anfragend, |e| matches!(e, ServerEvent::MatchFound(_))));
    }
}
