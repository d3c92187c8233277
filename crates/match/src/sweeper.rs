//! EscalationSweeper – periodische Ausweitung und Austragung
//!
//! Der Tick ist bewusst synchron und nimmt seine Zeit von der
//! injizierten Uhr; der Server ruft ihn aus einem Intervall-Task auf.
//! Drei Phasen pro Durchlauf:
//!
//! 1. Eintraege ueber der Fehlschlag-Schwelle austragen (`matchFailed`).
//! 2. Eintraege neu ueber der Erweiterungs-Schwelle einmalig melden
//!    (`matchExpanded`); im Meldungs-Tick wird noch nicht gepaart.
//! 3. Bereits frueher gemeldete Eintraege paaren, sobald im aktuellen
//!    Radius ein nicht-leeres Bucket liegt. Der Radius waechst mit der
//!    Wartezeit streng monoton von 3 bis maximal 5; je Abstand wird
//!    die staerkere vor der schwaecheren Klasse geprueft.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use gobang_core::types::ConnectionId;
use gobang_protocol::control::{Meldung, ServerEvent};
use gobang_room::{EventSink, Muenzwurf, RoomRegistry};

use crate::config::MatchConfig;
use crate::queue::{MatchQueue, QueueEntry};
use crate::uhr::Uhr;

/// Suchradius unmittelbar nach der Erweiterungs-Schwelle
const START_RADIUS: u64 = 3;
/// Groesster Suchradius
const MAX_RADIUS: u64 = 5;

pub struct EscalationSweeper<S, M, U> {
    queue: Arc<MatchQueue>,
    raeume: RoomRegistry<S, M>,
    sink: S,
    uhr: U,
    config: MatchConfig,
}

impl<S: EventSink + Clone, M: Muenzwurf, U: Uhr> EscalationSweeper<S, M, U> {
    pub fn neu(
        queue: Arc<MatchQueue>,
        raeume: RoomRegistry<S, M>,
        sink: S,
        uhr: U,
        config: MatchConfig,
    ) -> Self {
        Self {
            queue,
            raeume,
            sink,
            uhr,
            config,
        }
    }

    /// Ein kompletter Sweeper-Durchlauf
    pub fn tick(&self) {
        let jetzt = self.uhr.jetzt();

        for eintrag in self
            .queue
            .abgelaufene_entfernen(jetzt, self.config.fehlschlag_nach())
        {
            info!(verbindung = %eintrag.verbindung, "Gegnersuche fehlgeschlagen");
            self.sink.senden(
                &eintrag.verbindung,
                ServerEvent::MatchFailed(Meldung::neu("Kein Gegner gefunden, bitte erneut versuchen")),
            );
        }

        let frisch_gemeldet: HashSet<ConnectionId> = self
            .queue
            .erweiterung_markieren(jetzt, self.config.erweiterung_nach())
            .into_iter()
            .collect();
        for verbindung in &frisch_gemeldet {
            self.sink.senden(
                verbindung,
                ServerEvent::MatchExpanded(Meldung::neu(
                    "Suche wird auf benachbarte Staerkeklassen ausgeweitet",
                )),
            );
        }

        for kandidat in self.queue.erweiterte() {
            // Im Meldungs-Tick wird noch nicht gepaart
            if frisch_gemeldet.contains(&kandidat.verbindung) {
                continue;
            }
            // Der Kandidat kann frueher in dieser Phase als Gegner
            // gezogen worden sein
            if !self
                .queue
                .enthaelt(&kandidat.verbindung, kandidat.spieler.grade)
            {
                continue;
            }
            self.paaren(&kandidat, jetzt);
        }
    }

    /// Sucht einen Gegner im aktuellen Radius des Kandidaten
    fn paaren(&self, kandidat: &QueueEntry, jetzt: Instant) {
        let radius = self.radius_fuer(kandidat.wartezeit(jetzt));
        let grade = kandidat.spieler.grade;

        for abstand in 1..=radius {
            let ziele = [
                grade.nachbar(-(abstand as i8)),
                grade.nachbar(abstand as i8),
            ];
            for ziel in ziele.into_iter().flatten() {
                let Some(gegner) = self.queue.pop_sofort(ziel) else {
                    continue;
                };
                self.queue.entfernen(&kandidat.verbindung, grade);

                match self.raeume.raum_erstellen(
                    (kandidat.verbindung, kandidat.spieler.clone()),
                    (gegner.verbindung, gegner.spieler),
                ) {
                    Ok(raum) => info!(raum = %raum, radius, "Eskalierte Paarung"),
                    // Keine Seite wird erneut eingereiht
                    Err(fehler) => debug!(fehler = %fehler, "Eskalierte Paarung verworfen"),
                }
                return;
            }
        }
    }

    /// Radius in Abhaengigkeit der Wartezeit, streng monoton bis zum Maximum
    fn radius_fuer(&self, wartezeit: Duration) -> u64 {
        let schwelle = self.config.erweiterung_nach();
        if wartezeit < schwelle {
            return 0;
        }
        let schritt = self.config.erweiterungs_schritt().as_secs().max(1);
        let weitere = (wartezeit - schwelle).as_secs() / schritt;
        (START_RADIUS + weitere).min(MAX_RADIUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testhilfe::{spieler, TestSink};
    use crate::uhr::TestUhr;
    use gobang_core::types::Grade;
    use gobang_room::FesterMuenzwurf;

    struct Aufbau {
        sweeper: EscalationSweeper<Arc<TestSink>, FesterMuenzwurf, TestUhr>,
        queue: Arc<MatchQueue>,
        raeume: RoomRegistry<Arc<TestSink>, FesterMuenzwurf>,
        sink: Arc<TestSink>,
        uhr: TestUhr,
    }

    fn aufbau() -> Aufbau {
        aufbau_mit(MatchConfig::default())
    }

    fn aufbau_mit(config: MatchConfig) -> Aufbau {
        let sink = TestSink::neu();
        let queue = Arc::new(MatchQueue::neu());
        let uhr = TestUhr::neu();
        let raeume = RoomRegistry::neu(Arc::clone(&sink), FesterMuenzwurf(true));
        let sweeper = EscalationSweeper::neu(
            Arc::clone(&queue),
            raeume.clone(),
            Arc::clone(&sink),
            uhr.clone(),
            config,
        );
        Aufbau {
            sweeper,
            queue,
            raeume,
            sink,
            uhr,
        }
    }

    fn hat<F: Fn(&ServerEvent) -> bool>(sink: &TestSink, verbindung: &ConnectionId, f: F) -> bool {
        sink.ereignisse_fuer(verbindung).iter().any(f)
    }

    fn sek(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn erweiterung_meldet_einmal_und_paart_im_naechsten_tick() {
        let a = aufbau();
        let (sieben, zwoelf) = (ConnectionId::new(), ConnectionId::new());
        a.queue.einreihen(sieben, spieler("anna", 7), a.uhr.jetzt());
        a.queue.einreihen(zwoelf, spieler("bert", 12), a.uhr.jetzt());

        a.uhr.vorspulen(sek(11));
        a.sweeper.tick();
        for verbindung in [&sieben, &zwoelf] {
            assert!(hat(&a.sink, verbindung, |e| matches!(e, ServerEvent::MatchExpanded(_))));
            assert!(!hat(&a.sink, verbindung, |e| matches!(e, ServerEvent::MatchFound(_))));
        }

        // Abstand 5 braucht den Maximal-Radius: Wartezeit >= 14s
        a.uhr.vorspulen(sek(4));
        a.sweeper.tick();
        for verbindung in [&sieben, &zwoelf] {
            assert!(hat(&a.sink, verbindung, |e| matches!(e, ServerEvent::MatchFound(_))));
            // Die Meldung bleibt einmalig
            assert_eq!(
                a.sink
                    .ereignisse_fuer(verbindung)
                    .iter()
                    .filter(|e| matches!(e, ServerEvent::MatchExpanded(_)))
                    .count(),
                1
            );
        }
        assert_eq!(a.queue.gesamt(), 0);
    }

    #[test]
    fn kurzer_schritt_paart_abstand_fuenf_im_tick_nach_der_meldung() {
        // Mit Schrittweite 1s deckt der Radius schon im Folge-Tick
        // den Maximal-Abstand ab
        let a = aufbau_mit(MatchConfig {
            erweiterungs_schritt_sek: 1,
            ..MatchConfig::default()
        });
        let (sieben, zwoelf) = (ConnectionId::new(), ConnectionId::new());
        a.queue.einreihen(sieben, spieler("anna", 7), a.uhr.jetzt());
        a.queue.einreihen(zwoelf, spieler("bert", 12), a.uhr.jetzt());

        a.uhr.vorspulen(sek(11));
        a.sweeper.tick();
        assert!(!hat(&a.sink, &sieben, |e| matches!(e, ServerEvent::MatchFound(_))));

        // Wartezeit 12s: Radius 3 + 2 = 5
        a.uhr.vorspulen(sek(1));
        a.sweeper.tick();
        for verbindung in [&sieben, &zwoelf] {
            assert!(hat(&a.sink, verbindung, |e| matches!(e, ServerEvent::MatchFound(_))));
        }
        assert_eq!(a.queue.gesamt(), 0);
    }

    #[test]
    fn radius_waechst_streng_monoton() {
        let a = aufbau();
        let (sieben, elf) = (ConnectionId::new(), ConnectionId::new());
        a.queue.einreihen(sieben, spieler("anna", 7), a.uhr.jetzt());
        a.queue.einreihen(elf, spieler("bert", 11), a.uhr.jetzt());

        a.uhr.vorspulen(sek(11));
        a.sweeper.tick();

        // Wartezeit 11s: Radius noch 3, Abstand 4 nicht erreichbar
        a.sweeper.tick();
        assert!(!hat(&a.sink, &sieben, |e| matches!(e, ServerEvent::MatchFound(_))));

        // Wartezeit 13s: Radius 4
        a.uhr.vorspulen(sek(2));
        a.sweeper.tick();
        assert!(hat(&a.sink, &sieben, |e| matches!(e, ServerEvent::MatchFound(_))));
        assert!(hat(&a.sink, &elf, |e| matches!(e, ServerEvent::MatchFound(_))));
    }

    #[test]
    fn staerkere_klasse_wird_vor_der_schwaecheren_geprueft() {
        let a = aufbau();
        let sieben = ConnectionId::new();
        a.queue.einreihen(sieben, spieler("anna", 7), a.uhr.jetzt());

        a.uhr.vorspulen(sek(11));
        a.sweeper.tick();

        // Beide Abstand 3, aber erst nach der Meldung eingereiht
        let (vier, zehn) = (ConnectionId::new(), ConnectionId::new());
        a.queue.einreihen(vier, spieler("bert", 4), a.uhr.jetzt());
        a.queue.einreihen(zehn, spieler("carla", 10), a.uhr.jetzt());

        a.uhr.vorspulen(sek(1));
        a.sweeper.tick();

        assert!(hat(&a.sink, &vier, |e| matches!(e, ServerEvent::MatchFound(_))));
        assert!(!hat(&a.sink, &zehn, |e| matches!(e, ServerEvent::MatchFound(_))));
        assert!(a.queue.enthaelt(&zehn, Grade::neu(10).unwrap()));
    }

    #[test]
    fn fehlschlag_traegt_aus_ohne_raum() {
        let a = aufbau();
        let allein = ConnectionId::new();
        a.queue.einreihen(allein, spieler("anna", 1), a.uhr.jetzt());

        a.uhr.vorspulen(sek(31));
        a.sweeper.tick();

        assert!(hat(&a.sink, &allein, |e| matches!(e, ServerEvent::MatchFailed(_))));
        assert_eq!(a.queue.gesamt(), 0);
        assert_eq!(a.raeume.anzahl(), 0);
    }

    #[test]
    fn abgelaufener_eintrag_wird_nie_mehr_gepaart() {
        let a = aufbau();
        let (alt, frisch) = (ConnectionId::new(), ConnectionId::new());
        a.queue.einreihen(alt, spieler("anna", 7), a.uhr.jetzt());
        a.uhr.vorspulen(sek(11));
        a.sweeper.tick();

        a.uhr.vorspulen(sek(20));
        a.queue.einreihen(frisch, spieler("bert", 8), a.uhr.jetzt());
        a.sweeper.tick();

        assert!(hat(&a.sink, &alt, |e| matches!(e, ServerEvent::MatchFailed(_))));
        assert!(!hat(&a.sink, &alt, |e| matches!(e, ServerEvent::MatchFound(_))));
        assert!(a.queue.enthaelt(&frisch, Grade::neu(8).unwrap()));
    }

    #[test]
    fn tote_verbindung_wird_nicht_wieder_eingereiht() {
        let a = aufbau();
        let (sieben, acht) = (ConnectionId::new(), ConnectionId::new());
        a.queue.einreihen(sieben, spieler("anna", 7), a.uhr.jetzt());
        a.queue.einreihen(acht, spieler("bert", 8), a.uhr.jetzt());
        a.sink.trennen(acht);

        a.uhr.vorspulen(sek(11));
        a.sweeper.tick();
        a.uhr.vorspulen(sek(1));
        a.sweeper.tick();

        assert!(!hat(&a.sink, &sieben, |e| matches!(e, ServerEvent::MatchFound(_))));
        assert_eq!(a.queue.gesamt(), 0);
        assert_eq!(a.raeume.anzahl(), 0);
    }
}
