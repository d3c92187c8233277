//! RoomRegistry – Raeume, Verbindungs-Index und Spielzustand
//!
//! Die Registry haelt alle aktiven Raeume sowie den Index von
//! Verbindung zu Raum. Ein Raum hat immer genau zwei Mitglieder und
//! wird nie verkleinert: verlaesst ein Mitglied den Raum, verschwindet
//! nur sein Index-Eintrag. Der Raum selbst wird erst entfernt, wenn
//! kein Index-Eintrag mehr auf ihn zeigt.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use gobang_core::types::{ConnectionId, RoomId, Spieler};
use gobang_protocol::control::{MatchInfo, RaumBezug, ServerEvent, SpielerInfo};

use crate::error::{RoomError, RoomResult};
use crate::muenze::Muenzwurf;
use crate::sink::EventSink;

// ---------------------------------------------------------------
// Spielzustand
// ---------------------------------------------------------------

/// Phase des Spiels in einem Raum
///
/// Revanche-Stimmen existieren nur in der Beendet-Phase; ein laufendes
/// Spiel mit offenen Stimmen ist damit nicht darstellbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpielPhase {
    /// Partie laeuft, Zuege werden weitergeleitet
    Laufend,
    /// Partie beendet, Revanche-Abstimmung offen
    Beendet { stimmen: HashSet<ConnectionId> },
}

impl SpielPhase {
    /// Kurzform fuer "Partie laeuft"
    pub fn laeuft(&self) -> bool {
        matches!(self, SpielPhase::Laufend)
    }

    fn beendet_ohne_stimmen() -> Self {
        SpielPhase::Beendet {
            stimmen: HashSet::new(),
        }
    }
}

// ---------------------------------------------------------------
// Raum
// ---------------------------------------------------------------

/// Ein Spielraum mit exakt zwei Mitgliedern
///
/// Mitglied 0 ist der Wartende der Paarung (der Queue-Eintrag),
/// Mitglied 1 der Anfragende. Die Reihenfolge bleibt ueber die
/// gesamte Lebensdauer stabil.
#[derive(Debug, Clone)]
pub struct Raum {
    pub id: RoomId,
    pub mitglieder: [(ConnectionId, Spieler); 2],
    pub phase: SpielPhase,
}

impl Raum {
    /// Index (0 oder 1) der Verbindung im Raum
    pub fn mitglied_index(&self, verbindung: &ConnectionId) -> Option<usize> {
        self.mitglieder
            .iter()
            .position(|(id, _)| id == verbindung)
    }

    /// Verbindung und Spieler des jeweils anderen Mitglieds
    pub fn gegner_von(&self, verbindung: &ConnectionId) -> Option<&(ConnectionId, Spieler)> {
        let idx = self.mitglied_index(verbindung)?;
        Some(&self.mitglieder[1 - idx])
    }
}

// ---------------------------------------------------------------
// RoomRegistry
// ---------------------------------------------------------------

struct Inner<S, M> {
    raeume: DashMap<RoomId, Raum>,
    index: DashMap<ConnectionId, RoomId>,
    sink: S,
    muenze: M,
}

/// Thread-sicherer Raum-Speicher mit Zustandsmaschine
///
/// Clone ist billig (Arc); alle Klone teilen denselben Zustand.
pub struct RoomRegistry<S, M> {
    inner: Arc<Inner<S, M>>,
}

impl<S, M> Clone for RoomRegistry<S, M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: EventSink, M: Muenzwurf> RoomRegistry<S, M> {
    /// Erstellt eine leere Registry
    pub fn neu(sink: S, muenze: M) -> Self {
        Self {
            inner: Arc::new(Inner {
                raeume: DashMap::new(),
                index: DashMap::new(),
                sink,
                muenze,
            }),
        }
    }

    /// Erstellt einen Raum fuer eine frische Paarung
    ///
    /// `wartend` ist der aus der Queue geholte Eintrag, `anfragend` die
    /// ausloesende Verbindung. Beide werden unmittelbar vor der
    /// Erstellung erneut auf Liveness geprueft; schlaegt das fehl,
    /// bleibt die Registry unveraendert und der Aufrufer entscheidet
    /// ueber die Fehlerbehandlung.
    ///
    /// Der Wartende erhaelt zuerst `opponentJoined`, danach bekommen
    /// beide `matchFound` mit invertierten `isPlayer1First`-Flags.
    pub fn raum_erstellen(
        &self,
        wartend: (ConnectionId, Spieler),
        anfragend: (ConnectionId, Spieler),
    ) -> RoomResult<RoomId> {
        for (verbindung, _) in [&wartend, &anfragend] {
            if !self.inner.sink.ist_verbunden(verbindung) {
                debug!(verbindung = %verbindung, "Raum-Erstellung abgebrochen, Verbindung weg");
                return Err(RoomError::VerbindungGetrennt(*verbindung));
            }
        }

        let raum_id = RoomId::new();
        let raum = Raum {
            id: raum_id,
            mitglieder: [wartend.clone(), anfragend.clone()],
            phase: SpielPhase::Laufend,
        };

        self.inner.index.insert(wartend.0, raum_id);
        self.inner.index.insert(anfragend.0, raum_id);
        self.inner.raeume.insert(raum_id, raum.clone());

        info!(
            raum = %raum_id,
            wartend = %wartend.1.username,
            anfragend = %anfragend.1.username,
            "Raum erstellt"
        );

        self.inner
            .sink
            .senden(&wartend.0, ServerEvent::OpponentJoined(RaumBezug::neu(raum_id)));
        self.paarung_senden(&raum, false);

        Ok(raum_id)
    }

    /// Verbreitet matchFound bzw. rematchStarted an beide Mitglieder
    ///
    /// Der Muenzwurf wird hier geworfen; Mitglied 0 erhaelt das
    /// Ergebnis, Mitglied 1 die Negation.
    pub(crate) fn paarung_senden(&self, raum: &Raum, revanche: bool) {
        let erster_fuer_a = self.inner.muenze.erster_zug_fuer_a();
        let [(conn_a, spieler_a), (conn_b, spieler_b)] = &raum.mitglieder;

        let info_a = MatchInfo {
            room_id: raum.id,
            opponent: SpielerInfo::from(spieler_b),
            is_player1_first: erster_fuer_a,
        };
        let info_b = MatchInfo {
            room_id: raum.id,
            opponent: SpielerInfo::from(spieler_a),
            is_player1_first: !erster_fuer_a,
        };

        let (ereignis_a, ereignis_b) = if revanche {
            (
                ServerEvent::RematchStarted(info_a),
                ServerEvent::RematchStarted(info_b),
            )
        } else {
            (
                ServerEvent::MatchFound(info_a),
                ServerEvent::MatchFound(info_b),
            )
        };

        self.inner.sink.senden(conn_a, ereignis_a);
        self.inner.sink.senden(conn_b, ereignis_b);
    }

    // ---------------------------------------------------------------
    // Lebenszyklus
    // ---------------------------------------------------------------

    /// Explizites Verlassen des Raums
    ///
    /// Entfernt nur den Index-Eintrag des Aufrufers; die Phase bleibt
    /// unangetastet. Der Aufrufer erhaelt `exitRoom`, das andere
    /// Mitglied `opponentLeft`.
    pub fn verlassen(&self, verbindung: &ConnectionId) -> RoomResult<RoomId> {
        let raum_id = self.index_entfernen(verbindung)?;

        self.inner
            .sink
            .senden(verbindung, ServerEvent::ExitRoom(RaumBezug::neu(raum_id)));
        self.gegner_benachrichtigen(&raum_id, verbindung, ServerEvent::OpponentLeft(RaumBezug::neu(raum_id)));
        self.ggf_entfernen(&raum_id);

        debug!(verbindung = %verbindung, raum = %raum_id, "Raum verlassen");
        Ok(raum_id)
    }

    /// Implizites Verlassen bei Verbindungsabbruch
    ///
    /// Wie [`Self::verlassen`], nur ohne `exitRoom` an den Aufrufer
    /// (dessen Socket ist bereits zu). Gibt `None` zurueck wenn die
    /// Verbindung keinem Raum zugeordnet war.
    pub fn getrennt(&self, verbindung: &ConnectionId) -> Option<RoomId> {
        let raum_id = self.index_entfernen(verbindung).ok()?;

        self.gegner_benachrichtigen(&raum_id, verbindung, ServerEvent::OpponentLeft(RaumBezug::neu(raum_id)));
        self.ggf_entfernen(&raum_id);

        debug!(verbindung = %verbindung, raum = %raum_id, "Raum nach Trennung geraeumt");
        Some(raum_id)
    }

    /// Aufgabe der laufenden Partie
    ///
    /// Nur waehrend `Laufend` gueltig; der Raum wechselt zu `Beendet`
    /// mit leerer Stimmenmenge und der Gegner erhaelt
    /// `opponentSurrender`. Beide Mitglieder bleiben im Raum.
    pub fn aufgeben(&self, verbindung: &ConnectionId) -> RoomResult<()> {
        let raum_id = self.raum_von(verbindung).ok_or(RoomError::RaumNichtGefunden(*verbindung))?;

        {
            let mut raum = self
                .inner
                .raeume
                .get_mut(&raum_id)
                .ok_or(RoomError::RaumNichtGefunden(*verbindung))?;
            if !raum.phase.laeuft() {
                return Err(RoomError::KeinLaufendesSpiel(raum_id));
            }
            raum.phase = SpielPhase::beendet_ohne_stimmen();
        }

        info!(verbindung = %verbindung, raum = %raum_id, "Partie aufgegeben");
        self.gegner_benachrichtigen(
            &raum_id,
            verbindung,
            ServerEvent::OpponentSurrender(RaumBezug::neu(raum_id)),
        );
        Ok(())
    }

    /// Markiert die Partie als regulaer beendet
    ///
    /// Wechselt bedingungslos zu `Beendet` mit leerer Stimmenmenge;
    /// es wird niemand benachrichtigt (beide Clients kennen das
    /// Ergebnis bereits vom Brett).
    pub fn spiel_beendet(&self, verbindung: &ConnectionId) -> RoomResult<()> {
        let raum_id = self.raum_von(verbindung).ok_or(RoomError::RaumNichtGefunden(*verbindung))?;

        let mut raum = self
            .inner
            .raeume
            .get_mut(&raum_id)
            .ok_or(RoomError::RaumNichtGefunden(*verbindung))?;
        raum.phase = SpielPhase::beendet_ohne_stimmen();

        debug!(raum = %raum_id, "Partie beendet");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Abfragen
    // ---------------------------------------------------------------

    /// Raum der Verbindung laut Index
    pub fn raum_von(&self, verbindung: &ConnectionId) -> Option<RoomId> {
        self.inner.index.get(verbindung).map(|eintrag| *eintrag.value())
    }

    /// Anzahl aktiver Raeume
    pub fn anzahl(&self) -> usize {
        self.inner.raeume.len()
    }

    /// Prueft ob der Index die Verbindung noch diesem Raum zuordnet
    pub(crate) fn ist_indiziert(&self, verbindung: &ConnectionId, raum_id: &RoomId) -> bool {
        self.raum_von(verbindung).as_ref() == Some(raum_id)
    }

    pub(crate) fn sink(&self) -> &S {
        &self.inner.sink
    }

    /// Liest den Raum unter einer Kopie
    pub(crate) fn raum_kopie(&self, raum_id: &RoomId) -> Option<Raum> {
        self.inner.raeume.get(raum_id).map(|r| r.value().clone())
    }

    /// Mutiert den Raum unter dem Shard-Lock
    ///
    /// Der Closure darf keine weiteren Registry-Methoden aufrufen
    /// (Shard-Deadlock).
    pub(crate) fn raum_aendern<R>(
        &self,
        raum_id: &RoomId,
        f: impl FnOnce(&mut Raum) -> R,
    ) -> Option<R> {
        self.inner.raeume.get_mut(raum_id).map(|mut r| f(r.value_mut()))
    }

    // ---------------------------------------------------------------
    // Interne Helfer
    // ---------------------------------------------------------------

    fn index_entfernen(&self, verbindung: &ConnectionId) -> RoomResult<RoomId> {
        self.inner
            .index
            .remove(verbindung)
            .map(|(_, raum_id)| raum_id)
            .ok_or(RoomError::RaumNichtGefunden(*verbindung))
    }

    /// Sendet an das andere Mitglied des Raums, falls vorhanden
    fn gegner_benachrichtigen(
        &self,
        raum_id: &RoomId,
        verbindung: &ConnectionId,
        ereignis: ServerEvent,
    ) {
        let gegner = self
            .raum_kopie(raum_id)
            .and_then(|raum| raum.gegner_von(verbindung).map(|(id, _)| *id));
        match gegner {
            Some(gegner) => {
                self.inner.sink.senden(&gegner, ereignis);
            }
            None => warn!(raum = %raum_id, "Gegner nicht bestimmbar"),
        }
    }

    /// Entfernt den Raum wenn kein Index-Eintrag mehr auf ihn zeigt
    fn ggf_entfernen(&self, raum_id: &RoomId) {
        let verwaist = match self.raum_kopie(raum_id) {
            Some(raum) => raum
                .mitglieder
                .iter()
                .all(|(id, _)| !self.ist_indiziert(id, raum_id)),
            None => return,
        };
        if verwaist {
            self.inner.raeume.remove(raum_id);
            info!(raum = %raum_id, "Verwaisten Raum entfernt");
        }
    }
}

// ---------------------------------------------------------------
// Tests
// ---------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::muenze::FesterMuenzwurf;
    use gobang_core::types::{Grade, UserId};
    use std::sync::Mutex;

    /// Aufzeichnender Sink fuer deterministische Tests
    pub(crate) struct TestSink {
        gesendet: Mutex<Vec<(ConnectionId, ServerEvent)>>,
        tote: Mutex<HashSet<ConnectionId>>,
    }

    impl TestSink {
        pub(crate) fn neu() -> Arc<Self> {
            Arc::new(Self {
                gesendet: Mutex::new(Vec::new()),
                tote: Mutex::new(HashSet::new()),
            })
        }

        pub(crate) fn trennen(&self, verbindung: ConnectionId) {
            self.tote.lock().unwrap().insert(verbindung);
        }

        pub(crate) fn ereignisse_fuer(&self, verbindung: &ConnectionId) -> Vec<ServerEvent> {
            self.gesendet
                .lock()
                .unwrap()
                .iter()
                .filter(|(id, _)| id == verbindung)
                .map(|(_, e)| e.clone())
                .collect()
        }

        pub(crate) fn leeren(&self) {
            self.gesendet.lock().unwrap().clear();
        }
    }

    impl EventSink for Arc<TestSink> {
        fn senden(&self, verbindung: &ConnectionId, ereignis: ServerEvent) -> bool {
            if !self.ist_verbunden(verbindung) {
                return false;
            }
            self.gesendet.lock().unwrap().push((*verbindung, ereignis));
            true
        }

        fn ist_verbunden(&self, verbindung: &ConnectionId) -> bool {
            !self.tote.lock().unwrap().contains(verbindung)
        }
    }

    pub(crate) fn spieler(name: &str, grade: u8) -> Spieler {
        Spieler {
            user_id: UserId::new(),
            username: name.to_string(),
            nickname: format!("{name}-nick"),
            grade: Grade::neu(grade).unwrap(),
            profile_image: None,
        }
    }

    pub(crate) fn registry_mit_sink(
        erster_fuer_a: bool,
    ) -> (RoomRegistry<Arc<TestSink>, FesterMuenzwurf>, Arc<TestSink>) {
        let sink = TestSink::neu();
        let registry = RoomRegistry::neu(Arc::clone(&sink), FesterMuenzwurf(erster_fuer_a));
        (registry, sink)
    }

    fn event_namen(ereignisse: &[ServerEvent]) -> Vec<&'static str> {
        ereignisse
            .iter()
            .map(|e| match e {
                ServerEvent::MatchFound(_) => "matchFound",
                ServerEvent::RematchStarted(_) => "rematchStarted",
                ServerEvent::OpponentJoined(_) => "opponentJoined",
                ServerEvent::OpponentLeft(_) => "opponentLeft",
                ServerEvent::OpponentSurrender(_) => "opponentSurrender",
                ServerEvent::ExitRoom(_) => "exitRoom",
                _ => "sonstiges",
            })
            .collect()
    }

    #[test]
    fn raum_erstellen_benachrichtigt_beide_mit_invertierten_flags() {
        let (registry, sink) = registry_mit_sink(true);
        let (a, b) = (ConnectionId::new(), ConnectionId::new());

        let raum_id = registry
            .raum_erstellen((a, spieler("anna", 3)), (b, spieler("bert", 3)))
            .unwrap();

        // Der Wartende bekommt zuerst opponentJoined, dann matchFound
        let bei_a = sink.ereignisse_fuer(&a);
        assert_eq!(event_namen(&bei_a), vec!["opponentJoined", "matchFound"]);

        let bei_b = sink.ereignisse_fuer(&b);
        assert_eq!(event_namen(&bei_b), vec!["matchFound"]);

        let (flag_a, gegner_a) = match &bei_a[1] {
            ServerEvent::MatchFound(info) => (info.is_player1_first, info.opponent.username.clone()),
            _ => unreachable!(),
        };
        let (flag_b, gegner_b) = match &bei_b[0] {
            ServerEvent::MatchFound(info) => (info.is_player1_first, info.opponent.username.clone()),
            _ => unreachable!(),
        };
        assert!(flag_a);
        assert!(!flag_b);
        assert_eq!(gegner_a, "bert");
        assert_eq!(gegner_b, "anna");
        assert_eq!(registry.raum_von(&a), Some(raum_id));
        assert_eq!(registry.raum_von(&b), Some(raum_id));
    }

    #[test]
    fn raum_erstellen_bricht_bei_toter_verbindung_ab() {
        let (registry, sink) = registry_mit_sink(true);
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        sink.trennen(b);

        let ergebnis = registry.raum_erstellen((a, spieler("anna", 3)), (b, spieler("bert", 3)));

        assert!(matches!(ergebnis, Err(RoomError::VerbindungGetrennt(id)) if id == b));
        assert_eq!(registry.anzahl(), 0);
        assert!(registry.raum_von(&a).is_none());
        assert!(sink.ereignisse_fuer(&a).is_empty());
    }

    #[test]
    fn verlassen_benachrichtigt_und_raeumt_erst_beim_letzten() {
        let (registry, sink) = registry_mit_sink(true);
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        registry
            .raum_erstellen((a, spieler("anna", 3)), (b, spieler("bert", 3)))
            .unwrap();
        sink.leeren();

        registry.verlassen(&a).unwrap();
        assert_eq!(event_namen(&sink.ereignisse_fuer(&a)), vec!["exitRoom"]);
        assert_eq!(event_namen(&sink.ereignisse_fuer(&b)), vec!["opponentLeft"]);
        // b ist noch drin, der Raum bleibt bestehen
        assert_eq!(registry.anzahl(), 1);
        assert!(registry.raum_von(&a).is_none());

        registry.verlassen(&b).unwrap();
        assert_eq!(registry.anzahl(), 0);
    }

    #[test]
    fn verlassen_ohne_raum_ist_fehler() {
        let (registry, _sink) = registry_mit_sink(true);
        let fremd = ConnectionId::new();
        assert!(matches!(
            registry.verlassen(&fremd),
            Err(RoomError::RaumNichtGefunden(id)) if id == fremd
        ));
    }

    #[test]
    fn getrennt_sendet_kein_exit_room_an_den_betroffenen() {
        let (registry, sink) = registry_mit_sink(true);
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        registry
            .raum_erstellen((a, spieler("anna", 3)), (b, spieler("bert", 3)))
            .unwrap();
        sink.leeren();

        assert!(registry.getrennt(&a).is_some());
        assert!(sink.ereignisse_fuer(&a).is_empty());
        assert_eq!(event_namen(&sink.ereignisse_fuer(&b)), vec!["opponentLeft"]);

        // Zweiter Aufruf ist ein No-op
        assert!(registry.getrennt(&a).is_none());
    }

    #[test]
    fn aufgeben_beendet_das_spiel_und_meldet_dem_gegner() {
        let (registry, sink) = registry_mit_sink(true);
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        let raum_id = registry
            .raum_erstellen((a, spieler("anna", 3)), (b, spieler("bert", 3)))
            .unwrap();
        sink.leeren();

        registry.aufgeben(&a).unwrap();
        assert_eq!(event_namen(&sink.ereignisse_fuer(&b)), vec!["opponentSurrender"]);
        let raum = registry.raum_kopie(&raum_id).unwrap();
        assert_eq!(raum.phase, SpielPhase::Beendet { stimmen: HashSet::new() });

        // Nochmal aufgeben: Spiel laeuft nicht mehr
        assert!(matches!(
            registry.aufgeben(&a),
            Err(RoomError::KeinLaufendesSpiel(id)) if id == raum_id
        ));
    }

    #[test]
    fn spiel_beendet_wechselt_bedingungslos_und_leert_stimmen() {
        let (registry, _sink) = registry_mit_sink(true);
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        let raum_id = registry
            .raum_erstellen((a, spieler("anna", 3)), (b, spieler("bert", 3)))
            .unwrap();

        registry.spiel_beendet(&a).unwrap();

        // Eine haengende Stimme wird durch erneutes spiel_beendet geleert
        registry.raum_aendern(&raum_id, |raum| {
            raum.phase = SpielPhase::Beendet {
                stimmen: HashSet::from([a]),
            };
        });
        registry.spiel_beendet(&b).unwrap();
        let raum = registry.raum_kopie(&raum_id).unwrap();
        assert_eq!(raum.phase, SpielPhase::Beendet { stimmen: HashSet::new() });
    }
}
