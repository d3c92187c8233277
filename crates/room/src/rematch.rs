//! RematchCoordinator – Revanche-Abstimmung auf der RoomRegistry
//!
//! Nach einer beendeten Partie koennen beide Mitglieder per Stimme eine
//! Revanche anfordern. Das Protokoll ist bewusst asymmetrisch: eine
//! Annahme startet die Revanche ohne eigene Stimme, sobald mindestens
//! eine fremde Stimme vorliegt. Waehrend einer laufenden Partie werden
//! alle Abstimmungs-Ereignisse ignoriert.

use tracing::{debug, warn};

use gobang_core::types::{ConnectionId, RoomId};
use gobang_protocol::control::{Meldung, ServerEvent};

use crate::registry::{RoomRegistry, SpielPhase};
use crate::muenze::Muenzwurf;
use crate::sink::EventSink;

/// Ausgang einer Stimm-Mutation unter dem Raum-Lock
enum Ausgang {
    /// Partie laeuft oder Stimme bereits vorhanden
    Ignoriert,
    /// Stimme gespeichert; `alle` wenn beide Mitglieder gestimmt haben
    Gespeichert { gegner: ConnectionId, alle: bool },
    /// Annahme ohne vorliegende Anfrage
    KeineAnfrage,
    /// Revanche kann starten
    Startbereit,
}

/// Koordiniert die Revanche-Abstimmung eines Raums
pub struct RematchCoordinator<S, M> {
    raeume: RoomRegistry<S, M>,
}

impl<S, M> Clone for RematchCoordinator<S, M> {
    fn clone(&self) -> Self {
        Self {
            raeume: self.raeume.clone(),
        }
    }
}

impl<S: EventSink, M: Muenzwurf> RematchCoordinator<S, M> {
    pub fn neu(raeume: RoomRegistry<S, M>) -> Self {
        Self { raeume }
    }

    /// Fordert eine Revanche an
    ///
    /// Der Gegner erhaelt `rematchRequested`, der Aufrufer die
    /// Bestaetigung `rematchRequestSent`. Haben danach beide Mitglieder
    /// gestimmt, startet die Revanche sofort.
    pub fn revanche_anfragen(&self, verbindung: &ConnectionId) {
        let Some(raum_id) = self.raum_oder_fehler(verbindung) else {
            return;
        };

        let ausgang = self.raeume.raum_aendern(&raum_id, |raum| {
            let gegner = match raum.gegner_von(verbindung) {
                Some((id, _)) => *id,
                None => return Ausgang::Ignoriert,
            };
            match &mut raum.phase {
                SpielPhase::Laufend => Ausgang::Ignoriert,
                SpielPhase::Beendet { stimmen } => {
                    if !stimmen.insert(*verbindung) {
                        return Ausgang::Ignoriert;
                    }
                    Ausgang::Gespeichert {
                        gegner,
                        alle: stimmen.len() == 2,
                    }
                }
            }
        });

        match ausgang {
            Some(Ausgang::Gespeichert { gegner, alle }) => {
                self.raeume.sink().senden(
                    &gegner,
                    ServerEvent::RematchRequested(Meldung::neu("Dein Gegner moechte eine Revanche")),
                );
                self.raeume.sink().senden(
                    verbindung,
                    ServerEvent::RematchRequestSent(Meldung::neu("Revanche-Anfrage gesendet")),
                );
                if alle {
                    self.revanche_starten(&raum_id);
                }
            }
            _ => debug!(verbindung = %verbindung, raum = %raum_id, "Revanche-Anfrage ignoriert"),
        }
    }

    /// Nimmt eine vorliegende Revanche-Anfrage an
    ///
    /// Startet die Revanche ohne eigene Stimme des Annehmenden. Liegt
    /// keine Anfrage vor, erhaelt der Aufrufer `rematchError` und der
    /// Raum bleibt unveraendert.
    pub fn revanche_annehmen(&self, verbindung: &ConnectionId) {
        let Some(raum_id) = self.raum_oder_fehler(verbindung) else {
            return;
        };

        let ausgang = self.raeume.raum_aendern(&raum_id, |raum| match &raum.phase {
            SpielPhase::Laufend => Ausgang::Ignoriert,
            SpielPhase::Beendet { stimmen } if stimmen.is_empty() => Ausgang::KeineAnfrage,
            SpielPhase::Beendet { .. } => Ausgang::Startbereit,
        });

        match ausgang {
            Some(Ausgang::Startbereit) => self.revanche_starten(&raum_id),
            Some(Ausgang::KeineAnfrage) => {
                self.raeume.sink().senden(
                    verbindung,
                    ServerEvent::RematchError(Meldung::neu("Keine offene Revanche-Anfrage")),
                );
            }
            _ => debug!(verbindung = %verbindung, raum = %raum_id, "Revanche-Annahme ignoriert"),
        }
    }

    /// Lehnt die Revanche ab und verwirft die komplette Stimmenmenge
    pub fn revanche_ablehnen(&self, verbindung: &ConnectionId) {
        let Some(raum_id) = self.raum_oder_fehler(verbindung) else {
            return;
        };

        let gegner = self.raeume.raum_aendern(&raum_id, |raum| {
            if let SpielPhase::Beendet { stimmen } = &mut raum.phase {
                stimmen.clear();
            }
            raum.gegner_von(verbindung).map(|(id, _)| *id)
        });

        if let Some(Some(gegner)) = gegner {
            self.raeume.sink().senden(
                &gegner,
                ServerEvent::RematchRejected(Meldung::neu("Dein Gegner hat die Revanche abgelehnt")),
            );
        }
    }

    /// Zieht nur die eigene Stimme zurueck
    pub fn revanche_abbrechen(&self, verbindung: &ConnectionId) {
        let Some(raum_id) = self.raum_oder_fehler(verbindung) else {
            return;
        };

        let gegner = self.raeume.raum_aendern(&raum_id, |raum| {
            if let SpielPhase::Beendet { stimmen } = &mut raum.phase {
                stimmen.remove(verbindung);
            }
            raum.gegner_von(verbindung).map(|(id, _)| *id)
        });

        if let Some(Some(gegner)) = gegner {
            self.raeume.sink().senden(
                &gegner,
                ServerEvent::RematchCanceled(Meldung::neu("Dein Gegner hat die Revanche-Anfrage zurueckgezogen")),
            );
        }
    }

    // ---------------------------------------------------------------
    // Intern
    // ---------------------------------------------------------------

    /// Startet die Revanche nach bestandenem Doppelstart-Schutz
    ///
    /// Schlaegt laut (Log) aber folgenlos fehl, wenn der Raum fehlt,
    /// ein Mitglied den Raum inzwischen verlassen hat oder die Partie
    /// bereits laeuft.
    fn revanche_starten(&self, raum_id: &RoomId) {
        let Some(raum) = self.raeume.raum_kopie(raum_id) else {
            warn!(raum = %raum_id, "Revanche-Start ohne Raum");
            return;
        };
        for (verbindung, _) in &raum.mitglieder {
            if !self.raeume.ist_indiziert(verbindung, raum_id) {
                warn!(raum = %raum_id, verbindung = %verbindung, "Revanche-Start mit fehlendem Mitglied");
                return;
            }
        }

        let gestartet = self.raeume.raum_aendern(raum_id, |raum| {
            if raum.phase.laeuft() {
                warn!(raum = %raum.id, "Doppelter Revanche-Start unterdrueckt");
                return false;
            }
            raum.phase = SpielPhase::Laufend;
            true
        });

        if gestartet == Some(true) {
            if let Some(raum) = self.raeume.raum_kopie(raum_id) {
                debug!(raum = %raum_id, "Revanche gestartet");
                self.raeume.paarung_senden(&raum, true);
            }
        }
    }

    /// Loest den Raum auf oder meldet `rematchError` an den Aufrufer
    fn raum_oder_fehler(&self, verbindung: &ConnectionId) -> Option<RoomId> {
        match self.raeume.raum_von(verbindung) {
            Some(raum_id) => Some(raum_id),
            None => {
                self.raeume.sink().senden(
                    verbindung,
                    ServerEvent::RematchError(Meldung::neu("Du bist in keinem Raum")),
                );
                None
            }
        }
    }
}

// ---------------------------------------------------------------
// Tests
// ---------------------------------------------------------------
