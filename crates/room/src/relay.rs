//! MoveRouter – Ein-Hop-Weiterleitung der Zugkoordinaten
//!
//! Der Server validiert keine Zuege und fuehrt kein Brett: ein
//! `doPlayer` des einen Mitglieds wird unveraendert als `doOpponent`
//! an das andere Mitglied weitergereicht.

use tracing::debug;

use gobang_core::types::ConnectionId;
use gobang_protocol::control::{ServerEvent, ZugDaten};

use crate::muenze::Muenzwurf;
use crate::registry::RoomRegistry;
use crate::sink::EventSink;

/// Leitet Zuege zwischen den beiden Raum-Mitgliedern weiter
pub struct MoveRouter<S, M> {
    raeume: RoomRegistry<S, M>,
}

impl<S, M> Clone for MoveRouter<S, M> {
    fn clone(&self) -> Self {
        Self {
            raeume: self.raeume.clone(),
        }
    }
}

impl<S: EventSink, M: Muenzwurf> MoveRouter<S, M> {
    pub fn neu(raeume: RoomRegistry<S, M>) -> Self {
        Self { raeume }
    }

    /// Reicht die Koordinaten an den Gegner weiter
    ///
    /// Ohne Raum-Zuordnung ist der Aufruf ein No-op (der Client kann
    /// kurz nach einem Verlassen noch Zuege nachschieben).
    pub fn zug_weiterleiten(&self, verbindung: &ConnectionId, zug: ZugDaten) {
        let Some(raum_id) = self.raeume.raum_von(verbindung) else {
            debug!(verbindung = %verbindung, "Zug ohne Raum verworfen");
            return;
        };
        let gegner = self
            .raeume
            .raum_kopie(&raum_id)
            .and_then(|raum| raum.gegner_von(verbindung).map(|(id, _)| *id));
        if let Some(gegner) = gegner {
            self.raeume
                .sink()
                .senden(&gegner, ServerEvent::DoOpponent(zug));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::{registry_mit_sink, spieler};

    #[test]
    fn zug_erreicht_nur_den_gegner() {
        let (registry, sink) = registry_mit_sink(true);
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        registry
            .raum_erstellen((a, spieler("anna", 9)), (b, spieler("bert", 9)))
            .unwrap();
        sink.leeren();
        let router = MoveRouter::neu(registry);

        router.zug_weiterleiten(&a, ZugDaten { x: 7, y: 11 });

        assert!(sink.ereignisse_fuer(&a).is_empty());
        let bei_b = sink.ereignisse_fuer(&b);
        assert_eq!(bei_b.len(), 1);
        match &bei_b[0] {
            ServerEvent::DoOpponent(zug) => {
                assert_eq!((zug.x, zug.y), (7, 11));
            }
            sonst => panic!("Unerwartetes Ereignis: {sonst:?}"),
        }
    }

    #[test]
    fn zug_ohne_raum_ist_ein_no_op() {
        let (registry, sink) = registry_mit_sink(true);
        let fremd = ConnectionId::new();
        let router = MoveRouter::neu(registry);

        router.zug_weiterleiten(&fremd, ZugDaten { x: 0, y: 0 });

        assert!(sink.ereignisse_fuer(&fremd).is_empty());
    }
}
