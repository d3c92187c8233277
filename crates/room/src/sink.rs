//! EventSink – Seam zwischen Spiellogik und Verbindungsschicht
//!
//! Die Raum- und Match-Logik kennt keine Sockets; sie spricht nur gegen
//! diesen Trait. Die Verbindungsschicht implementiert ihn mit ihren
//! Send-Queues, Tests mit einem aufzeichnenden Stub.

use gobang_core::types::ConnectionId;
use gobang_protocol::control::ServerEvent;

/// Versendet Ereignisse an Verbindungen und prueft deren Liveness
pub trait EventSink: Send + Sync {
    /// Sendet ein Ereignis nicht-blockierend an die Verbindung
    ///
    /// Gibt `false` zurueck wenn die Verbindung unbekannt ist oder die
    /// Queue voll/geschlossen ist.
    fn senden(&self, verbindung: &ConnectionId, ereignis: ServerEvent) -> bool;

    /// Prueft ob die Verbindung noch lebt
    ///
    /// Jeder Pfad der aus Sweeper-Funden einen Raum erstellt muss dies
    /// unmittelbar vor dem Versenden erneut pruefen (die Verbindung kann
    /// zwischen Queue-Pop und Raum-Erstellung getrennt worden sein).
    fn ist_verbunden(&self, verbindung: &ConnectionId) -> bool;
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn senden(&self, verbindung: &ConnectionId, ereignis: ServerEvent) -> bool {
        (**self).senden(verbindung, ereignis)
    }

    fn ist_verbunden(&self, verbindung: &ConnectionId) -> bool {
        (**self).ist_verbunden(verbindung)
    }
}
