//! Gemeinsamer Server-Zustand der Sitzungsschicht
//!
//! Haelt alle geteilten Komponenten der Spiellogik als Arc-basierte
//! Handles, die sicher zwischen tokio-Tasks geteilt werden koennen.
//! Kontodienst, Muenzwurf und Uhr sind generisch injiziert, damit
//! Tests deterministische Implementierungen einsetzen koennen.

use std::sync::Arc;
use std::time::Instant;

use gobang_accounts::AccountStore;
use gobang_match::{MatchMaker, MatchQueue, Uhr};
use gobang_room::{MoveRouter, Muenzwurf, RematchCoordinator, RoomRegistry};

use crate::broadcast::ConnectionRegistry;
use crate::session::SessionManager;

/// Gemeinsamer Server-Zustand (thread-safe, Arc-geteilt)
pub struct SessionState<A, M, U>
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    /// Kontodienst (einmaliger Lookup pro Verbindung)
    pub konten: Arc<A>,
    /// Sitzungen (Verbindung -> Spieler)
    pub sessions: SessionManager,
    /// Send-Queues aller Verbindungen; EventSink der Spiellogik
    pub verbindungen: ConnectionRegistry,
    /// Wartepools des Matchmakings
    pub queue: Arc<MatchQueue>,
    /// Raum-Verwaltung und Spielzustand
    pub raeume: RoomRegistry<ConnectionRegistry, M>,
    /// Sofort-Vermittlung
    pub matchmaker: MatchMaker<ConnectionRegistry, M, U>,
    /// Revanche-Abstimmung
    pub revanche: RematchCoordinator<ConnectionRegistry, M>,
    /// Zug-Weiterleitung
    pub zuege: MoveRouter<ConnectionRegistry, M>,
    /// Startzeitpunkt des Servers (fuer Uptime-Berechnung)
    pub start_zeit: Instant,
}

impl<A, M, U> SessionState<A, M, U>
where
    A: AccountStore + 'static,
    M: Muenzwurf + 'static,
    U: Uhr + Clone + 'static,
{
    /// Verdrahtet alle Komponenten um eine gemeinsame Registry
    pub fn neu(konten: Arc<A>, muenze: M, uhr: U) -> Arc<Self> {
        let verbindungen = ConnectionRegistry::neu();
        let queue = Arc::new(MatchQueue::neu());
        let raeume = RoomRegistry::neu(verbindungen.clone(), muenze);
        let matchmaker = MatchMaker::neu(
            Arc::clone(&queue),
            raeume.clone(),
            verbindungen.clone(),
            uhr,
        );
        let revanche = RematchCoordinator::neu(raeume.clone());
        let zuege = MoveRouter::neu(raeume.clone());

        Arc::new(Self {
            konten,
            sessions: SessionManager::neu(),
            verbindungen,
            queue,
            raeume,
            matchmaker,
            revanche,
            zuege,
            start_zeit: Instant::now(),
        })
    }

    /// Gibt die Uptime in Sekunden zurueck
    pub fn uptime_sek(&self) -> u64 {
        self.start_zeit.elapsed().as_secs()
    }
}
