//! Gemeinsame Test-Stubs fuer das Matchmaking

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use gobang_core::types::{ConnectionId, Grade, Spieler, UserId};
use gobang_protocol::control::ServerEvent;
use gobang_room::EventSink;

pub(crate) fn spieler(name: &str, grade: u8) -> Spieler {
    Spieler {
        user_id: UserId::new(),
        username: name.to_string(),
        nickname: format!("{name}-nick"),
        grade: Grade::neu(grade).unwrap(),
        profile_image: None,
    }
}

/// Aufzeichnender Sink mit abschaltbaren Verbindungen
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

impl EventSink for TestSink {
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
