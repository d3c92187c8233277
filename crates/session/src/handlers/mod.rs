//! Handler fuer alle Client-Ereignisse
//!
//! Jeder Handler ist fuer eine Ereignisgruppe zustaendig und hat
//! Zugriff auf den gemeinsamen SessionState.

pub mod auth_handler;
pub mod match_handler;
pub mod move_handler;
pub mod rematch_handler;
pub mod room_handler;
