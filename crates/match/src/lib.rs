//! gobang-match – Matchmaking fuer den Gobang-Server
//!
//! Drei Bausteine, in Abhaengigkeitsreihenfolge:
//!
//! - [`MatchQueue`]: Grade-gebuckelte FIFO-Wartepools. Erzwingt selbst
//!   keine Eindeutigkeit; das uebernimmt der MatchMaker.
//! - [`MatchMaker`]: Beantwortet eine Suchanfrage mit einer sofortigen
//!   Paarung (g, g-1, g+1, g-2, g+2) oder reiht den Anfragenden ein.
//! - [`EscalationSweeper`]: Periodischer Durchlauf, der den Suchradius
//!   wartezeitabhaengig ausweitet und liegengebliebene Eintraege
//!   austraegt. Der Tick ist synchron und wird von aussen getaktet,
//!   damit Tests die Zeit deterministisch vorspulen koennen.
//!
//! Die Uhr ist ueber den [`Uhr`]-Trait injiziert.

pub mod config;
pub mod matchmaker;
pub mod queue;
pub mod sweeper;
pub mod uhr;

pub use config::MatchConfig;
pub use matchmaker::MatchMaker;
pub use queue::{MatchQueue, QueueEntry};
pub use sweeper::EscalationSweeper;
pub use uhr::{SystemUhr, TestUhr, Uhr};

#[cfg(test)]
pub(crate) mod testhilfe;
