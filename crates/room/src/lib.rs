//! gobang-room – Raum-Verwaltung fuer den Gobang-Server
//!
//! Dieser Crate verwaltet die Spielraeume: Erstellung bei einer Paarung,
//! die Spielzustands-Maschine (laufend/beendet), die Revanche-Abstimmung
//! und die Weiterleitung von Zuegen zwischen den beiden Mitgliedern.
//!
//! ## Architektur
//!
//! ```text
//! RoomRegistry   – Raum-Map + Verbindungs->Raum-Index, Zustandsmaschine
//!     |
//!     +-- RematchCoordinator – Abstimmungsprotokoll auf der Registry
//!     +-- MoveRouter         – Ein-Hop-Weiterleitung der Zugkoordinaten
//!
//! EventSink  – Seam zum Versenden von Ereignissen (Liveness-Pruefung)
//! Muenzwurf  – injizierte Zufallsquelle fuer den ersten Zug
//! ```

pub mod error;
pub mod muenze;
pub mod registry;
pub mod relay;
pub mod rematch;
pub mod sink;

// Bequeme Re-Exporte
pub use error::{RoomError, RoomResult};
pub use muenze::{FesterMuenzwurf, Muenzwurf, ZufallsMuenze};
pub use registry::{Raum, RoomRegistry, SpielPhase};
pub use relay::MoveRouter;
pub use rematch::RematchCoordinator;
pub use sink::EventSink;
