//! gobang-protocol – Protokoll-Definitionen fuer den Gobang-Server
//!
//! Definiert alle Ereignisse die ueber die persistente TCP-Verbindung
//! zwischen Client und Server ausgetauscht werden, sowie das Frame-Format
//! (Laenge + JSON).

pub mod control;
pub mod wire;

pub use control::{ClientEvent, MatchInfo, Meldung, ServerEvent, SpielerInfo, ZugDaten};
pub use wire::{ClientCodec, FrameCodec, ServerCodec};
