//! gobang-accounts – Konto-Abfrage fuer den Gobang-Server
//!
//! Die Konto- und Punkteverwaltung ist ein externer Mitspieler; dieser
//! Crate definiert nur den Abfrage-Vertrag (`AccountStore`) und eine
//! In-Memory-Implementierung fuer Betrieb und Tests. Das Profil wird
//! genau einmal pro Verbindung geladen und danach in der Session
//! zwischengespeichert.

pub mod error;
pub mod store;

pub use error::{AccountError, AccountResult};
pub use store::{AccountStore, MemoryAccountStore};
