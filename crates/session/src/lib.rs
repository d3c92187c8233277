//! gobang-session – Verbindungs- und Sitzungsschicht
//!
//! Diese Schicht verbindet das TCP-Protokoll mit der Spiellogik:
//!
//! - [`ConnectionRegistry`]: Send-Queues aller Verbindungen; implementiert
//!   den `EventSink`-Trait der Spiellogik.
//! - [`SessionManager`]: Verbindung -> authentifizierter Spieler.
//! - [`EventDispatcher`]: routet Client-Ereignisse an die Handler und
//!   orchestriert das Aufraeumen bei Verbindungsende.
//! - [`ClientConnection`]: ein tokio-Task pro TCP-Verbindung.
//! - [`GameServer`]: TCP-Accept-Loop.

pub mod broadcast;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod server_state;
pub mod session;
pub mod tcp;

pub use broadcast::ConnectionRegistry;
pub use connection::ClientConnection;
pub use dispatcher::{DispatchAusgang, DispatcherContext, EventDispatcher};
pub use error::{SessionError, SessionResult};
pub use server_state::SessionState;
pub use session::SessionManager;
pub use tcp::GameServer;
