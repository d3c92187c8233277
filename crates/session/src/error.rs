//! Fehlertypen fuer die Sitzungsschicht

use gobang_accounts::AccountError;
use thiserror::Error;

/// Fehlertyp fuer die Sitzungsschicht
#[derive(Debug, Error)]
pub enum SessionError {
    /// IO-Fehler (TCP, Socket)
    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    /// Konto-Lookup fehlgeschlagen
    #[error("Kontofehler: {0}")]
    Konto(#[from] AccountError),

    /// Protokollfehler (ungueltiges Frame, falscher Zustand)
    #[error("Protokollfehler: {0}")]
    Protokoll(String),
}

/// Result-Typ fuer die Sitzungsschicht
pub type SessionResult<T> = Result<T, SessionError>;
