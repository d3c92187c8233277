//! Fehlertypen fuer die Konto-Abfrage

use thiserror::Error;

/// Fehlertyp fuer den AccountStore
#[derive(Debug, Error)]
pub enum AccountError {
    /// Benutzername existiert nicht
    #[error("Benutzer nicht gefunden: {0}")]
    NichtGefunden(String),

    /// Store nicht erreichbar – Authentifizierung schlaegt geschlossen fehl
    #[error("AccountStore nicht erreichbar: {0}")]
    NichtErreichbar(String),
}

/// Result-Typ fuer Konto-Abfragen
pub type AccountResult<T> = Result<T, AccountError>;
