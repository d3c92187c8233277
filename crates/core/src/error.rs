//! Fehlertypen fuer Gobang
//!
//! Der Kern kennt nur Fehler, die beim Konstruieren der gemeinsamen
//! Typen entstehen koennen. Die Schichten darueber definieren eigene
//! Fehlertypen (RoomError, AccountError, SessionError) und
//! konvertieren bei Bedarf via `#[from]`.

use thiserror::Error;

/// Fehler beim Konstruieren der gemeinsamen Typen
#[derive(Debug, Error)]
pub enum GobangError {
    #[error("Ungueltiger Grade: {0} (erlaubt ist 1..=18)")]
    UngueltigerGrade(u8),
}
