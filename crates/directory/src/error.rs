//! Fehlertypen fuer das Verzeichnis-Crate

use thiserror::Error;

/// Result-Alias fuer Verzeichnis-Operationen
pub type Result<T> = std::result::Result<T, VerzeichnisError>;

/// Verzeichnis-Fehlertypen
#[derive(Debug, Error)]
pub enum VerzeichnisError {
    #[error("Datensatz nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Ungueltige Daten: {0}")]
    UngueltigeDaten(String),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON-Fehler: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Interner Verzeichnis-Fehler: {0}")]
    Intern(String),
}

impl VerzeichnisError {
    pub fn nicht_gefunden(msg: impl Into<String>) -> Self {
        Self::NichtGefunden(msg.into())
    }

    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }
}
