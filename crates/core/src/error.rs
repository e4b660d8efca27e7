//! Fehlertypen fuer Portier
//!
//! Zentraler Fehler-Enum der alle moeglichen Fehlerzustaende abdeckt.
//! Untermodule koennen eigene Fehler definieren und via `#[from]`
//! konvertieren.

use thiserror::Error;

/// Globaler Result-Alias fuer Portier
pub type Result<T> = std::result::Result<T, PortierError>;

/// Alle moeglichen Fehler im Portier-System
#[derive(Debug, Error)]
pub enum PortierError {
    // --- Verbindung & Netzwerk ---
    #[error("Verbindung fehlgeschlagen: {0}")]
    Verbindung(String),

    #[error("Verbindung getrennt: {0}")]
    Getrennt(String),

    // --- Protokoll ---
    #[error("Ungueltige Nachricht: {0}")]
    UngueltigeNachricht(String),

    // --- Routing ---
    #[error("Teilnehmer nicht erreichbar: {0}")]
    NichtErreichbar(String),

    #[error("Absender nicht registriert")]
    NichtRegistriert,

    // --- Verzeichnis ---
    #[error("Verzeichnisfehler: {0}")]
    Verzeichnis(String),

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl PortierError {
    /// Erstellt einen internen Fehler aus einer beliebigen Nachricht
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Gibt true zurueck wenn der Fehler nur die aktuelle Operation betrifft
    ///
    /// Verzeichnis- und Routing-Fehler brechen nie die Verbindung oder den
    /// Prozess ab, nur den gerade laufenden Vorgang.
    pub fn ist_lokal(&self) -> bool {
        matches!(
            self,
            Self::Verzeichnis(_) | Self::NichtErreichbar(_) | Self::NichtRegistriert
        )
    }
}
