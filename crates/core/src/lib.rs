//! portier-core – Gemeinsame Typen und Fehlertypen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Portier-Crates gemeinsam genutzt werden: Newtype-IDs, die
//! Teilnehmer-Rolle und den zentralen Fehler-Enum.

pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{PortierError, Result};
pub use types::{ConnectionId, Rolle, Slug};
