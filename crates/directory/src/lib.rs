//! portier-directory – Identitaets-Verzeichnis
//!
//! Dieses Crate stellt das Repository-Pattern fuer den dauerhaften Bestand
//! an bekannten Zimmern, Gaesten und Rezeptionisten bereit. Das Verzeichnis
//! ist der einzige dauerhafte Zustand des Systems; wer gerade *erreichbar*
//! ist, weiss ausschliesslich das Verbindungs-Register im Signaling-Crate.
//!
//! Zwei Implementierungen:
//! - [`JsonVerzeichnis`] – flache JSON-Dateien (`rooms.json`, `guests.json`,
//!   `receptionist.json`), kompatibel mit dem bestehenden Datenbestand
//! - [`MemoryVerzeichnis`] – In-Memory-Variante fuer Tests

pub mod error;
pub mod json;
pub mod memory;
pub mod records;
pub mod store;

pub use error::{Result, VerzeichnisError};
pub use json::JsonVerzeichnis;
pub use memory::MemoryVerzeichnis;
pub use records::{GastRecord, RezeptionistRecord, ZimmerRecord, ZimmerStatus};
pub use store::{RecordArt, VerzeichnisRepository};
