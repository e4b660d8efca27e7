//! portier-signaling – Verbindungs-Register und Signalisierungs-Vermittlung
//!
//! Dieser Crate implementiert den Kern von Portier: die prozess-lokale
//! Zuordnung von stabiler Teilnehmer-Identitaet zu lebender Verbindung,
//! die Weiterleitungsregeln fuer Signalisierungsnachrichten und das
//! Aufraeumen beim Trennen einer Verbindung.
//!
//! ## Architektur
//!
//! ```text
//! TCP Listener (SignalingServer)
//!     |
//!     v
//! ClientConnection (pro Verbindung ein Task)
//!     |
//!     v
//! SignalDispatcher
//!     |
//!     +-- LifecycleManager  (register / disconnect, haelt Register und
//!     |                      Verzeichnis konsistent)
//!     +-- SignalRelay       (call:* Weiterleitung ueber das Register)
//!
//! VerbindungsRegister – wer ist gerade ueber welche Verbindung erreichbar
//! ```
//!
//! Das Register ist der einzige geteilte veraenderliche Zustand und damit
//! der einzige Serialisierungspunkt; Verzeichnis-IO laeuft nie unter einem
//! Register-Lock.

pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod lifecycle;
pub mod registry;
pub mod relay;
pub mod server_state;
pub mod tcp;

// Bequeme Re-Exporte
pub use connection::ClientConnection;
pub use dispatcher::{DispatcherContext, SignalDispatcher};
pub use error::{SignalingError, SignalingResult};
pub use lifecycle::LifecycleManager;
pub use registry::{ClientSender, Identity, RegistryEintrag, VerbindungsRegister};
pub use relay::SignalRelay;
pub use server_state::{SignalingConfig, SignalingState};
pub use tcp::SignalingServer;
