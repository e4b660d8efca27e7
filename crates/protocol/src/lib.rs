//! portier-protocol – Protokoll-Definitionen
//!
//! Dieses Crate definiert alle Signalisierungsnachrichten die zwischen
//! Teilnehmern und Server ausgetauscht werden, sowie das Frame-basierte
//! Wire-Format fuer die TCP-Verbindungen.
//!
//! Die Ereignisnamen auf dem Draht (`register`, `call:initiate`, ...)
//! sind mit den bestehenden Clients kompatibel und daher fest vorgegeben.

pub mod signal;
pub mod wire;

pub use signal::{ClientSignal, IdentityInfo, RegisterStatus, ServerSignal, SocketInfo};
pub use wire::{ClientCodec, FrameCodec, ServerCodec};
