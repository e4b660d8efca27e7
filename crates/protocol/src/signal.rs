//! Signalisierungs-Protokoll
//!
//! Definiert die geschlossenen Nachrichten-Unions fuer beide Richtungen:
//! `ClientSignal` (Teilnehmer -> Server) und `ServerSignal` (Server ->
//! Teilnehmer). Beide verwenden dieselben Ereignisnamen auf dem Draht;
//! die Formen unterscheiden sich, weil der Server weitergeleitete
//! Nachrichten mit den vollen Identitaeten von Absender und Empfaenger
//! annotiert.
//!
//! ## Design
//! - Tagged Enums fuer typsichere Nachrichtentypen (ein erschoepfendes
//!   `match` pro Richtung, kein dynamischer Event-Dispatch)
//! - Adjazentes Tagging `{"event": ..., "data": {...}}`: der Ereignisname
//!   steht neben dem Payload, damit Payload-Felder wie `type` nicht mit
//!   dem Tag kollidieren
//! - Der Absender-Slug steht nie im Payload – er wird serverseitig aus
//!   der Verbindung aufgeloest
//! - `offer`/`answer`/`candidate` sind opake JSON-Werte und werden
//!   unveraendert kopiert

use portier_core::types::{ConnectionId, Rolle, Slug};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identitaets-Annotationen
// ---------------------------------------------------------------------------

/// Volle Identitaet eines Teilnehmers in weitergeleiteten Nachrichten
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityInfo {
    /// Stabiler Verzeichnis-Slug
    pub slug: Slug,
    /// Rolle des Teilnehmers
    pub role: Rolle,
    /// Anzeigename (Zimmername bzw. Rezeptionisten-Name)
    pub name: String,
}

/// Socket-Informationen in der Registrierungs-Bestaetigung
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketInfo {
    /// ID der lebenden Verbindung
    pub id: ConnectionId,
    /// Registrierter Slug
    pub user: Slug,
    /// Aufgeloeste Rolle
    #[serde(rename = "type")]
    pub role: Rolle,
}

/// Status-Feld der Registrierungs-Bestaetigung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterStatus {
    #[serde(rename = "REGISTERED")]
    Registered,
}

// ---------------------------------------------------------------------------
// ClientSignal: Teilnehmer -> Server
// ---------------------------------------------------------------------------

/// Alle Nachrichten die ein Teilnehmer an den Server senden darf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientSignal {
    /// Identitaet an die Verbindung binden
    #[serde(rename = "register")]
    Register { slug: Slug, role: Rolle },

    /// Anruf starten (rollengeprueft)
    #[serde(rename = "call:initiate")]
    CallInitiate {
        to: Slug,
        #[serde(rename = "type")]
        role: Rolle,
    },

    /// Session-Description-Angebot weiterleiten
    #[serde(rename = "call:offer")]
    CallOffer { to: Slug, offer: serde_json::Value },

    /// Session-Description-Antwort weiterleiten
    #[serde(rename = "call:answer")]
    CallAnswer {
        to: Slug,
        answer: serde_json::Value,
    },

    /// Netzwerk-Kandidat weiterleiten
    #[serde(rename = "call:candidate")]
    CallCandidate {
        to: Slug,
        candidate: serde_json::Value,
    },

    /// Anruf ablehnen
    #[serde(rename = "call:reject")]
    CallReject { to: Slug },

    /// Klingeln beenden (rollengeprueft)
    #[serde(rename = "call:stop")]
    CallStop {
        to: Slug,
        #[serde(rename = "type")]
        role: Rolle,
    },

    /// Laufenden Anruf beenden
    #[serde(rename = "call:end")]
    CallEnd { to: Slug },
}

// ---------------------------------------------------------------------------
// ServerSignal: Server -> Teilnehmer
// ---------------------------------------------------------------------------

/// Alle Nachrichten die der Server an einen Teilnehmer sendet
///
/// Weitergeleitete Varianten tragen denselben Ereignisnamen wie ihr
/// eingehendes Gegenstueck, annotiert mit `from` und `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerSignal {
    /// Bestaetigung einer erfolgreichen Registrierung
    #[serde(rename = "registered")]
    Registered {
        status: RegisterStatus,
        socket: SocketInfo,
    },

    #[serde(rename = "call:initiate")]
    CallInitiate {
        from: IdentityInfo,
        to: IdentityInfo,
        #[serde(rename = "type")]
        role: Rolle,
    },

    #[serde(rename = "call:offer")]
    CallOffer {
        from: IdentityInfo,
        to: IdentityInfo,
        offer: serde_json::Value,
    },

    #[serde(rename = "call:answer")]
    CallAnswer {
        from: IdentityInfo,
        to: IdentityInfo,
        answer: serde_json::Value,
    },

    #[serde(rename = "call:candidate")]
    CallCandidate {
        from: IdentityInfo,
        to: IdentityInfo,
        candidate: serde_json::Value,
    },

    #[serde(rename = "call:reject")]
    CallReject { from: IdentityInfo, to: IdentityInfo },

    #[serde(rename = "call:stop")]
    CallStop {
        from: IdentityInfo,
        to: IdentityInfo,
        #[serde(rename = "type")]
        role: Rolle,
    },

    #[serde(rename = "call:end")]
    CallEnd { from: IdentityInfo, to: IdentityInfo },

    /// Fehler-Rueckmeldung an den Absender
    #[serde(rename = "call_error")]
    CallError { message: String },
}

impl ServerSignal {
    /// Erstellt eine Registrierungs-Bestaetigung
    pub fn registriert(id: ConnectionId, slug: Slug, role: Rolle) -> Self {
        Self::Registered {
            status: RegisterStatus::Registered,
            socket: SocketInfo {
                id,
                user: slug,
                role,
            },
        }
    }

    /// Erstellt eine Fehler-Rueckmeldung
    pub fn fehler(message: impl Into<String>) -> Self {
        Self::CallError {
            message: message.into(),
        }
    }

    /// Standard-Fehler wenn Absender oder Ziel nicht registriert sind
    pub fn nicht_erreichbar() -> Self {
        Self::fehler("User not available")
    }
}
