//! Gemeinsame Identifikationstypen fuer Portier
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen. Der `Slug` ist
//! der stabile, vom Verzeichnis vergebene Routing-Schluessel; die
//! `ConnectionId` identifiziert eine einzelne lebende Verbindung.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige ID einer lebenden Verbindung
///
/// Wird beim Verbindungsaufbau zufaellig vergeben und ist nach dem
/// Trennen der Verbindung bedeutungslos. Routing laeuft niemals ueber
/// diese ID, sondern ueber den `Slug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Erstellt eine neue zufaellige ConnectionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn:{}", self.0)
    }
}

/// Stabiler, vom Verzeichnis vergebener Bezeichner
///
/// Zimmer, Gaeste und Rezeptionisten werden ueber ihren Slug adressiert,
/// unabhaengig davon ueber welche Verbindung sie gerade erreichbar sind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug(pub String);

impl Slug {
    /// Erstellt einen neuen Slug
    pub fn neu(wert: impl Into<String>) -> Self {
        Self(wert.into())
    }

    /// Gibt den Slug als &str zurueck
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Slug {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Slug {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rolle eines Teilnehmers
///
/// Bestimmt den Registrierungspfad im Verzeichnis und wird bei
/// `call:initiate` und `call:stop` zusaetzlich zum Slug geprueft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rolle {
    /// Zimmer-Geraet bzw. Gast
    #[serde(rename = "guest")]
    Gast,
    /// Rezeptions-Arbeitsplatz
    #[serde(rename = "receptionist")]
    Rezeptionist,
}

impl std::fmt::Display for Rolle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gast => write!(f, "guest"),
            Self::Rezeptionist => write!(f, "receptionist"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_id_eindeutig() {
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        assert_ne!(a, b, "Zwei neue ConnectionIds muessen verschieden sein");
    }

    #[test]
    fn connection_id_display() {
        let id = ConnectionId(Uuid::nil());
        assert!(id.to_string().starts_with("conn:"));
    }

    #[test]
    fn slug_aus_str_und_string() {
        let a = Slug::from("zimmer-101");
        let b = Slug::from(String::from("zimmer-101"));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "zimmer-101");
    }

    #[test]
    fn rolle_serde_wire_namen() {
        let json = serde_json::to_string(&Rolle::Gast).unwrap();
        assert_eq!(json, "\"guest\"");
        let r: Rolle = serde_json::from_str("\"receptionist\"").unwrap();
        assert_eq!(r, Rolle::Rezeptionist);
    }

    #[test]
    fn ids_sind_serde_kompatibel() {
        let cid = ConnectionId::new();
        let json = serde_json::to_string(&cid).unwrap();
        let cid2: ConnectionId = serde_json::from_str(&json).unwrap();
        assert_eq!(cid, cid2);
    }
}
