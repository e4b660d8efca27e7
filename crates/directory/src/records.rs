//! Datensaetze des Identitaets-Verzeichnisses
//!
//! Die Feldnamen auf der Platte folgen dem bestehenden JSON-Datenbestand
//! (`rooms.json` usw.), daher camelCase-Renames wo noetig. Die
//! `connection_ref`-Felder sind ein denormalisierter Best-Effort-Cache der
//! letzten bekannten Verbindung; massgeblich fuer Erreichbarkeit ist immer
//! das Verbindungs-Register, nie das Verzeichnis.

use portier_core::types::{ConnectionId, Slug};
use serde::{Deserialize, Serialize};

/// Belegungsstatus eines Zimmers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZimmerStatus {
    Available,
    Occupied,
    Cleaning,
    Maintenance,
}

/// Zimmer-Datensatz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZimmerRecord {
    pub id: u32,
    pub name: String,
    pub slug: Slug,
    pub floor: i32,
    pub status: ZimmerStatus,
    /// Geraete-Fingerprint des Zimmer-Terminals
    pub fingerprint: String,
}

/// Gast-Datensatz
///
/// Wird beim ersten Registrieren eines Zimmer-Geraets aus dem
/// Zimmer-Datensatz synthetisiert und an den Gast-Bestand angehaengt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GastRecord {
    pub slug: Slug,
    /// Anzeigename des zugehoerigen Zimmers
    pub room: String,
    #[serde(rename = "connectionRef", default)]
    pub connection_ref: Option<ConnectionId>,
    #[serde(default = "chrono::Utc::now")]
    pub erstellt_am: chrono::DateTime<chrono::Utc>,
}

/// Rezeptionisten-Datensatz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RezeptionistRecord {
    pub slug: Slug,
    pub name: String,
    #[serde(rename = "connectionRef", default)]
    pub connection_ref: Option<ConnectionId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zimmer_status_wire_format() {
        let json = serde_json::to_string(&ZimmerStatus::Available).unwrap();
        assert_eq!(json, "\"AVAILABLE\"");
    }

    #[test]
    fn zimmer_record_aus_bestand() {
        // Format des bestehenden rooms.json-Bestands
        let json = r#"{
            "id": 101,
            "name": "Suite 101",
            "slug": "zimmer-101",
            "floor": 1,
            "status": "OCCUPIED",
            "fingerprint": "ab:cd:ef"
        }"#;
        let zimmer: ZimmerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(zimmer.slug, Slug::from("zimmer-101"));
        assert_eq!(zimmer.status, ZimmerStatus::Occupied);
    }

    #[test]
    fn rezeptionist_ohne_connection_ref() {
        let json = r#"{"slug": "front-desk", "name": "Empfang"}"#;
        let r: RezeptionistRecord = serde_json::from_str(json).unwrap();
        assert!(r.connection_ref.is_none());
    }

    #[test]
    fn gast_connection_ref_heisst_camel_case() {
        let gast = GastRecord {
            slug: Slug::from("zimmer-5"),
            room: "Zimmer 5".into(),
            connection_ref: Some(ConnectionId::new()),
            erstellt_am: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&gast).unwrap();
        assert!(json.get("connectionRef").is_some());
        assert!(json.get("connection_ref").is_none());
    }
}
