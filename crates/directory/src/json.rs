//! JSON-Datei-Verzeichnis
//!
//! Haelt den Bestand in drei flachen JSON-Dateien im konfigurierten
//! Datenverzeichnis: `rooms.json`, `guests.json` und `receptionist.json`.
//! Jede Mutation liest die betroffene Datei vollstaendig, aendert sie im
//! Speicher und schreibt sie komplett zurueck. Fuer den erwarteten Bestand
//! (dutzende Datensaetze) ist das voellig ausreichend.

use std::path::{Path, PathBuf};

use portier_core::types::{ConnectionId, Slug};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, VerzeichnisError};
use crate::records::{GastRecord, RezeptionistRecord, ZimmerRecord};
use crate::store::{RecordArt, VerzeichnisRepository};

/// Dateinamen des Bestands (kompatibel mit dem bestehenden Datenbestand)
const ZIMMER_DATEI: &str = "rooms.json";
const GAESTE_DATEI: &str = "guests.json";
const REZEPTIONISTEN_DATEI: &str = "receptionist.json";

/// Verzeichnis-Implementierung auf flachen JSON-Dateien
#[derive(Debug, Clone)]
pub struct JsonVerzeichnis {
    pfad: PathBuf,
}

impl JsonVerzeichnis {
    /// Erstellt ein Verzeichnis ueber dem gegebenen Datenpfad
    pub fn neu(pfad: impl Into<PathBuf>) -> Self {
        Self { pfad: pfad.into() }
    }

    /// Gibt den Datenpfad zurueck
    pub fn pfad(&self) -> &Path {
        &self.pfad
    }

    /// Liest eine Bestandsdatei; eine fehlende Datei ist ein leerer Bestand
    async fn lese_bestand<T: DeserializeOwned>(&self, datei: &str) -> Result<Vec<T>> {
        let pfad = self.pfad.join(datei);
        match tokio::fs::read(&pfad).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Schreibt eine Bestandsdatei vollstaendig zurueck
    async fn schreibe_bestand<T: Serialize>(&self, datei: &str, bestand: &[T]) -> Result<()> {
        tokio::fs::create_dir_all(&self.pfad).await?;
        let bytes = serde_json::to_vec_pretty(bestand)?;
        tokio::fs::write(self.pfad.join(datei), bytes).await?;
        Ok(())
    }
}

impl VerzeichnisRepository for JsonVerzeichnis {
    async fn zimmer_nach_slug(&self, slug: &Slug) -> Result<Option<ZimmerRecord>> {
        let zimmer: Vec<ZimmerRecord> = self.lese_bestand(ZIMMER_DATEI).await?;
        Ok(zimmer.into_iter().find(|z| &z.slug == slug))
    }

    async fn gast_nach_slug(&self, slug: &Slug) -> Result<Option<GastRecord>> {
        let gaeste: Vec<GastRecord> = self.lese_bestand(GAESTE_DATEI).await?;
        Ok(gaeste.into_iter().find(|g| &g.slug == slug))
    }

    async fn rezeptionist_nach_slug(&self, slug: &Slug) -> Result<Option<RezeptionistRecord>> {
        let rezeptionisten: Vec<RezeptionistRecord> =
            self.lese_bestand(REZEPTIONISTEN_DATEI).await?;
        Ok(rezeptionisten.into_iter().find(|r| &r.slug == slug))
    }

    async fn gast_anhaengen(&self, gast: GastRecord) -> Result<()> {
        let mut gaeste: Vec<GastRecord> = self.lese_bestand(GAESTE_DATEI).await?;
        tracing::debug!(slug = %gast.slug, room = %gast.room, "Gast-Datensatz angehaengt");
        gaeste.push(gast);
        self.schreibe_bestand(GAESTE_DATEI, &gaeste).await
    }

    async fn verbindungs_ref_setzen(
        &self,
        slug: &Slug,
        art: RecordArt,
        verbindung: Option<ConnectionId>,
    ) -> Result<()> {
        match art {
            RecordArt::Rezeptionist => {
                let mut bestand: Vec<RezeptionistRecord> =
                    self.lese_bestand(REZEPTIONISTEN_DATEI).await?;
                let eintrag = bestand
                    .iter_mut()
                    .find(|r| &r.slug == slug)
                    .ok_or_else(|| VerzeichnisError::nicht_gefunden(slug.as_str()))?;
                eintrag.connection_ref = verbindung;
                self.schreibe_bestand(REZEPTIONISTEN_DATEI, &bestand).await
            }
            RecordArt::Gast => {
                let mut bestand: Vec<GastRecord> = self.lese_bestand(GAESTE_DATEI).await?;
                let eintrag = bestand
                    .iter_mut()
                    .find(|g| &g.slug == slug)
                    .ok_or_else(|| VerzeichnisError::nicht_gefunden(slug.as_str()))?;
                eintrag.connection_ref = verbindung;
                self.schreibe_bestand(GAESTE_DATEI, &bestand).await
            }
            RecordArt::Zimmer => Err(VerzeichnisError::UngueltigeDaten(
                "Zimmer tragen keine Verbindungs-Referenz".into(),
            )),
        }
    }

    async fn alle_zimmer(&self) -> Result<Vec<ZimmerRecord>> {
        self.lese_bestand(ZIMMER_DATEI).await
    }

    async fn alle_rezeptionisten(&self) -> Result<Vec<RezeptionistRecord>> {
        self.lese_bestand(REZEPTIONISTEN_DATEI).await
    }
}
