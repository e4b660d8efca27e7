//! In-Memory-Verzeichnis fuer Tests
//!
//! Gleiche Semantik wie [`crate::JsonVerzeichnis`], aber ohne Platte.
//! Clone teilt den inneren Zustand.

use std::sync::Arc;

use parking_lot::RwLock;
use portier_core::types::{ConnectionId, Slug};

use crate::error::{Result, VerzeichnisError};
use crate::records::{GastRecord, RezeptionistRecord, ZimmerRecord};
use crate::store::{RecordArt, VerzeichnisRepository};

#[derive(Debug, Default)]
struct MemoryBestand {
    zimmer: Vec<ZimmerRecord>,
    gaeste: Vec<GastRecord>,
    rezeptionisten: Vec<RezeptionistRecord>,
}

/// In-Memory-Implementierung des Verzeichnisses
#[derive(Debug, Clone, Default)]
pub struct MemoryVerzeichnis {
    bestand: Arc<RwLock<MemoryBestand>>,
}

impl MemoryVerzeichnis {
    /// Erstellt ein leeres Verzeichnis
    pub fn neu() -> Self {
        Self::default()
    }

    /// Erstellt ein Verzeichnis mit vorbefuelltem Bestand
    pub fn mit_bestand(
        zimmer: Vec<ZimmerRecord>,
        rezeptionisten: Vec<RezeptionistRecord>,
    ) -> Self {
        Self {
            bestand: Arc::new(RwLock::new(MemoryBestand {
                zimmer,
                gaeste: Vec::new(),
                rezeptionisten,
            })),
        }
    }

    /// Gibt die Anzahl der Gast-Datensaetze zurueck
    pub fn gast_anzahl(&self) -> usize {
        self.bestand.read().gaeste.len()
    }
}

impl VerzeichnisRepository for MemoryVerzeichnis {
    async fn zimmer_nach_slug(&self, slug: &Slug) -> Result<Option<ZimmerRecord>> {
        Ok(self
            .bestand
            .read()
            .zimmer
            .iter()
            .find(|z| &z.slug == slug)
            .cloned())
    }

    async fn gast_nach_slug(&self, slug: &Slug) -> Result<Option<GastRecord>> {
        Ok(self
            .bestand
            .read()
            .gaeste
            .iter()
            .find(|g| &g.slug == slug)
            .cloned())
    }

    async fn rezeptionist_nach_slug(&self, slug: &Slug) -> Result<Option<RezeptionistRecord>> {
        Ok(self
            .bestand
            .read()
            .rezeptionisten
            .iter()
            .find(|r| &r.slug == slug)
            .cloned())
    }

    async fn gast_anhaengen(&self, gast: GastRecord) -> Result<()> {
        self.bestand.write().gaeste.push(gast);
        Ok(())
    }

    async fn verbindungs_ref_setzen(
        &self,
        slug: &Slug,
        art: RecordArt,
        verbindung: Option<ConnectionId>,
    ) -> Result<()> {
        let mut bestand = self.bestand.write();
        match art {
            RecordArt::Rezeptionist => {
                let eintrag = bestand
                    .rezeptionisten
                    .iter_mut()
                    .find(|r| &r.slug == slug)
                    .ok_or_else(|| VerzeichnisError::nicht_gefunden(slug.as_str()))?;
                eintrag.connection_ref = verbindung;
                Ok(())
            }
            RecordArt::Gast => {
                let eintrag = bestand
                    .gaeste
                    .iter_mut()
                    .find(|g| &g.slug == slug)
                    .ok_or_else(|| VerzeichnisError::nicht_gefunden(slug.as_str()))?;
                eintrag.connection_ref = verbindung;
                Ok(())
            }
            RecordArt::Zimmer => Err(VerzeichnisError::UngueltigeDaten(
                "Zimmer tragen keine Verbindungs-Referenz".into(),
            )),
        }
    }

    async fn alle_zimmer(&self) -> Result<Vec<ZimmerRecord>> {
        Ok(self.bestand.read().zimmer.clone())
    }

    async fn alle_rezeptionisten(&self) -> Result<Vec<RezeptionistRecord>> {
        Ok(self.bestand.read().rezeptionisten.clone())
    }
}
