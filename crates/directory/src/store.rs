//! Repository-Trait fuer das Identitaets-Verzeichnis
//!
//! Das Repository-Pattern entkoppelt den Signaling-Kern von der konkreten
//! Ablage (JSON-Dateien, Datenbank, entfernter Dienst). Der Kern verlangt
//! nur Punkt-Lookups und gezielte Upserts; Lesezugriffe muessen den
//! jeweils letzten abgeschlossenen Schreibzugriff widerspiegeln.

use portier_core::types::{ConnectionId, Slug};

use crate::error::Result;
use crate::records::{GastRecord, RezeptionistRecord, ZimmerRecord};

/// Art eines Verzeichnis-Datensatzes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordArt {
    Zimmer,
    Gast,
    Rezeptionist,
}

impl std::fmt::Display for RecordArt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zimmer => write!(f, "zimmer"),
            Self::Gast => write!(f, "gast"),
            Self::Rezeptionist => write!(f, "rezeptionist"),
        }
    }
}

/// Repository fuer Verzeichnis-Zugriffe
///
/// Alle Operationen sind Einmal-Versuche ohne Retry; ein Fehler bricht
/// nur die aktuelle Operation ab, nie den Prozess.
#[allow(async_fn_in_trait)]
pub trait VerzeichnisRepository: Send + Sync {
    /// Ein Zimmer anhand seines Slugs laden
    async fn zimmer_nach_slug(&self, slug: &Slug) -> Result<Option<ZimmerRecord>>;

    /// Einen Gast anhand seines Slugs laden
    async fn gast_nach_slug(&self, slug: &Slug) -> Result<Option<GastRecord>>;

    /// Einen Rezeptionisten anhand seines Slugs laden
    async fn rezeptionist_nach_slug(&self, slug: &Slug) -> Result<Option<RezeptionistRecord>>;

    /// Einen neuen Gast-Datensatz an den Bestand anhaengen
    async fn gast_anhaengen(&self, gast: GastRecord) -> Result<()>;

    /// Die Verbindungs-Referenz eines Datensatzes setzen oder loeschen
    ///
    /// Nur Gast- und Rezeptionisten-Datensaetze tragen eine
    /// Verbindungs-Referenz; `RecordArt::Zimmer` ist ein Fehler.
    async fn verbindungs_ref_setzen(
        &self,
        slug: &Slug,
        art: RecordArt,
        verbindung: Option<ConnectionId>,
    ) -> Result<()>;

    /// Alle Zimmer laden (fuer die HTTP-Listen-Endpunkte)
    async fn alle_zimmer(&self) -> Result<Vec<ZimmerRecord>>;

    /// Alle Rezeptionisten laden (fuer die HTTP-Listen-Endpunkte)
    async fn alle_rezeptionisten(&self) -> Result<Vec<RezeptionistRecord>>;
}
