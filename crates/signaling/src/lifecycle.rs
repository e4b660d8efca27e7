//! Verbindungs-Lebenszyklus
//!
//! Haelt Verbindungs-Register und Identitaets-Verzeichnis beim
//! Registrieren und Trennen konsistent. Verzeichnisfehler brechen nur die
//! laufende Operation ab; die Verbindung selbst bleibt bestehen.

use std::sync::Arc;

use portier_core::types::{ConnectionId, Rolle, Slug};
use portier_directory::{GastRecord, RecordArt, VerzeichnisRepository};
use portier_protocol::signal::ServerSignal;
use tokio::sync::mpsc;

use crate::error::SignalingResult;
use crate::registry::{Identity, VerbindungsRegister};

/// Verwaltet Registrieren und Trennen von Teilnehmern
#[derive(Debug)]
pub struct LifecycleManager<V> {
    register: VerbindungsRegister,
    verzeichnis: Arc<V>,
}

impl<V> Clone for LifecycleManager<V> {
    fn clone(&self) -> Self {
        Self {
            register: self.register.clone(),
            verzeichnis: Arc::clone(&self.verzeichnis),
        }
    }
}

impl<V: VerzeichnisRepository> LifecycleManager<V> {
    pub fn neu(register: VerbindungsRegister, verzeichnis: Arc<V>) -> Self {
        Self {
            register,
            verzeichnis,
        }
    }

    /// Bindet eine Identitaet an die Verbindung
    ///
    /// Rezeptionisten muessen im Verzeichnis stehen; fuer Gaeste wird beim
    /// ersten Registrieren eines bekannten Zimmers ein Gast-Datensatz
    /// synthetisiert. Ein Slug ohne Verzeichnis-Treffer wird ohne
    /// Rueckmeldung verworfen (`Ok(None)`).
    pub async fn registrieren(
        &self,
        verbindung: ConnectionId,
        slug: Slug,
        rolle: Rolle,
        tx: mpsc::Sender<ServerSignal>,
    ) -> SignalingResult<Option<Identity>> {
        let identity = match rolle {
            Rolle::Rezeptionist => self.rezeptionist_aufloesen(verbindung, &slug).await?,
            Rolle::Gast => self.gast_aufloesen(verbindung, &slug).await?,
        };

        let Some(identity) = identity else {
            tracing::warn!(
                slug = %slug,
                rolle = %rolle,
                "Registrierung ohne Verzeichnis-Treffer, verworfen"
            );
            return Ok(None);
        };

        self.register.eintragen(identity.clone(), tx);
        tracing::info!(
            slug = %identity.slug,
            rolle = %identity.rolle,
            verbindung = %verbindung,
            "Teilnehmer registriert"
        );
        Ok(Some(identity))
    }

    async fn rezeptionist_aufloesen(
        &self,
        verbindung: ConnectionId,
        slug: &Slug,
    ) -> SignalingResult<Option<Identity>> {
        let Some(record) = self.verzeichnis.rezeptionist_nach_slug(slug).await? else {
            return Ok(None);
        };
        self.verzeichnis
            .verbindungs_ref_setzen(slug, RecordArt::Rezeptionist, Some(verbindung))
            .await?;
        Ok(Some(Identity {
            slug: slug.clone(),
            rolle: Rolle::Rezeptionist,
            anzeige_name: record.name,
            verbindung,
        }))
    }

    async fn gast_aufloesen(
        &self,
        verbindung: ConnectionId,
        slug: &Slug,
    ) -> SignalingResult<Option<Identity>> {
        if let Some(gast) = self.verzeichnis.gast_nach_slug(slug).await? {
            self.verzeichnis
                .verbindungs_ref_setzen(slug, RecordArt::Gast, Some(verbindung))
                .await?;
            return Ok(Some(Identity {
                slug: slug.clone(),
                rolle: Rolle::Gast,
                anzeige_name: gast.room,
                verbindung,
            }));
        }

        // Erstes Registrieren eines Zimmer-Geraets: Gast-Datensatz aus dem
        // Zimmer synthetisieren
        let Some(zimmer) = self.verzeichnis.zimmer_nach_slug(slug).await? else {
            return Ok(None);
        };
        self.verzeichnis
            .gast_anhaengen(GastRecord {
                slug: slug.clone(),
                room: zimmer.name.clone(),
                connection_ref: Some(verbindung),
                erstellt_am: chrono::Utc::now(),
            })
            .await?;
        tracing::info!(slug = %slug, zimmer = %zimmer.name, "Gast-Datensatz angelegt");
        Ok(Some(Identity {
            slug: slug.clone(),
            rolle: Rolle::Gast,
            anzeige_name: zimmer.name,
            verbindung,
        }))
    }

    /// Raeumt eine getrennte Verbindung auf (idempotent)
    ///
    /// Nur Rezeptionisten-Datensaetze verlieren beim Trennen ihre
    /// Verbindungs-Referenz im Verzeichnis; Gast-Datensaetze behalten die
    /// letzte bekannte Referenz (Kompatibilitaet mit dem Datenbestand).
    pub async fn trennen(&self, verbindung: ConnectionId) {
        let Some(identity) = self.register.entfernen_verbindung(&verbindung) else {
            tracing::debug!(verbindung = %verbindung, "Trennung ohne Register-Eintrag");
            return;
        };

        tracing::info!(
            slug = %identity.slug,
            rolle = %identity.rolle,
            verbindung = %verbindung,
            "Teilnehmer abgemeldet"
        );

        if identity.rolle == Rolle::Rezeptionist {
            if let Err(e) = self
                .verzeichnis
                .verbindungs_ref_setzen(&identity.slug, RecordArt::Rezeptionist, None)
                .await
            {
                tracing::error!(
                    slug = %identity.slug,
                    fehler = %e,
                    "Verbindungs-Referenz konnte nicht geloescht werden"
                );
            }
        }
    }
}
