//! Verbindungs-Register
//!
//! Prozess-lokale Zuordnung von Slug zu lebender Verbindung. Das Register
//! ist die alleinige Wahrheit fuer Erreichbarkeit: nur wer hier eingetragen
//! ist, kann Signale empfangen. Der Inhalt ist fluechtig und wird bei einem
//! Neustart des Prozesses vollstaendig verworfen.
//!
//! Neben dem Primaerindex (Slug -> Eintrag) haelt das Register einen
//! Sekundaerindex (ConnectionId -> Slug), damit der Absender eines Signals
//! aus seiner Verbindung aufgeloest werden kann, ohne Payload-Felder zu
//! vertrauen.

use std::sync::Arc;

use dashmap::DashMap;
use portier_core::types::{ConnectionId, Rolle, Slug};
use portier_protocol::signal::{IdentityInfo, ServerSignal};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Identitaet und Sender
// ---------------------------------------------------------------------------

/// Laufzeit-Identitaet eines registrierten Teilnehmers
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Stabiler Verzeichnis-Slug
    pub slug: Slug,
    /// Aufgeloeste Rolle
    pub rolle: Rolle,
    /// Anzeigename (Zimmername bzw. Rezeptionisten-Name)
    pub anzeige_name: String,
    /// Verbindung an die diese Identitaet gebunden ist
    pub verbindung: ConnectionId,
}

impl Identity {
    /// Annotation fuer weitergeleitete Nachrichten
    pub fn als_info(&self) -> IdentityInfo {
        IdentityInfo {
            slug: self.slug.clone(),
            role: self.rolle,
            name: self.anzeige_name.clone(),
        }
    }
}

/// Sende-Handle zu einem verbundenen Teilnehmer
///
/// Kapselt die mpsc-Queue des Verbindungs-Tasks. Senden blockiert nie:
/// eine volle oder geschlossene Queue laesst das Signal fallen.
#[derive(Debug, Clone)]
pub struct ClientSender {
    verbindung: ConnectionId,
    tx: mpsc::Sender<ServerSignal>,
}

impl ClientSender {
    pub fn neu(verbindung: ConnectionId, tx: mpsc::Sender<ServerSignal>) -> Self {
        Self { verbindung, tx }
    }

    /// Stellt ein Signal in die Sende-Queue des Teilnehmers
    pub fn senden(&self, signal: ServerSignal) -> bool {
        match self.tx.try_send(signal) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(
                    verbindung = %self.verbindung,
                    "Sende-Queue voll, Signal verworfen"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(
                    verbindung = %self.verbindung,
                    "Sende-Queue geschlossen, Signal verworfen"
                );
                false
            }
        }
    }
}

/// Register-Eintrag: Identitaet plus Sende-Handle
#[derive(Debug, Clone)]
pub struct RegistryEintrag {
    pub identity: Identity,
    pub sender: ClientSender,
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct RegisterInner {
    /// Primaerindex: Slug -> Eintrag
    nach_slug: DashMap<Slug, RegistryEintrag>,
    /// Sekundaerindex: Verbindung -> Slug
    nach_verbindung: DashMap<ConnectionId, Slug>,
}

/// Verbindungs-Register (Clone teilt den Zustand)
#[derive(Debug, Clone, Default)]
pub struct VerbindungsRegister {
    inner: Arc<RegisterInner>,
}

impl VerbindungsRegister {
    /// Erstellt ein leeres Register
    pub fn neu() -> Self {
        Self::default()
    }

    /// Traegt eine Identitaet ein; ein bestehender Eintrag unter demselben
    /// Slug wird ersetzt (letzter gewinnt)
    pub fn eintragen(&self, identity: Identity, tx: mpsc::Sender<ServerSignal>) {
        let slug = identity.slug.clone();
        let verbindung = identity.verbindung;
        let eintrag = RegistryEintrag {
            sender: ClientSender::neu(verbindung, tx),
            identity,
        };

        if let Some(alt) = self.inner.nach_slug.insert(slug.clone(), eintrag) {
            // Die verdraengte Verbindung bleibt offen, ist aber nicht mehr
            // adressierbar; ihr Sekundaerindex-Eintrag muss weg
            if alt.identity.verbindung != verbindung {
                self.inner.nach_verbindung.remove(&alt.identity.verbindung);
                tracing::info!(
                    slug = %slug,
                    alte_verbindung = %alt.identity.verbindung,
                    neue_verbindung = %verbindung,
                    "Bestehende Registrierung verdraengt"
                );
            }
        }

        // Registriert dieselbe Verbindung einen anderen Slug, muss auch
        // ihr bisheriger Primaereintrag verschwinden, sonst bliebe die
        // alte Identitaet scheinbar erreichbar
        if let Some(alter_slug) = self.inner.nach_verbindung.insert(verbindung, slug.clone()) {
            if alter_slug != slug {
                self.inner
                    .nach_slug
                    .remove_if(&alter_slug, |_, e| e.identity.verbindung == verbindung);
                tracing::info!(
                    verbindung = %verbindung,
                    alter_slug = %alter_slug,
                    neuer_slug = %slug,
                    "Slug-Bindung der Verbindung ersetzt"
                );
            }
        }
    }

    /// Sucht einen Eintrag anhand des Slugs
    pub fn nach_slug(&self, slug: &Slug) -> Option<RegistryEintrag> {
        self.inner.nach_slug.get(slug).map(|e| e.clone())
    }

    /// Sucht einen Eintrag anhand von Slug und Rolle
    pub fn nach_slug_und_rolle(&self, slug: &Slug, rolle: Rolle) -> Option<RegistryEintrag> {
        self.nach_slug(slug).filter(|e| e.identity.rolle == rolle)
    }

    /// Loest die Identitaet hinter einer Verbindung auf
    ///
    /// Liefert nur Treffer wenn der Slug-Eintrag noch zu genau dieser
    /// Verbindung gehoert; verdraengte Verbindungen sind nicht adressierbar.
    pub fn nach_verbindung(&self, verbindung: &ConnectionId) -> Option<RegistryEintrag> {
        let slug = self.inner.nach_verbindung.get(verbindung)?.clone();
        self.nach_slug(&slug)
            .filter(|e| &e.identity.verbindung == verbindung)
    }

    /// Entfernt den Eintrag unter einem Slug (No-op wenn nicht vorhanden)
    pub fn entfernen(&self, slug: &Slug) {
        if let Some((_, eintrag)) = self.inner.nach_slug.remove(slug) {
            self.inner
                .nach_verbindung
                .remove(&eintrag.identity.verbindung);
        }
    }

    /// Entfernt den Eintrag einer Verbindung, falls sie noch adressierbar ist
    ///
    /// Idempotent: die zweite Trennung derselben Verbindung ist ein No-op.
    pub fn entfernen_verbindung(&self, verbindung: &ConnectionId) -> Option<Identity> {
        let (_, slug) = self.inner.nach_verbindung.remove(verbindung)?;
        // Der Slug-Eintrag wird nur geraeumt wenn er noch zu dieser
        // Verbindung gehoert (er koennte bereits verdraengt worden sein)
        self.inner
            .nach_slug
            .remove_if(&slug, |_, e| &e.identity.verbindung == verbindung)
            .map(|(_, e)| e.identity)
    }

    /// Prueft ob ein Slug gerade erreichbar ist
    pub fn ist_erreichbar(&self, slug: &Slug) -> bool {
        self.inner.nach_slug.contains_key(slug)
    }

    /// Anzahl der registrierten Teilnehmer
    pub fn anzahl(&self) -> usize {
        self.inner.nach_slug.len()
    }
}
