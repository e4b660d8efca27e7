//! Signal-Vermittlung
//!
//! Leitet call:*-Nachrichten zwischen registrierten Teilnehmern weiter.
//! Der Absender wird ausschliesslich aus der Verbindung aufgeloest, nie
//! aus dem Payload; das Ziel ueber seinen Slug im Register. Vermittlung
//! ist Fire-and-Forget ohne Zustellbestaetigung und ohne Anruf-Zustand.

use portier_core::types::{ConnectionId, Rolle, Slug};
use portier_protocol::signal::{IdentityInfo, ServerSignal};

use crate::registry::VerbindungsRegister;

/// Vermittelt Signale ueber das Verbindungs-Register
#[derive(Debug, Clone)]
pub struct SignalRelay {
    register: VerbindungsRegister,
}

impl SignalRelay {
    pub fn neu(register: VerbindungsRegister) -> Self {
        Self { register }
    }

    /// Leitet ein Signal an das Ziel weiter
    ///
    /// `rolle` schraenkt das Ziel zusaetzlich auf eine Rolle ein
    /// (call:initiate und call:stop); `baue` erzeugt das annotierte
    /// Server-Signal aus Absender- und Ziel-Identitaet.
    ///
    /// Rueckgabe ist die Antwort an den Absender: `None` bei Erfolg,
    /// sonst eine `call_error`-Nachricht.
    pub fn weiterleiten(
        &self,
        verbindung: ConnectionId,
        ziel: &Slug,
        rolle: Option<Rolle>,
        baue: impl FnOnce(IdentityInfo, IdentityInfo) -> ServerSignal,
    ) -> Option<ServerSignal> {
        // Absender muss registriert sein, sonst gibt es keine Identitaet
        // mit der die Nachricht annotiert werden koennte
        let Some(absender) = self.register.nach_verbindung(&verbindung) else {
            tracing::warn!(
                verbindung = %verbindung,
                ziel = %ziel,
                "Signal von nicht registrierter Verbindung"
            );
            return Some(ServerSignal::nicht_erreichbar());
        };

        let ziel_eintrag = match rolle {
            Some(rolle) => self.register.nach_slug_und_rolle(ziel, rolle),
            None => self.register.nach_slug(ziel),
        };
        let Some(ziel_eintrag) = ziel_eintrag else {
            tracing::info!(
                von = %absender.identity.slug,
                ziel = %ziel,
                "Ziel nicht erreichbar"
            );
            return Some(ServerSignal::nicht_erreichbar());
        };

        let signal = baue(
            absender.identity.als_info(),
            ziel_eintrag.identity.als_info(),
        );
        if !ziel_eintrag.sender.senden(signal) {
            // Queue voll oder Empfaenger-Task bereits weg
            return Some(ServerSignal::nicht_erreichbar());
        }

        tracing::debug!(
            von = %absender.identity.slug,
            nach = %ziel_eintrag.identity.slug,
            "Signal vermittelt"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Identity;
    use tokio::sync::mpsc;

    fn registriere(
        register: &VerbindungsRegister,
        slug: &str,
        rolle: Rolle,
    ) -> (ConnectionId, mpsc::Receiver<ServerSignal>) {
        let identity = Identity {
            slug: Slug::from(slug),
            rolle,
            anzeige_name: slug.to_string(),
            verbindung: ConnectionId::new(),
        };
        let verbindung = identity.verbindung;
        let (tx, rx) = mpsc::channel(8);
        register.eintragen(identity, tx);
        (verbindung, rx)
    }

    #[test]
    fn weiterleitung_annotiert_absender() {
        let register = VerbindungsRegister::neu();
        let relay = SignalRelay::neu(register.clone());
        let (gast, _gast_rx) = registriere(&register, "zimmer-5", Rolle::Gast);
        let (_empfang, mut empfang_rx) =
            registriere(&register, "front-desk", Rolle::Rezeptionist);

        let antwort = relay.weiterleiten(
            gast,
            &Slug::from("front-desk"),
            Some(Rolle::Rezeptionist),
            |from, to| ServerSignal::CallInitiate {
                from,
                to,
                role: Rolle::Rezeptionist,
            },
        );

        assert!(antwort.is_none());
        match empfang_rx.try_recv().unwrap() {
            ServerSignal::CallInitiate { from, .. } => {
                assert_eq!(from.slug, Slug::from("zimmer-5"));
            }
            andere => panic!("Unerwartetes Signal: {andere:?}"),
        }
    }

    #[test]
    fn unbekanntes_ziel_gibt_fehler() {
        let register = VerbindungsRegister::neu();
        let relay = SignalRelay::neu(register.clone());
        let (gast, _rx) = registriere(&register, "zimmer-5", Rolle::Gast);

        let antwort = relay.weiterleiten(gast, &Slug::from("niemand"), None, |from, to| {
            ServerSignal::CallEnd { from, to }
        });
        assert_eq!(antwort, Some(ServerSignal::nicht_erreichbar()));
    }

    #[test]
    fn falsche_ziel_rolle_gibt_fehler() {
        let register = VerbindungsRegister::neu();
        let relay = SignalRelay::neu(register.clone());
        let (gast_a, _rx_a) = registriere(&register, "zimmer-5", Rolle::Gast);
        let (_gast_b, mut rx_b) = registriere(&register, "zimmer-6", Rolle::Gast);

        // Ziel ist registriert, aber kein Rezeptionist
        let antwort = relay.weiterleiten(
            gast_a,
            &Slug::from("zimmer-6"),
            Some(Rolle::Rezeptionist),
            |from, to| ServerSignal::CallInitiate {
                from,
                to,
                role: Rolle::Rezeptionist,
            },
        );
        assert_eq!(antwort, Some(ServerSignal::nicht_erreichbar()));
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn nicht_registrierter_absender_gibt_fehler() {
        let register = VerbindungsRegister::neu();
        let relay = SignalRelay::neu(register.clone());
        let (_empfang, mut empfang_rx) =
            registriere(&register, "front-desk", Rolle::Rezeptionist);

        let antwort = relay.weiterleiten(
            ConnectionId::new(),
            &Slug::from("front-desk"),
            None,
            |from, to| ServerSignal::CallEnd { from, to },
        );
        assert_eq!(antwort, Some(ServerSignal::nicht_erreichbar()));
        assert!(empfang_rx.try_recv().is_err());
    }
}
