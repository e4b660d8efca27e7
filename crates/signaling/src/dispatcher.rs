//! Signal-Dispatcher
//!
//! Ein erschoepfendes `match` ueber alle Client-Signale: `register` geht
//! an den Lifecycle, alle call:*-Nachrichten an die Vermittlung. Die
//! Rueckgabe ist die direkte Antwort an den Absender (Ack oder Fehler);
//! weitergeleitete Signale laufen ueber die Sende-Queue des Ziels.

use std::net::SocketAddr;
use std::sync::Arc;

use portier_core::types::ConnectionId;
use portier_directory::VerzeichnisRepository;
use portier_protocol::signal::{ClientSignal, ServerSignal};
use tokio::sync::mpsc;

use crate::relay::SignalRelay;
use crate::server_state::SignalingState;

/// Kontext der Verbindung die das Signal geliefert hat
#[derive(Debug, Clone)]
pub struct DispatcherContext {
    pub verbindung: ConnectionId,
    pub peer_addr: SocketAddr,
    /// Sende-Queue des eigenen Verbindungs-Tasks (wird beim Registrieren
    /// in das Register eingetragen)
    pub sende_tx: mpsc::Sender<ServerSignal>,
}

/// Verteilt eingehende Signale auf Lifecycle und Vermittlung
pub struct SignalDispatcher<V> {
    state: Arc<SignalingState<V>>,
    relay: SignalRelay,
}

impl<V: VerzeichnisRepository> SignalDispatcher<V> {
    pub fn neu(state: Arc<SignalingState<V>>) -> Self {
        let relay = SignalRelay::neu(state.register.clone());
        Self { state, relay }
    }

    /// Verarbeitet ein Client-Signal; Rueckgabe ist die direkte Antwort
    /// an den Absender (falls eine faellig ist)
    pub async fn dispatch(
        &self,
        signal: ClientSignal,
        ctx: &DispatcherContext,
    ) -> Option<ServerSignal> {
        match signal {
            ClientSignal::Register { slug, role } => {
                match self
                    .state
                    .lifecycle
                    .registrieren(ctx.verbindung, slug.clone(), role, ctx.sende_tx.clone())
                    .await
                {
                    Ok(Some(identity)) => Some(ServerSignal::registriert(
                        ctx.verbindung,
                        identity.slug,
                        identity.rolle,
                    )),
                    // Unbekannter Slug: keinerlei Rueckmeldung
                    Ok(None) => None,
                    Err(e) => {
                        tracing::error!(
                            slug = %slug,
                            peer = %ctx.peer_addr,
                            fehler = %e,
                            "Registrierung abgebrochen"
                        );
                        None
                    }
                }
            }

            ClientSignal::CallInitiate { to, role } => {
                self.relay
                    .weiterleiten(ctx.verbindung, &to, Some(role), |from, to| {
                        ServerSignal::CallInitiate { from, to, role }
                    })
            }

            ClientSignal::CallOffer { to, offer } => {
                self.relay.weiterleiten(ctx.verbindung, &to, None, |from, to| {
                    ServerSignal::CallOffer { from, to, offer }
                })
            }

            ClientSignal::CallAnswer { to, answer } => {
                self.relay.weiterleiten(ctx.verbindung, &to, None, |from, to| {
                    ServerSignal::CallAnswer { from, to, answer }
                })
            }

            ClientSignal::CallCandidate { to, candidate } => {
                self.relay.weiterleiten(ctx.verbindung, &to, None, |from, to| {
                    ServerSignal::CallCandidate {
                        from,
                        to,
                        candidate,
                    }
                })
            }

            ClientSignal::CallReject { to } => {
                self.relay.weiterleiten(ctx.verbindung, &to, None, |from, to| {
                    ServerSignal::CallReject { from, to }
                })
            }

            ClientSignal::CallStop { to, role } => {
                self.relay
                    .weiterleiten(ctx.verbindung, &to, Some(role), |from, to| {
                        ServerSignal::CallStop { from, to, role }
                    })
            }

            ClientSignal::CallEnd { to } => {
                self.relay.weiterleiten(ctx.verbindung, &to, None, |from, to| {
                    ServerSignal::CallEnd { from, to }
                })
            }
        }
    }

    /// Raeumt nach dem Ende einer Verbindung auf
    pub async fn verbindung_getrennt(&self, verbindung: ConnectionId) {
        self.state.lifecycle.trennen(verbindung).await;
    }
}
