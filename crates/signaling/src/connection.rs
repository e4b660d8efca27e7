//! Client-Connection – Verwaltet eine einzelne TCP-Verbindung
//!
//! Jede TCP-Verbindung bekommt eine `ClientConnection` in einem eigenen
//! tokio-Task. Der Task liest Frames via `ServerCodec`, dispatcht sie an
//! den `SignalDispatcher` und schreibt alles zurueck was entweder als
//! direkte Antwort anfaellt oder ueber die Sende-Queue von anderen
//! Teilnehmern vermittelt wurde.
//!
//! Die Verbindung traegt selbst keine Identitaet; sie bekommt beim Start
//! eine zufaellige `ConnectionId`, und erst ein erfolgreiches `register`
//! macht sie adressierbar. Beim Ende des Tasks wird der Lifecycle genau
//! einmal zum Aufraeumen gerufen.

use futures_util::{SinkExt, StreamExt};
use portier_core::types::ConnectionId;
use portier_directory::VerzeichnisRepository;
use portier_protocol::signal::ServerSignal;
use portier_protocol::wire::ServerCodec;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;

use crate::dispatcher::{DispatcherContext, SignalDispatcher};
use crate::server_state::SignalingState;

/// Groesse der Sende-Queue pro Verbindung
const SENDE_QUEUE_GROESSE: usize = 64;

/// Verarbeitet eine einzelne TCP-Verbindung
pub struct ClientConnection<V> {
    state: Arc<SignalingState<V>>,
    peer_addr: SocketAddr,
}

impl<V: VerzeichnisRepository + 'static> ClientConnection<V> {
    /// Erstellt eine neue ClientConnection
    pub fn neu(state: Arc<SignalingState<V>>, peer_addr: SocketAddr) -> Self {
        Self { state, peer_addr }
    }

    /// Startet die Verbindungs-Verarbeitungsschleife
    ///
    /// Laeuft bis die Verbindung getrennt wird oder ein Shutdown-Signal
    /// eingeht.
    pub async fn verarbeiten(
        self,
        stream: TcpStream,
        mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
    ) {
        let peer_addr = self.peer_addr;
        let verbindung = ConnectionId::new();

        tracing::info!(peer = %peer_addr, verbindung = %verbindung, "Neue Verbindung");

        let mut framed = Framed::new(stream, ServerCodec::new());

        // Ausgehende Signal-Queue (Vermittlung -> TCP); wird beim
        // Registrieren in das Verbindungs-Register eingetragen
        let (sende_tx, mut sende_rx) = mpsc::channel::<ServerSignal>(SENDE_QUEUE_GROESSE);

        let dispatcher = SignalDispatcher::neu(Arc::clone(&self.state));
        let ctx = DispatcherContext {
            verbindung,
            peer_addr,
            sende_tx,
        };

        loop {
            tokio::select! {
                // Eingehendes Signal vom Client
                frame = framed.next() => {
                    match frame {
                        Some(Ok(signal)) => {
                            if let Some(antwort) = dispatcher.dispatch(signal, &ctx).await {
                                if let Err(e) = framed.send(antwort).await {
                                    tracing::warn!(
                                        peer = %peer_addr,
                                        fehler = %e,
                                        "Senden fehlgeschlagen"
                                    );
                                    break;
                                }
                            }
                        }
                        Some(Err(e)) => {
                            tracing::warn!(
                                peer = %peer_addr,
                                fehler = %e,
                                "Frame-Lesefehler"
                            );
                            break;
                        }
                        None => {
                            tracing::info!(peer = %peer_addr, "Verbindung vom Client getrennt");
                            break;
                        }
                    }
                }

                // Vermitteltes Signal fuer diesen Teilnehmer
                ausgehend = sende_rx.recv() => {
                    // ctx haelt einen Sender, die Queue schliesst nie vor dem Loop-Ende
                    let Some(signal) = ausgehend else { break };
                    if let Err(e) = framed.send(signal).await {
                        tracing::warn!(
                            peer = %peer_addr,
                            fehler = %e,
                            "Senden fehlgeschlagen"
                        );
                        break;
                    }
                }

                // Shutdown-Signal vom Server
                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!(peer = %peer_addr, "Shutdown, Verbindung wird geschlossen");
                        break;
                    }
                }
            }
        }

        // Aufraeumen: Register-Eintrag und Verzeichnis-Referenz
        dispatcher.verbindung_getrennt(verbindung).await;
        tracing::info!(peer = %peer_addr, verbindung = %verbindung, "Verbindungs-Task beendet");
    }
}
