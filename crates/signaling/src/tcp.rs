//! TCP-Listener des Signaling-Servers
//!
//! Bindet den Socket und startet pro akzeptierter Verbindung einen
//! eigenen Task mit einer `ClientConnection`. Das `max_clients`-Limit
//! wird beim Accept durchgesetzt und zaehlt offene Verbindungen, nicht
//! registrierte Identitaeten.
//!
//! ## Concurrency-Modell
//! Der Verzeichnis-Trait verwendet async fn ohne Send-Garantie
//! (async_fn_in_trait), daher laufen alle Verbindungs-Tasks in einer
//! `tokio::task::LocalSet` auf einem single-threaded Executor. Fuer
//! einen einzelnen Serverprozess reicht das aus.

use portier_directory::VerzeichnisRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::LocalSet;

use crate::connection::ClientConnection;
use crate::server_state::SignalingState;

/// TCP-Signaling-Server
pub struct SignalingServer<V> {
    state: Arc<SignalingState<V>>,
    bind_addr: SocketAddr,
}

impl<V: VerzeichnisRepository + 'static> SignalingServer<V> {
    /// Erstellt einen neuen SignalingServer
    pub fn neu(state: Arc<SignalingState<V>>, bind_addr: SocketAddr) -> Self {
        Self { state, bind_addr }
    }

    /// Startet den Listener und laeuft bis `shutdown_rx` `true` meldet
    pub async fn starten(
        self,
        shutdown_rx: tokio::sync::watch::Receiver<bool>,
    ) -> std::io::Result<()> {
        let local = LocalSet::new();
        local.run_until(self.accept_loop(shutdown_rx)).await
    }

    /// Interne Accept-Loop (laeuft innerhalb der LocalSet)
    async fn accept_loop(
        self,
        mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
    ) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.bind_addr).await?;
        let lokale_addr = listener.local_addr()?;

        tracing::info!(
            adresse = %lokale_addr,
            max_clients = self.state.config.max_clients,
            "TCP Signaling-Server gestartet"
        );

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            self.verbindung_annehmen(stream, peer_addr, &shutdown_rx);
                        }
                        Err(e) => {
                            // Kurz verschnaufen, sonst dreht die Loop bei
                            // z.B. erschoepften File-Deskriptoren heiss
                            tracing::error!(fehler = %e, "TCP-Accept-Fehler");
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        }
                    }
                }

                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!("Signaling-Server: Shutdown-Signal empfangen");
                        break;
                    }
                }
            }
        }

        tracing::info!("TCP Signaling-Server gestoppt");
        Ok(())
    }

    /// Prueft das Verbindungslimit und startet den Verbindungs-Task
    fn verbindung_annehmen(
        &self,
        stream: tokio::net::TcpStream,
        peer_addr: SocketAddr,
        shutdown_rx: &tokio::sync::watch::Receiver<bool>,
    ) {
        if self.state.offene_verbindungen() as u32 >= self.state.config.max_clients {
            tracing::warn!(
                peer = %peer_addr,
                max = self.state.config.max_clients,
                "Server voll, Verbindung abgelehnt"
            );
            drop(stream);
            return;
        }

        let offen = self.state.verbindung_geoeffnet();
        tracing::debug!(peer = %peer_addr, offen, "Verbindung akzeptiert");

        let verbindung = ClientConnection::neu(Arc::clone(&self.state), peer_addr);
        let state = Arc::clone(&self.state);
        let shutdown_rx = shutdown_rx.clone();

        // Lokaler Task – kein Send erforderlich
        tokio::task::spawn_local(async move {
            verbindung.verarbeiten(stream, shutdown_rx).await;
            state.verbindung_geschlossen();
        });
    }

    /// Gibt die Bind-Adresse zurueck
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
