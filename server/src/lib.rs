//! portier-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen
//! Einstiegspunkt fuer Integrationstests bereit.

pub mod api;
pub mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use portier_directory::{JsonVerzeichnis, VerzeichnisRepository};
use portier_observability::HealthState;
use portier_signaling::{SignalingConfig, SignalingServer, SignalingState};

use api::{api_router, ApiState};
use config::ServerConfig;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Verzeichnis oeffnen und Bestand pruefen
    /// 2. HTTP-API starten (Status, Listen, Health)
    /// 3. TCP-Signalisierung starten
    /// 4. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        let verzeichnis = JsonVerzeichnis::neu(&self.config.verzeichnis.daten_pfad);
        let health = HealthState::neu();

        // Bestand einmal anlesen, damit Konfigurationsfehler sofort
        // auffallen statt erst beim ersten register
        match verzeichnis.alle_zimmer().await {
            Ok(zimmer) => {
                tracing::info!(
                    pfad = %self.config.verzeichnis.daten_pfad,
                    zimmer = zimmer.len(),
                    "Verzeichnis geoeffnet"
                );
            }
            Err(e) => {
                tracing::warn!(
                    pfad = %self.config.verzeichnis.daten_pfad,
                    fehler = %e,
                    "Verzeichnis nicht lesbar, starte mit leerem Bestand"
                );
                health.verzeichnis_status_setzen(false);
            }
        }

        // Shutdown-Signal an alle Subsysteme
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl-C empfangen, Server wird beendet");
                let _ = shutdown_tx.send(true);
            }
        });

        // HTTP-API
        let api_addr = self.config.api_bind_adresse();
        let router = api_router(
            ApiState {
                verzeichnis: verzeichnis.clone(),
                health,
            },
            &self.config.api.cors_origins,
        );
        let api_listener = tokio::net::TcpListener::bind(&api_addr)
            .await
            .with_context(|| format!("HTTP-API kann {api_addr} nicht binden"))?;
        tracing::info!(adresse = %api_addr, "HTTP-API gestartet");

        let mut api_shutdown = shutdown_rx.clone();
        tokio::spawn(async move {
            let ergebnis = axum::serve(api_listener, router)
                .with_graceful_shutdown(async move {
                    let _ = api_shutdown.wait_for(|beendet| *beendet).await;
                })
                .await;
            if let Err(e) = ergebnis {
                tracing::error!(fehler = %e, "HTTP-API beendet");
            }
        });

        // TCP-Signalisierung (laeuft im Vordergrund bis zum Shutdown)
        let signaling_config = SignalingConfig {
            server_name: self.config.server.name.clone(),
            max_clients: self.config.server.max_clients,
        };
        let state = SignalingState::neu(signaling_config, Arc::new(verzeichnis));
        let tcp_addr = self
            .config
            .tcp_bind_adresse()
            .parse()
            .with_context(|| format!("Ungueltige TCP-Adresse {}", self.config.tcp_bind_adresse()))?;

        tracing::info!(
            server_name = %self.config.server.name,
            tcp = %tcp_addr,
            "Server startet"
        );

        SignalingServer::neu(state, tcp_addr)
            .starten(shutdown_rx)
            .await
            .context("TCP-Signalisierung fehlgeschlagen")?;

        tracing::info!("Server beendet");
        Ok(())
    }
}
