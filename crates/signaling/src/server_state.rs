//! Geteilter Zustand des Signaling-Servers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use portier_directory::VerzeichnisRepository;

use crate::lifecycle::LifecycleManager;
use crate::registry::VerbindungsRegister;

/// Konfiguration des Signaling-Servers
#[derive(Debug, Clone)]
pub struct SignalingConfig {
    /// Anzeigename des Servers (fuer Logs und Status)
    pub server_name: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen
    pub max_clients: u32,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            server_name: "Portier Server".to_string(),
            max_clients: 256,
        }
    }
}

/// Geteilter Zustand (ein Exemplar pro Serverprozess)
#[derive(Debug)]
pub struct SignalingState<V> {
    pub config: SignalingConfig,
    pub verzeichnis: Arc<V>,
    pub register: VerbindungsRegister,
    pub lifecycle: LifecycleManager<V>,
    /// Offene TCP-Verbindungen, registriert oder nicht
    offene_verbindungen: AtomicUsize,
    start_zeit: Instant,
}

impl<V: VerzeichnisRepository> SignalingState<V> {
    pub fn neu(config: SignalingConfig, verzeichnis: Arc<V>) -> Arc<Self> {
        let register = VerbindungsRegister::neu();
        let lifecycle = LifecycleManager::neu(register.clone(), Arc::clone(&verzeichnis));
        Arc::new(Self {
            config,
            verzeichnis,
            register,
            lifecycle,
            offene_verbindungen: AtomicUsize::new(0),
            start_zeit: Instant::now(),
        })
    }

    /// Laufzeit des Servers in Sekunden
    pub fn uptime_sek(&self) -> u64 {
        self.start_zeit.elapsed().as_secs()
    }

    /// Anzahl aktuell registrierter Teilnehmer
    pub fn verbundene_teilnehmer(&self) -> usize {
        self.register.anzahl()
    }

    /// Zaehlt eine akzeptierte Verbindung; liefert den neuen Stand
    pub fn verbindung_geoeffnet(&self) -> usize {
        self.offene_verbindungen.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Zaehlt eine beendete Verbindung aus
    pub fn verbindung_geschlossen(&self) {
        self.offene_verbindungen.fetch_sub(1, Ordering::Relaxed);
    }

    /// Anzahl der aktuell offenen TCP-Verbindungen
    ///
    /// Grundlage fuer das `max_clients`-Limit: auch eine Verbindung die
    /// nie `register` sendet, belegt einen Platz.
    pub fn offene_verbindungen(&self) -> usize {
        self.offene_verbindungen.load(Ordering::Relaxed)
    }
}
