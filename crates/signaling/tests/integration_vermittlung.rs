//! Integrationstests fuer Registrierung, Vermittlung und Trennung
//!
//! Arbeitet auf Dispatcher-Ebene gegen ein In-Memory-Verzeichnis; jede
//! "Verbindung" ist eine eigene ConnectionId mit eigener Sende-Queue.

use std::net::SocketAddr;
use std::sync::Arc;

use portier_core::types::{ConnectionId, Rolle, Slug};
use portier_directory::{MemoryVerzeichnis, RezeptionistRecord, ZimmerRecord, ZimmerStatus};
use portier_protocol::signal::{ClientSignal, ServerSignal};
use portier_signaling::{DispatcherContext, SignalDispatcher, SignalingConfig, SignalingState};
use serde_json::json;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Test-Aufbau
// ---------------------------------------------------------------------------

fn test_verzeichnis() -> MemoryVerzeichnis {
    MemoryVerzeichnis::mit_bestand(
        vec![ZimmerRecord {
            id: 5,
            name: "Zimmer 5".into(),
            slug: Slug::from("zimmer-5"),
            floor: 1,
            status: ZimmerStatus::Occupied,
            fingerprint: "aa:bb:cc".into(),
        }],
        vec![RezeptionistRecord {
            slug: Slug::from("front-desk"),
            name: "Empfang".into(),
            connection_ref: None,
        }],
    )
}

struct TestUmgebung {
    verzeichnis: MemoryVerzeichnis,
    state: Arc<SignalingState<MemoryVerzeichnis>>,
    dispatcher: SignalDispatcher<MemoryVerzeichnis>,
}

impl TestUmgebung {
    fn neu() -> Self {
        let verzeichnis = test_verzeichnis();
        let state = SignalingState::neu(
            SignalingConfig::default(),
            Arc::new(verzeichnis.clone()),
        );
        Self {
            verzeichnis,
            state: Arc::clone(&state),
            dispatcher: SignalDispatcher::neu(state),
        }
    }

    /// Simuliert eine neue Verbindung (eigene Queue, eigene ConnectionId)
    fn verbindung(&self) -> (DispatcherContext, mpsc::Receiver<ServerSignal>) {
        let (sende_tx, sende_rx) = mpsc::channel(16);
        let peer_addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        (
            DispatcherContext {
                verbindung: ConnectionId::new(),
                peer_addr,
                sende_tx,
            },
            sende_rx,
        )
    }

    async fn registriere(
        &self,
        ctx: &DispatcherContext,
        slug: &str,
        rolle: Rolle,
    ) -> Option<ServerSignal> {
        self.dispatcher
            .dispatch(
                ClientSignal::Register {
                    slug: Slug::from(slug),
                    role: rolle,
                },
                ctx,
            )
            .await
    }
}

// ---------------------------------------------------------------------------
// Registrierung
// ---------------------------------------------------------------------------

#[tokio::test]
async fn registrierung_bestaetigt_mit_aufgeloester_identitaet() {
    let umgebung = TestUmgebung::neu();
    let (ctx, _rx) = umgebung.verbindung();

    let ack = umgebung
        .registriere(&ctx, "front-desk", Rolle::Rezeptionist)
        .await
        .expect("Registrierung muss bestaetigt werden");

    match ack {
        ServerSignal::Registered { socket, .. } => {
            assert_eq!(socket.id, ctx.verbindung);
            assert_eq!(socket.user, Slug::from("front-desk"));
            assert_eq!(socket.role, Rolle::Rezeptionist);
        }
        andere => panic!("Unerwartete Antwort: {andere:?}"),
    }
}

#[tokio::test]
async fn unbekannter_slug_wird_ohne_antwort_verworfen() {
    let umgebung = TestUmgebung::neu();
    let (ctx, mut rx) = umgebung.verbindung();

    let antwort = umgebung.registriere(&ctx, "zimmer-99", Rolle::Gast).await;

    assert!(antwort.is_none());
    assert!(rx.try_recv().is_err());
    // Keine Seiteneffekte im Verzeichnis
    assert_eq!(umgebung.verzeichnis.gast_anzahl(), 0);
}

#[tokio::test]
async fn erstes_gast_register_synthetisiert_datensatz() {
    let umgebung = TestUmgebung::neu();
    let (ctx, _rx) = umgebung.verbindung();

    umgebung
        .registriere(&ctx, "zimmer-5", Rolle::Gast)
        .await
        .expect("Zimmer-Slug muss registrierbar sein");

    assert_eq!(umgebung.verzeichnis.gast_anzahl(), 1);
    use portier_directory::VerzeichnisRepository;
    let gast = umgebung
        .verzeichnis
        .gast_nach_slug(&Slug::from("zimmer-5"))
        .await
        .unwrap()
        .expect("Gast-Datensatz muss existieren");
    assert_eq!(gast.room, "Zimmer 5");
    assert_eq!(gast.connection_ref, Some(ctx.verbindung));
}

#[tokio::test]
async fn zweites_gast_register_legt_keinen_neuen_datensatz_an() {
    let umgebung = TestUmgebung::neu();
    let (ctx_a, _rx_a) = umgebung.verbindung();
    let (ctx_b, _rx_b) = umgebung.verbindung();

    umgebung.registriere(&ctx_a, "zimmer-5", Rolle::Gast).await;
    umgebung.registriere(&ctx_b, "zimmer-5", Rolle::Gast).await;

    assert_eq!(umgebung.verzeichnis.gast_anzahl(), 1);
}

// ---------------------------------------------------------------------------
// Vermittlung
// ---------------------------------------------------------------------------

#[tokio::test]
async fn voller_anruf_fluss() {
    let umgebung = TestUmgebung::neu();
    let (gast, mut gast_rx) = umgebung.verbindung();
    let (empfang, mut empfang_rx) = umgebung.verbindung();

    umgebung.registriere(&gast, "zimmer-5", Rolle::Gast).await;
    umgebung
        .registriere(&empfang, "front-desk", Rolle::Rezeptionist)
        .await;

    // Gast klingelt am Empfang
    let antwort = umgebung
        .dispatcher
        .dispatch(
            ClientSignal::CallInitiate {
                to: Slug::from("front-desk"),
                role: Rolle::Rezeptionist,
            },
            &gast,
        )
        .await;
    assert!(antwort.is_none());
    match empfang_rx.try_recv().unwrap() {
        ServerSignal::CallInitiate { from, to, role } => {
            assert_eq!(from.slug, Slug::from("zimmer-5"));
            assert_eq!(from.name, "Zimmer 5");
            assert_eq!(to.slug, Slug::from("front-desk"));
            assert_eq!(role, Rolle::Rezeptionist);
        }
        andere => panic!("Unerwartetes Signal: {andere:?}"),
    }

    // Empfang antwortet mit einem Offer; der SDP-Payload bleibt opak
    let offer = json!({"type": "offer", "sdp": "v=0\r\no=- 42..."});
    umgebung
        .dispatcher
        .dispatch(
            ClientSignal::CallOffer {
                to: Slug::from("zimmer-5"),
                offer: offer.clone(),
            },
            &empfang,
        )
        .await;
    match gast_rx.try_recv().unwrap() {
        ServerSignal::CallOffer {
            from,
            offer: empfangen,
            ..
        } => {
            assert_eq!(from.slug, Slug::from("front-desk"));
            assert_eq!(empfangen, offer);
        }
        andere => panic!("Unerwartetes Signal: {andere:?}"),
    }

    // Answer und Candidate in Gegenrichtung
    umgebung
        .dispatcher
        .dispatch(
            ClientSignal::CallAnswer {
                to: Slug::from("front-desk"),
                answer: json!({"type": "answer", "sdp": "v=0"}),
            },
            &gast,
        )
        .await;
    assert!(matches!(
        empfang_rx.try_recv().unwrap(),
        ServerSignal::CallAnswer { .. }
    ));

    umgebung
        .dispatcher
        .dispatch(
            ClientSignal::CallCandidate {
                to: Slug::from("zimmer-5"),
                candidate: json!({"candidate": "candidate:1 1 UDP ..."}),
            },
            &empfang,
        )
        .await;
    assert!(matches!(
        gast_rx.try_recv().unwrap(),
        ServerSignal::CallCandidate { .. }
    ));

    // Gast legt auf
    umgebung
        .dispatcher
        .dispatch(
            ClientSignal::CallEnd {
                to: Slug::from("front-desk"),
            },
            &gast,
        )
        .await;
    assert!(matches!(
        empfang_rx.try_recv().unwrap(),
        ServerSignal::CallEnd { .. }
    ));
}

#[tokio::test]
async fn initiate_an_abwesendes_ziel_gibt_call_error() {
    let umgebung = TestUmgebung::neu();
    let (gast, _rx) = umgebung.verbindung();
    umgebung.registriere(&gast, "zimmer-5", Rolle::Gast).await;

    // front-desk steht im Verzeichnis, ist aber nicht verbunden
    let antwort = umgebung
        .dispatcher
        .dispatch(
            ClientSignal::CallInitiate {
                to: Slug::from("front-desk"),
                role: Rolle::Rezeptionist,
            },
            &gast,
        )
        .await;
    assert_eq!(antwort, Some(ServerSignal::nicht_erreichbar()));
}

#[tokio::test]
async fn signal_ohne_registrierung_gibt_call_error() {
    let umgebung = TestUmgebung::neu();
    let (empfang, mut empfang_rx) = umgebung.verbindung();
    umgebung
        .registriere(&empfang, "front-desk", Rolle::Rezeptionist)
        .await;

    // Unregistrierte Verbindung versucht ein Offer zu schicken
    let (fremd, _rx) = umgebung.verbindung();
    let antwort = umgebung
        .dispatcher
        .dispatch(
            ClientSignal::CallOffer {
                to: Slug::from("front-desk"),
                offer: json!({}),
            },
            &fremd,
        )
        .await;

    assert_eq!(antwort, Some(ServerSignal::nicht_erreichbar()));
    assert!(empfang_rx.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Neuregistrierung und Trennung
// ---------------------------------------------------------------------------

#[tokio::test]
async fn neuregistrierung_verdraengt_alte_verbindung() {
    let umgebung = TestUmgebung::neu();
    let (alt, _alt_rx) = umgebung.verbindung();
    let (neu, mut neu_rx) = umgebung.verbindung();
    let (empfang, _empfang_rx) = umgebung.verbindung();

    umgebung
        .registriere(&empfang, "front-desk", Rolle::Rezeptionist)
        .await;
    umgebung.registriere(&alt, "zimmer-5", Rolle::Gast).await;
    umgebung.registriere(&neu, "zimmer-5", Rolle::Gast).await;

    // Die verdraengte Verbindung ist nicht mehr adressierbar
    let antwort = umgebung
        .dispatcher
        .dispatch(
            ClientSignal::CallEnd {
                to: Slug::from("front-desk"),
            },
            &alt,
        )
        .await;
    assert_eq!(antwort, Some(ServerSignal::nicht_erreichbar()));

    // An den Slug adressierte Signale landen bei der neuen Verbindung
    umgebung
        .dispatcher
        .dispatch(
            ClientSignal::CallReject {
                to: Slug::from("zimmer-5"),
            },
            &empfang,
        )
        .await;
    assert!(matches!(
        neu_rx.try_recv().unwrap(),
        ServerSignal::CallReject { .. }
    ));
}

#[tokio::test]
async fn um_registrierung_auf_anderen_slug_macht_alten_unerreichbar() {
    let umgebung = TestUmgebung::neu();
    let (geraet, _rx) = umgebung.verbindung();

    // Dieselbe Verbindung meldet sich erst als Empfang, dann als Zimmer an
    umgebung
        .registriere(&geraet, "front-desk", Rolle::Rezeptionist)
        .await;
    umgebung.registriere(&geraet, "zimmer-5", Rolle::Gast).await;

    // Die alte Identitaet darf nicht im Register haengen bleiben
    assert_eq!(umgebung.state.register.anzahl(), 1);
    assert!(!umgebung.state.register.ist_erreichbar(&Slug::from("front-desk")));

    // Ein Anruf an die alte Identitaet schlaegt fehl
    let antwort = umgebung
        .dispatcher
        .dispatch(
            ClientSignal::CallInitiate {
                to: Slug::from("front-desk"),
                role: Rolle::Rezeptionist,
            },
            &geraet,
        )
        .await;
    assert_eq!(antwort, Some(ServerSignal::nicht_erreichbar()));

    // Die Trennung raeumt den letzten Eintrag
    umgebung.dispatcher.verbindung_getrennt(geraet.verbindung).await;
    assert_eq!(umgebung.state.register.anzahl(), 0);
}

#[tokio::test]
async fn trennung_der_verdraengten_verbindung_laesst_neue_intakt() {
    let umgebung = TestUmgebung::neu();
    let (alt, _alt_rx) = umgebung.verbindung();
    let (neu, mut neu_rx) = umgebung.verbindung();
    let (empfang, _empfang_rx) = umgebung.verbindung();

    umgebung
        .registriere(&empfang, "front-desk", Rolle::Rezeptionist)
        .await;
    umgebung.registriere(&alt, "zimmer-5", Rolle::Gast).await;
    umgebung.registriere(&neu, "zimmer-5", Rolle::Gast).await;

    umgebung.dispatcher.verbindung_getrennt(alt.verbindung).await;

    umgebung
        .dispatcher
        .dispatch(
            ClientSignal::CallStop {
                to: Slug::from("zimmer-5"),
                role: Rolle::Gast,
            },
            &empfang,
        )
        .await;
    assert!(matches!(
        neu_rx.try_recv().unwrap(),
        ServerSignal::CallStop { .. }
    ));
}

#[tokio::test]
async fn trennung_ist_idempotent() {
    let umgebung = TestUmgebung::neu();
    let (ctx, _rx) = umgebung.verbindung();
    umgebung
        .registriere(&ctx, "front-desk", Rolle::Rezeptionist)
        .await;

    umgebung.dispatcher.verbindung_getrennt(ctx.verbindung).await;
    // Zweite Trennung derselben Verbindung ist ein No-op
    umgebung.dispatcher.verbindung_getrennt(ctx.verbindung).await;
}

#[tokio::test]
async fn rezeptionist_trennung_loescht_verzeichnis_referenz() {
    let umgebung = TestUmgebung::neu();
    let (ctx, _rx) = umgebung.verbindung();
    umgebung
        .registriere(&ctx, "front-desk", Rolle::Rezeptionist)
        .await;

    use portier_directory::VerzeichnisRepository;
    let r = umgebung
        .verzeichnis
        .rezeptionist_nach_slug(&Slug::from("front-desk"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(r.connection_ref, Some(ctx.verbindung));

    umgebung.dispatcher.verbindung_getrennt(ctx.verbindung).await;

    let r = umgebung
        .verzeichnis
        .rezeptionist_nach_slug(&Slug::from("front-desk"))
        .await
        .unwrap()
        .unwrap();
    assert!(r.connection_ref.is_none());
}

#[tokio::test]
async fn gast_trennung_behaelt_verzeichnis_referenz() {
    let umgebung = TestUmgebung::neu();
    let (ctx, _rx) = umgebung.verbindung();
    umgebung.registriere(&ctx, "zimmer-5", Rolle::Gast).await;

    umgebung.dispatcher.verbindung_getrennt(ctx.verbindung).await;

    // Gast-Datensaetze behalten die letzte bekannte Verbindungs-Referenz
    use portier_directory::VerzeichnisRepository;
    let gast = umgebung
        .verzeichnis
        .gast_nach_slug(&Slug::from("zimmer-5"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(gast.connection_ref, Some(ctx.verbindung));
}
