use lattice_core::{MemberId, SdpKind, SessionDescription};

use crate::integration::init_tracing;
use crate::utils::Harness;
use lattice_client::{MediaKind, RemoteStream, TransportEvent};
use std::sync::Arc;

#[tokio::test]
async fn test_remove_peer_overrides_inflight_negotiation() {
    init_tracing();

    let peer = MemberId::new();
    let mut harness = Harness::new();
    harness.start("r1").await;

    harness.add_peer(&peer, true).await;
    harness.remove_peer(&peer).await;

    assert_eq!(harness.controller.session_state(&peer), None);
    let log = harness.factory.log_for(&peer);
    assert_eq!(log.count("close"), 1);

    // The answer for the discarded negotiation straggles in. Nothing may
    // be processed for the departed peer.
    harness
        .deliver_description(
            &peer,
            SessionDescription {
                kind: SdpKind::Answer,
                sdp: "late answer".into(),
            },
        )
        .await;

    assert_eq!(harness.factory.log_for(&peer).count("set_remote"), 0);
    assert_eq!(harness.controller.session_state(&peer), None);
}

#[tokio::test]
async fn test_remove_peer_clears_render_slot() {
    init_tracing();

    let peer = MemberId::new();
    let mut harness = Harness::new();
    harness.start("r1").await;
    harness.add_peer(&peer, false).await;

    harness
        .controller
        .process_transport(TransportEvent::RemoteStream(
            peer.clone(),
            RemoteStream::new(MediaKind::Video, Arc::new(())),
        ))
        .await;
    assert_eq!(harness.renderer.bound(), vec![peer.clone()]);

    harness.remove_peer(&peer).await;
    assert!(harness.renderer.cleared().contains(&peer));
}

#[tokio::test]
async fn test_remove_peer_is_safe_for_unknown_member() {
    init_tracing();

    let mut harness = Harness::new();
    harness.start("r1").await;

    // Never announced; must be a silent no-op.
    harness.remove_peer(&MemberId::new()).await;
}

#[tokio::test]
async fn test_stream_for_unknown_peer_is_not_bound() {
    init_tracing();

    let mut harness = Harness::new();
    harness.start("r1").await;

    harness
        .controller
        .process_transport(TransportEvent::RemoteStream(
            MemberId::new(),
            RemoteStream::new(MediaKind::Video, Arc::new(())),
        ))
        .await;

    assert!(harness.renderer.bound().is_empty());
}
