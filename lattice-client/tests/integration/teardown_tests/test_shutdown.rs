use lattice_core::{MemberId, SdpKind, SessionDescription};

use crate::integration::init_tracing;
use crate::utils::Harness;
use lattice_client::ControllerEvent;

#[tokio::test]
async fn test_shutdown_closes_all_sessions_and_releases_capture() {
    init_tracing();

    let offering = MemberId::new();
    let waiting = MemberId::new();
    let connected = MemberId::new();

    let mut harness = Harness::new();
    harness.start("r1").await;

    // Sessions in three different states.
    harness.add_peer(&offering, true).await;
    harness.add_peer(&waiting, false).await;
    harness.add_peer(&connected, false).await;
    harness
        .deliver_description(
            &connected,
            SessionDescription {
                kind: SdpKind::Offer,
                sdp: "v=0 offer".into(),
            },
        )
        .await;

    harness.controller.process(ControllerEvent::Shutdown).await;

    for peer in [&offering, &waiting, &connected] {
        assert_eq!(harness.controller.session_state(peer), None);
        assert_eq!(harness.factory.log_for(peer).count("close"), 1);
    }

    assert_eq!(harness.capture.release_count(), 1);
    assert!(harness.outbound.left());
}

#[tokio::test]
async fn test_event_loop_drains_queue_before_shutdown() {
    init_tracing();

    let peer = MemberId::new();
    let mut harness = Harness::new();
    harness.start("r1").await;

    let events = harness.events.clone();
    let loop_task = tokio::spawn(harness.controller.run());

    events
        .send(ControllerEvent::AddPeer {
            peer_id: peer.clone(),
            create_offer: true,
        })
        .await
        .expect("controller gone");
    events
        .send(ControllerEvent::Shutdown)
        .await
        .expect("controller gone");

    loop_task.await.expect("controller loop panicked");

    assert_eq!(harness.outbound.descriptions_for(&peer).len(), 1);
    assert_eq!(harness.factory.log_for(&peer).count("close"), 1);
    assert!(harness.outbound.left());
}
