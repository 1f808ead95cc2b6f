use lattice_core::{CandidatePayload, MemberId};

use crate::integration::init_tracing;
use crate::utils::Harness;
use lattice_client::ControllerEvent;

fn candidate(n: u32) -> CandidatePayload {
    CandidatePayload {
        candidate: format!("candidate:{} 1 udp 2130706431 192.0.2.1 54400 typ host", n),
        sdp_mid: Some("0".into()),
        sdp_m_line_index: Some(0),
    }
}

async fn deliver_candidate(harness: &mut Harness, peer: &MemberId, payload: CandidatePayload) {
    harness
        .controller
        .process(ControllerEvent::Candidate {
            peer_id: peer.clone(),
            candidate: payload,
        })
        .await;
}

#[tokio::test]
async fn test_candidates_before_add_peer_are_flushed_in_order() {
    init_tracing();

    let peer = MemberId::new();

    // Early side: candidates outrun the add-peer notification.
    let mut early = Harness::new();
    early.start("r1").await;
    deliver_candidate(&mut early, &peer, candidate(1)).await;
    deliver_candidate(&mut early, &peer, candidate(2)).await;
    early.add_peer(&peer, false).await;

    // Late side: the same candidates arrive after add-peer.
    let mut late = Harness::new();
    late.start("r1").await;
    late.add_peer(&peer, false).await;
    deliver_candidate(&mut late, &peer, candidate(1)).await;
    deliver_candidate(&mut late, &peer, candidate(2)).await;

    let early_ops: Vec<String> = early
        .factory
        .log_for(&peer)
        .ops()
        .into_iter()
        .filter(|op| op.starts_with("candidate"))
        .collect();
    let late_ops: Vec<String> = late
        .factory
        .log_for(&peer)
        .ops()
        .into_iter()
        .filter(|op| op.starts_with("candidate"))
        .collect();

    assert_eq!(early_ops.len(), 2);
    assert_eq!(early_ops, late_ops);
}

#[tokio::test]
async fn test_candidate_applies_in_any_live_state() {
    init_tracing();

    let peer = MemberId::new();
    let mut harness = Harness::new();
    harness.start("r1").await;

    // Session sits in HaveLocalOffer; negotiation has not completed.
    harness.add_peer(&peer, true).await;
    deliver_candidate(&mut harness, &peer, candidate(7)).await;

    assert_eq!(harness.factory.log_for(&peer).count("candidate"), 1);
}
