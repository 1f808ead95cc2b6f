use lattice_core::SignalMessage;

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::TestMember;

#[tokio::test]
async fn test_second_join_notifies_both_sides() {
    init_tracing();

    let relay = spawn_relay();
    let mut a = TestMember::connect(&relay).await;
    let mut b = TestMember::connect(&relay).await;

    a.join("r1").await;
    a.recv_room_list().await;

    b.join("r1").await;

    // Existing member is told about the newcomer and must wait for the
    // newcomer's offer.
    let to_a = a.recv_signal().await;
    assert_eq!(
        to_a,
        SignalMessage::AddPeer {
            peer_id: b.member_id.clone(),
            create_offer: false,
        }
    );

    // The newcomer initiates toward every existing member.
    let to_b = b.recv_signal().await;
    assert_eq!(
        to_b,
        SignalMessage::AddPeer {
            peer_id: a.member_id.clone(),
            create_offer: true,
        }
    );
}

#[tokio::test]
async fn test_rejoining_same_room_sends_nothing() {
    init_tracing();

    let relay = spawn_relay();
    let mut a = TestMember::connect(&relay).await;
    let mut b = TestMember::connect(&relay).await;

    a.join("r1").await;
    a.recv_room_list().await;
    b.join("r1").await;
    b.recv_signal().await;
    b.recv_room_list().await;
    a.recv_signal().await;
    a.recv_room_list().await;

    // A second join of the same room is a no-op, so the only thing A sees
    // afterwards is the broadcast caused by B leaving.
    a.join("r1").await;
    b.leave().await;

    let msg = a.recv_signal().await;
    assert_eq!(
        msg,
        SignalMessage::RemovePeer {
            peer_id: b.member_id.clone(),
        }
    );
}
