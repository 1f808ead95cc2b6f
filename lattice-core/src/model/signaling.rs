use crate::model::member::MemberId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionDescription {
    pub kind: SdpKind,
    pub sdp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidatePayload {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_m_line_index: Option<u16>,
}

/// Wire protocol between members and the relay. Point-to-point variants
/// carry the target member id on the way in and the source member id on the
/// way out; the relay rewrites the field when forwarding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "d")]
pub enum SignalMessage {
    Join {
        room: RoomId,
    },
    Leave,
    Welcome {
        member_id: MemberId,
    },
    RoomList {
        rooms: Vec<RoomId>,
    },
    AddPeer {
        peer_id: MemberId,
        create_offer: bool,
    },
    RemovePeer {
        peer_id: MemberId,
    },
    RelayDescription {
        peer_id: MemberId,
        description: SessionDescription,
    },
    RelayCandidate {
        peer_id: MemberId,
        candidate: CandidatePayload,
    },
}
