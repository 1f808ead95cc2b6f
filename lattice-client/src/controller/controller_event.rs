use lattice_core::{CandidatePayload, MemberId, SessionDescription, SignalMessage};

/// Inbound signaling for one controller, in relay delivery order.
#[derive(Debug)]
pub enum ControllerEvent {
    AddPeer {
        peer_id: MemberId,
        create_offer: bool,
    },
    RemovePeer {
        peer_id: MemberId,
    },
    Description {
        peer_id: MemberId,
        description: SessionDescription,
    },
    Candidate {
        peer_id: MemberId,
        candidate: CandidatePayload,
    },
    Shutdown,
}

impl ControllerEvent {
    /// Map a relay message onto a controller event. Variants the controller
    /// does not consume map to `None`.
    pub fn from_signal(msg: SignalMessage) -> Option<Self> {
        match msg {
            SignalMessage::AddPeer {
                peer_id,
                create_offer,
            } => Some(Self::AddPeer {
                peer_id,
                create_offer,
            }),
            SignalMessage::RemovePeer { peer_id } => Some(Self::RemovePeer { peer_id }),
            SignalMessage::RelayDescription {
                peer_id,
                description,
            } => Some(Self::Description {
                peer_id,
                description,
            }),
            SignalMessage::RelayCandidate { peer_id, candidate } => {
                Some(Self::Candidate { peer_id, candidate })
            }
            _ => None,
        }
    }
}
