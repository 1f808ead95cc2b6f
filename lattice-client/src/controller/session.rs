use crate::error::TransportError;
use crate::media::LocalTrack;
use crate::transport::PeerTransport;
use lattice_core::{CandidatePayload, MemberId, SdpKind, SessionDescription};
use tracing::{debug, warn};

/// Fixed outbound audio encoder cap, applied by the offering side only.
pub const AUDIO_MAX_BITRATE: u32 = 128_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    New,
    HaveLocalOffer,
    HaveRemoteOffer,
    Connected,
    Closed,
}

/// What applying a remote description produced.
#[derive(Debug)]
pub enum DescriptionOutcome {
    /// Remote offer accepted; the synthesized answer goes back through the
    /// relay.
    Answered(SessionDescription),
    /// Remote answer accepted; negotiation is complete.
    Completed,
    /// The description does not fit the current state and was dropped.
    Stale,
}

/// One participant's negotiation state machine toward one remote member.
/// All mutation happens on the owning controller's dispatch task.
pub struct PeerSession {
    peer: MemberId,
    state: SessionState,
    initiator: bool,
    transport: Box<dyn PeerTransport>,
}

impl PeerSession {
    pub fn new(peer: MemberId, initiator: bool, transport: Box<dyn PeerTransport>) -> Self {
        Self {
            peer,
            state: SessionState::New,
            initiator,
            transport,
        }
    }

    pub fn peer(&self) -> &MemberId {
        &self.peer
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_initiator(&self) -> bool {
        self.initiator
    }

    pub async fn attach_tracks(&self, tracks: &[LocalTrack]) -> Result<(), TransportError> {
        for track in tracks {
            self.transport.add_track(track).await?;
        }
        Ok(())
    }

    /// Initiator path: produce the local offer and move to HaveLocalOffer.
    /// The audio cap is applied before the description lands locally and is
    /// best-effort.
    pub async fn start_offer(&mut self) -> Result<SessionDescription, TransportError> {
        let offer = self.transport.create_offer().await?;

        if let Err(e) = self.transport.set_audio_bitrate_cap(AUDIO_MAX_BITRATE).await {
            warn!("Audio bitrate cap rejected for {}: {}", self.peer, e);
        }

        self.transport.set_local_description(&offer).await?;
        self.state = SessionState::HaveLocalOffer;

        Ok(offer)
    }

    /// Drive the offer/answer exchange. Combinations that do not fit the
    /// current state come back as `Stale`; duplicate and late deliveries
    /// end up here.
    pub async fn apply_remote_description(
        &mut self,
        description: SessionDescription,
    ) -> Result<DescriptionOutcome, TransportError> {
        match (description.kind, self.state) {
            (SdpKind::Offer, SessionState::New) => {
                self.transport.set_remote_description(&description).await?;
                self.state = SessionState::HaveRemoteOffer;

                let answer = self.transport.create_answer().await?;
                self.transport.set_local_description(&answer).await?;
                self.state = SessionState::Connected;

                Ok(DescriptionOutcome::Answered(answer))
            }
            (SdpKind::Answer, SessionState::HaveLocalOffer) => {
                self.transport.set_remote_description(&description).await?;
                self.state = SessionState::Connected;

                Ok(DescriptionOutcome::Completed)
            }
            (kind, state) => {
                debug!("Stale {:?} for {} in state {:?}", kind, self.peer, state);
                Ok(DescriptionOutcome::Stale)
            }
        }
    }

    /// Candidates apply in any live state; the transport may reject early
    /// arrivals, which is not fatal.
    pub async fn apply_candidate(&self, candidate: &CandidatePayload) {
        if self.state == SessionState::Closed {
            return;
        }

        if let Err(e) = self.transport.add_ice_candidate(candidate).await {
            debug!("Candidate rejected for {}: {}", self.peer, e);
        }
    }

    /// Terminal. Releases the transport immediately; repeat calls are
    /// no-ops.
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }

        self.state = SessionState::Closed;
        self.transport.close().await;
    }
}
