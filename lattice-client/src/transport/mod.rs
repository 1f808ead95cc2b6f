pub mod rtc;

use crate::error::TransportError;
use crate::media::{LocalTrack, RemoteStream};
use async_trait::async_trait;
use lattice_core::{CandidatePayload, MemberId, SessionDescription};
use tokio::sync::mpsc;

/// Transport completions posted back into the controller's dispatch loop.
#[derive(Debug)]
pub enum TransportEvent {
    CandidateGenerated(MemberId, CandidatePayload),
    RemoteStream(MemberId, RemoteStream),
}

/// Negotiation capability set the controller requires from the underlying
/// real-time transport. One instance per peer session.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn add_track(&self, track: &LocalTrack) -> Result<(), TransportError>;

    async fn create_offer(&self) -> Result<SessionDescription, TransportError>;

    async fn create_answer(&self) -> Result<SessionDescription, TransportError>;

    async fn set_local_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), TransportError>;

    async fn set_remote_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), TransportError>;

    async fn add_ice_candidate(&self, candidate: &CandidatePayload) -> Result<(), TransportError>;

    /// Cap the outbound audio encoder. Applied locally only; rejection is
    /// not fatal to the session and is never renegotiated.
    async fn set_audio_bitrate_cap(&self, max_bitrate: u32) -> Result<(), TransportError>;

    async fn close(&self);
}

#[async_trait]
pub trait TransportFactory: Send + Sync {
    /// Create a transport toward one peer. Asynchronous completions
    /// (gathered candidates, arriving remote media) go through `events`.
    async fn create(
        &self,
        peer: MemberId,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>, TransportError>;
}
