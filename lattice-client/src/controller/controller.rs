use crate::controller::{ControllerEvent, DescriptionOutcome, PeerSession, SessionState};
use crate::error::CaptureError;
use crate::media::{CaptureAdapter, CaptureConstraints, LocalTrack, RenderSink};
use crate::signaling::SignalingOutbound;
use crate::transport::{TransportEvent, TransportFactory};
use lattice_core::{CandidatePayload, MemberId, RoomId, SessionDescription};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// One participant's side of the mesh: an owned map from remote member to
/// `PeerSession`, driven by a single dispatch loop. Messages for one peer
/// are processed in delivery order; sessions for different peers are
/// independent.
pub struct SessionController {
    sessions: HashMap<MemberId, PeerSession>,
    pending_candidates: HashMap<MemberId, Vec<CandidatePayload>>,
    local_tracks: Vec<LocalTrack>,
    capture: Arc<dyn CaptureAdapter>,
    factory: Arc<dyn TransportFactory>,
    renderer: Arc<dyn RenderSink>,
    signaling: Arc<dyn SignalingOutbound>,
    event_rx: mpsc::Receiver<ControllerEvent>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    transport_tx: mpsc::Sender<TransportEvent>,
}

impl SessionController {
    pub fn new(
        capture: Arc<dyn CaptureAdapter>,
        factory: Arc<dyn TransportFactory>,
        renderer: Arc<dyn RenderSink>,
        signaling: Arc<dyn SignalingOutbound>,
    ) -> (Self, mpsc::Sender<ControllerEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (transport_tx, transport_rx) = mpsc::channel(256);

        let controller = Self {
            sessions: HashMap::new(),
            pending_candidates: HashMap::new(),
            local_tracks: Vec::new(),
            capture,
            factory,
            renderer,
            signaling,
            event_rx,
            transport_rx,
            transport_tx,
        };

        (controller, event_tx)
    }

    /// Acquire local media and announce the join. A capture failure is the
    /// only error surfaced to the caller; the room is not joined and
    /// nothing needs cleanup.
    pub async fn start(
        &mut self,
        room: RoomId,
        constraints: &CaptureConstraints,
    ) -> Result<(), CaptureError> {
        self.local_tracks = self.capture.acquire(constraints).await?;
        self.signaling.join(room).await;
        Ok(())
    }

    pub async fn run(mut self) {
        info!("Controller event loop started");

        loop {
            tokio::select! {
                evt = self.event_rx.recv() => {
                    match evt {
                        Some(ControllerEvent::Shutdown) | None => {
                            self.shutdown().await;
                            break;
                        }
                        Some(evt) => self.process(evt).await,
                    }
                }

                evt = self.transport_rx.recv() => {
                    if let Some(evt) = evt {
                        self.process_transport(evt).await;
                    }
                }
            }
        }

        info!("Controller event loop finished");
    }

    pub fn session_state(&self, peer: &MemberId) -> Option<SessionState> {
        self.sessions.get(peer).map(PeerSession::state)
    }

    pub fn is_initiator(&self, peer: &MemberId) -> Option<bool> {
        self.sessions.get(peer).map(PeerSession::is_initiator)
    }

    /// Dispatch one signaling event. `run` calls this internally; tests
    /// and embedders may drive it directly for deterministic ordering.
    pub async fn process(&mut self, evt: ControllerEvent) {
        match evt {
            ControllerEvent::AddPeer {
                peer_id,
                create_offer,
            } => self.add_peer(peer_id, create_offer).await,
            ControllerEvent::RemovePeer { peer_id } => self.remove_peer(&peer_id).await,
            ControllerEvent::Description {
                peer_id,
                description,
            } => self.apply_description(peer_id, description).await,
            ControllerEvent::Candidate { peer_id, candidate } => {
                self.apply_candidate(peer_id, candidate).await
            }
            ControllerEvent::Shutdown => self.shutdown().await,
        }
    }

    pub async fn process_transport(&mut self, evt: TransportEvent) {
        match evt {
            TransportEvent::CandidateGenerated(peer_id, candidate) => {
                if self.sessions.contains_key(&peer_id) {
                    self.signaling.relay_candidate(peer_id, candidate).await;
                }
            }
            TransportEvent::RemoteStream(peer_id, stream) => {
                if self.sessions.contains_key(&peer_id) {
                    self.renderer.bind(&peer_id, stream);
                }
            }
        }
    }

    async fn add_peer(&mut self, peer_id: MemberId, create_offer: bool) {
        if self.sessions.contains_key(&peer_id) {
            debug!("Duplicate add-peer for {}", peer_id);
            return;
        }

        let transport = match self
            .factory
            .create(peer_id.clone(), self.transport_tx.clone())
            .await
        {
            Ok(transport) => transport,
            Err(e) => {
                error!("Failed to create transport for {}: {}", peer_id, e);
                return;
            }
        };

        let mut session = PeerSession::new(peer_id.clone(), create_offer, transport);

        if let Err(e) = session.attach_tracks(&self.local_tracks).await {
            error!("Failed to attach local tracks for {}: {}", peer_id, e);
            session.close().await;
            return;
        }

        if create_offer {
            match session.start_offer().await {
                Ok(offer) => self.signaling.relay_description(peer_id.clone(), offer).await,
                Err(e) => {
                    error!("Offer negotiation failed for {}: {}", peer_id, e);
                    session.close().await;
                    return;
                }
            }
        }

        // Candidates that outran the add-peer notification.
        for candidate in self.pending_candidates.remove(&peer_id).unwrap_or_default() {
            session.apply_candidate(&candidate).await;
        }

        self.sessions.insert(peer_id, session);
    }

    async fn remove_peer(&mut self, peer_id: &MemberId) {
        self.pending_candidates.remove(peer_id);
        self.renderer.clear(peer_id);

        match self.sessions.remove(peer_id) {
            Some(mut session) => {
                session.close().await;
                info!("Session with {} closed", peer_id);
            }
            None => debug!("Remove-peer for untracked member {}", peer_id),
        }
    }

    async fn apply_description(&mut self, peer_id: MemberId, description: SessionDescription) {
        let Some(session) = self.sessions.get_mut(&peer_id) else {
            debug!("Description for unknown peer {}", peer_id);
            return;
        };

        match session.apply_remote_description(description).await {
            Ok(DescriptionOutcome::Answered(answer)) => {
                self.signaling.relay_description(peer_id, answer).await;
            }
            Ok(DescriptionOutcome::Completed) => {
                debug!("Negotiation with {} complete", peer_id);
            }
            Ok(DescriptionOutcome::Stale) => {}
            Err(e) => {
                error!("Negotiation failed for {}: {}", peer_id, e);
                self.abandon(&peer_id).await;
            }
        }
    }

    async fn apply_candidate(&mut self, peer_id: MemberId, candidate: CandidatePayload) {
        match self.sessions.get(&peer_id) {
            Some(session) => session.apply_candidate(&candidate).await,
            None => {
                self.pending_candidates
                    .entry(peer_id)
                    .or_default()
                    .push(candidate);
            }
        }
    }

    /// Per-peer failure isolation: drop this one session and its bindings,
    /// leave every other session running.
    async fn abandon(&mut self, peer_id: &MemberId) {
        if let Some(mut session) = self.sessions.remove(peer_id) {
            session.close().await;
        }
        self.renderer.clear(peer_id);
        self.pending_candidates.remove(peer_id);
    }

    async fn shutdown(&mut self) {
        info!("Shutting down {} peer sessions", self.sessions.len());

        for (peer_id, session) in self.sessions.iter_mut() {
            session.close().await;
            self.renderer.clear(peer_id);
        }

        self.sessions.clear();
        self.pending_candidates.clear();
        self.local_tracks.clear();

        self.capture.release().await;
        self.signaling.leave().await;
    }
}
