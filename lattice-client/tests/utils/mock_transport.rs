use async_trait::async_trait;
use lattice_client::{
    LocalTrack, PeerTransport, TransportError, TransportEvent, TransportFactory,
};
use lattice_core::{CandidatePayload, MemberId, SdpKind, SessionDescription};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Shared per-peer operation log, recorded in call order.
#[derive(Clone, Default)]
pub struct TransportLog {
    ops: Arc<Mutex<Vec<String>>>,
}

impl TransportLog {
    pub fn push(&self, op: impl Into<String>) {
        self.ops.lock().unwrap().push(op.into());
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| op.starts_with(prefix))
            .count()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .position(|op| op.starts_with(prefix))
    }
}

pub struct MockTransport {
    peer: MemberId,
    log: TransportLog,
    fail_offer: bool,
}

#[async_trait]
impl PeerTransport for MockTransport {
    async fn add_track(&self, track: &LocalTrack) -> Result<(), TransportError> {
        self.log.push(format!("add_track:{}", track.id()));
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, TransportError> {
        if self.fail_offer {
            return Err(TransportError::Negotiation("mock offer failure".into()));
        }

        self.log.push("create_offer");
        Ok(SessionDescription {
            kind: SdpKind::Offer,
            sdp: format!("offer-toward-{}", self.peer),
        })
    }

    async fn create_answer(&self) -> Result<SessionDescription, TransportError> {
        self.log.push("create_answer");
        Ok(SessionDescription {
            kind: SdpKind::Answer,
            sdp: format!("answer-toward-{}", self.peer),
        })
    }

    async fn set_local_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), TransportError> {
        self.log.push(format!("set_local:{:?}", description.kind));
        Ok(())
    }

    async fn set_remote_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), TransportError> {
        self.log.push(format!("set_remote:{}", description.sdp));
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: &CandidatePayload) -> Result<(), TransportError> {
        self.log.push(format!("candidate:{}", candidate.candidate));
        Ok(())
    }

    async fn set_audio_bitrate_cap(&self, max_bitrate: u32) -> Result<(), TransportError> {
        self.log.push(format!("audio_cap:{}", max_bitrate));
        Ok(())
    }

    async fn close(&self) {
        self.log.push("close");
    }
}

/// Factory handing out `MockTransport`s and keeping one log per peer so
/// tests can inspect what the controller drove each session through.
#[derive(Default)]
pub struct MockTransportFactory {
    logs: Mutex<HashMap<MemberId, TransportLog>>,
    fail_create: Mutex<HashSet<MemberId>>,
    fail_offer: Mutex<HashSet<MemberId>>,
}

impl MockTransportFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_create_for(&self, peer: &MemberId) {
        self.fail_create.lock().unwrap().insert(peer.clone());
    }

    pub fn fail_offer_for(&self, peer: &MemberId) {
        self.fail_offer.lock().unwrap().insert(peer.clone());
    }

    pub fn log_for(&self, peer: &MemberId) -> TransportLog {
        self.logs
            .lock()
            .unwrap()
            .entry(peer.clone())
            .or_default()
            .clone()
    }
}

#[async_trait]
impl TransportFactory for MockTransportFactory {
    async fn create(
        &self,
        peer: MemberId,
        _events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>, TransportError> {
        if self.fail_create.lock().unwrap().contains(&peer) {
            return Err(TransportError::Negotiation("mock create failure".into()));
        }

        let log = self.log_for(&peer);
        let fail_offer = self.fail_offer.lock().unwrap().contains(&peer);

        Ok(Box::new(MockTransport {
            peer,
            log,
            fail_offer,
        }))
    }
}
