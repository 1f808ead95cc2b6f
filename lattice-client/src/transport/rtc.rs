use crate::error::TransportError;
use crate::media::{LocalTrack, MediaKind, RemoteStream};
use crate::transport::{PeerTransport, TransportEvent, TransportFactory};
use async_trait::async_trait;
use lattice_core::{CandidatePayload, MemberId, SdpKind, SessionDescription};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

/// Конфигурация ICE серверов (STUN/TURN) для WebRTC транспорта.
#[derive(Clone)]
pub struct RtcTransportConfig {
    pub ice_servers: Vec<String>,
}

impl Default for RtcTransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec!["stun:stun.l.google.com:19302".to_owned()],
        }
    }
}

/// Reference `TransportFactory` over the `webrtc` crate. Local tracks must
/// carry a `TrackLocalStaticSample`.
pub struct RtcTransportFactory {
    config: RtcTransportConfig,
}

impl RtcTransportFactory {
    pub fn new(config: RtcTransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TransportFactory for RtcTransportFactory {
    async fn create(
        &self,
        peer: MemberId,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>, TransportError> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs().map_err(rtc_err)?;

        let registry =
            register_default_interceptors(Registry::new(), &mut media_engine).map_err(rtc_err)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: vec![RTCIceServer {
                urls: self.config.ice_servers.clone(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await.map_err(rtc_err)?);

        // Trickle ICE: локальные кандидаты уходят обратно в цикл контроллера.
        let ice_tx = events.clone();
        let ice_peer = peer.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let peer = ice_peer.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };

                let payload = CandidatePayload {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                };
                let _ = tx
                    .send(TransportEvent::CandidateGenerated(peer, payload))
                    .await;
            })
        }));

        let track_tx = events;
        let track_peer = peer.clone();
        peer_connection.on_track(Box::new(move |track: Arc<TrackRemote>, _receiver, _transceiver| {
            let tx = track_tx.clone();
            let peer = track_peer.clone();

            Box::pin(async move {
                let kind = match track.kind() {
                    RTPCodecType::Audio => MediaKind::Audio,
                    _ => MediaKind::Video,
                };
                info!("Remote {:?} track arrived from {}", kind, peer);

                let stream = RemoteStream::new(kind, track);
                let _ = tx.send(TransportEvent::RemoteStream(peer, stream)).await;
            })
        }));

        Ok(Box::new(RtcTransport {
            peer,
            peer_connection,
            audio_cap: Mutex::new(None),
        }))
    }
}

struct RtcTransport {
    peer: MemberId,
    peer_connection: Arc<RTCPeerConnection>,
    audio_cap: Mutex<Option<u32>>,
}

#[async_trait]
impl PeerTransport for RtcTransport {
    async fn add_track(&self, track: &LocalTrack) -> Result<(), TransportError> {
        let Some(sample_track) = track.downcast::<TrackLocalStaticSample>() else {
            return Err(TransportError::IncompatibleTrack);
        };

        self.peer_connection
            .add_track(sample_track)
            .await
            .map_err(rtc_err)?;
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, TransportError> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .map_err(rtc_err)?;

        Ok(SessionDescription {
            kind: SdpKind::Offer,
            sdp: offer.sdp,
        })
    }

    async fn create_answer(&self) -> Result<SessionDescription, TransportError> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .map_err(rtc_err)?;

        Ok(SessionDescription {
            kind: SdpKind::Answer,
            sdp: answer.sdp,
        })
    }

    async fn set_local_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), TransportError> {
        let sdp = match *self.audio_cap.lock().await {
            Some(bps) => cap_audio_section(&description.sdp, bps),
            None => description.sdp.clone(),
        };

        self.peer_connection
            .set_local_description(to_rtc(description.kind, sdp)?)
            .await
            .map_err(rtc_err)
    }

    async fn set_remote_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), TransportError> {
        self.peer_connection
            .set_remote_description(to_rtc(description.kind, description.sdp.clone())?)
            .await
            .map_err(rtc_err)
    }

    async fn add_ice_candidate(&self, candidate: &CandidatePayload) -> Result<(), TransportError> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate.clone(),
            sdp_mid: candidate.sdp_mid.clone(),
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: None,
        };

        self.peer_connection
            .add_ice_candidate(init)
            .await
            .map_err(rtc_err)
    }

    async fn set_audio_bitrate_cap(&self, max_bitrate: u32) -> Result<(), TransportError> {
        *self.audio_cap.lock().await = Some(max_bitrate);
        Ok(())
    }

    async fn close(&self) {
        if let Err(e) = self.peer_connection.close().await {
            debug!("Close failed for {}: {}", self.peer, e);
        }
    }
}

fn rtc_err(e: webrtc::Error) -> TransportError {
    TransportError::Negotiation(e.to_string())
}

fn to_rtc(kind: SdpKind, sdp: String) -> Result<RTCSessionDescription, TransportError> {
    match kind {
        SdpKind::Offer => RTCSessionDescription::offer(sdp),
        SdpKind::Answer => RTCSessionDescription::answer(sdp),
    }
    .map_err(rtc_err)
}

/// Insert a `b=TIAS` bandwidth line into the audio media section. The cap
/// is a local encoder hint; the description relayed to the peer stays
/// untouched.
fn cap_audio_section(sdp: &str, max_bitrate: u32) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_audio = false;

    for line in sdp.lines() {
        if line.starts_with("m=") {
            in_audio = line.starts_with("m=audio");
        }
        let caps_here = in_audio && line.starts_with("c=");

        out.push(line.to_owned());
        if caps_here {
            out.push(format!("b=TIAS:{}", max_bitrate));
        }
    }

    let mut joined = out.join("\r\n");
    joined.push_str("\r\n");
    joined
}
