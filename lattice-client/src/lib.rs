mod controller;
mod error;
mod media;
mod signaling;
mod transport;

pub use controller::{
    AUDIO_MAX_BITRATE, ControllerEvent, DescriptionOutcome, PeerSession, SessionController,
    SessionState,
};
pub use error::{CaptureError, TransportError};
pub use media::{
    AudioConstraints, CaptureAdapter, CaptureConstraints, LocalTrack, MediaKind, RemoteStream,
    RenderSink, VideoConstraints,
};
pub use signaling::SignalingOutbound;
pub use transport::rtc::{RtcTransportConfig, RtcTransportFactory};
pub use transport::{PeerTransport, TransportEvent, TransportFactory};
