use crate::error::CaptureError;
use async_trait::async_trait;
use lattice_core::MemberId;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

#[derive(Debug, Clone)]
pub struct AudioConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
    pub channel_count: u8,
    pub sample_rate: u32,
    pub sample_size: u8,
}

impl Default for AudioConstraints {
    fn default() -> Self {
        Self {
            echo_cancellation: false,
            noise_suppression: false,
            auto_gain_control: false,
            channel_count: 2,
            sample_rate: 48_000,
            sample_size: 16,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VideoConstraints {
    pub width: u32,
    pub height: u32,
}

impl Default for VideoConstraints {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CaptureConstraints {
    pub audio: AudioConstraints,
    pub video: VideoConstraints,
}

/// Handle to one local capture track. The payload is opaque to the
/// controller; a transport adapter downcasts it to its own track type.
#[derive(Clone)]
pub struct LocalTrack {
    kind: MediaKind,
    id: String,
    handle: Arc<dyn Any + Send + Sync>,
}

impl LocalTrack {
    pub fn new(kind: MediaKind, id: impl Into<String>, handle: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            kind,
            id: id.into(),
            handle,
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.handle.clone().downcast::<T>().ok()
    }
}

impl fmt::Debug for LocalTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalTrack")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

/// Handle to media arriving from a remote member, passed through to the
/// rendering slot untouched.
#[derive(Clone)]
pub struct RemoteStream {
    kind: MediaKind,
    handle: Arc<dyn Any + Send + Sync>,
}

impl RemoteStream {
    pub fn new(kind: MediaKind, handle: Arc<dyn Any + Send + Sync>) -> Self {
        Self { kind, handle }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.handle.clone().downcast::<T>().ok()
    }
}

impl fmt::Debug for RemoteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteStream")
            .field("kind", &self.kind)
            .finish()
    }
}

/// Local capture hardware. Acquisition happens once per room join; every
/// peer session attaches its own reference to the same tracks.
#[async_trait]
pub trait CaptureAdapter: Send + Sync {
    async fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Vec<LocalTrack>, CaptureError>;

    async fn release(&self);
}

/// Rendering slot for remote media, keyed by member.
pub trait RenderSink: Send + Sync {
    fn bind(&self, member: &MemberId, stream: RemoteStream);

    fn clear(&self, member: &MemberId);
}
