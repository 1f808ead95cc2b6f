use thiserror::Error;

/// Local media acquisition failure. Fatal to joining a room; never retried.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture device unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport rejected an offer/answer/candidate. The affected
    /// session is abandoned; other sessions are unaffected.
    #[error("negotiation rejected: {0}")]
    Negotiation(String),

    #[error("track is not compatible with this transport")]
    IncompatibleTrack,

    #[error("transport closed")]
    Closed,
}
