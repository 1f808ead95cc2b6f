pub mod model;

pub use model::{CandidatePayload, MemberId, RoomId, SdpKind, SessionDescription, SignalMessage};
