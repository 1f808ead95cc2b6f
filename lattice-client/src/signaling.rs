use async_trait::async_trait;
use lattice_core::{CandidatePayload, MemberId, RoomId, SessionDescription};

/// Трейт, который должна реализовать внешняя система (WebSocket клиент),
/// чтобы контроллер мог отправлять сигналы в релей.
#[async_trait]
pub trait SignalingOutbound: Send + Sync {
    /// Войти в комнату.
    async fn join(&self, room: RoomId);

    /// Покинуть комнату.
    async fn leave(&self);

    /// Отправить SDP конкретному участнику.
    async fn relay_description(&self, peer: MemberId, description: SessionDescription);

    /// Отправить ICE кандидата конкретному участнику.
    async fn relay_candidate(&self, peer: MemberId, candidate: CandidatePayload);
}
