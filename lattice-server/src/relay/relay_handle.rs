use crate::relay::RelayCommand;
use crate::relay::relay::OutboxMap;
use lattice_core::{MemberId, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Connection-facing side of the relay. Cheap to clone; used as axum state.
#[derive(Clone)]
pub struct RelayHandle {
    command_tx: mpsc::Sender<RelayCommand>,
    outboxes: Arc<OutboxMap>,
}

impl RelayHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<RelayCommand>, outboxes: Arc<OutboxMap>) -> Self {
        Self {
            command_tx,
            outboxes,
        }
    }

    /// Register a fresh connection and hand it a server-assigned identity.
    /// The outbox is live before the relay sees the connection, so nothing
    /// the relay emits for this member can be lost.
    pub async fn register(&self, outbox: mpsc::UnboundedSender<SignalMessage>) -> MemberId {
        let member_id = MemberId::new();
        self.outboxes.insert(member_id.clone(), outbox);
        self.send_command(RelayCommand::Connect {
            member_id: member_id.clone(),
        })
        .await;
        member_id
    }

    pub async fn unregister(&self, member_id: &MemberId) {
        self.outboxes.remove(member_id);
        self.send_command(RelayCommand::Disconnect {
            member_id: member_id.clone(),
        })
        .await;
    }

    /// Map an inbound client message onto a relay command. Server-to-client
    /// variants arriving from a client are ignored.
    pub async fn submit(&self, member_id: MemberId, msg: SignalMessage) {
        let cmd = match msg {
            SignalMessage::Join { room } => RelayCommand::Join { member_id, room },
            SignalMessage::Leave => RelayCommand::Leave { member_id },
            SignalMessage::RelayDescription {
                peer_id,
                description,
            } => RelayCommand::Description {
                member_id,
                peer_id,
                description,
            },
            SignalMessage::RelayCandidate { peer_id, candidate } => RelayCommand::Candidate {
                member_id,
                peer_id,
                candidate,
            },
            other => {
                debug!("Ignoring client message {:?} from {}", other, member_id);
                return;
            }
        };

        self.send_command(cmd).await;
    }

    async fn send_command(&self, cmd: RelayCommand) {
        if let Err(e) = self.command_tx.send(cmd).await {
            error!("Relay died: {}", e);
        }
    }
}
