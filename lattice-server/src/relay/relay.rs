use crate::relay::{RelayCommand, RelayHandle};
use crate::room::{JoinOutcome, RoomRegistry};
use dashmap::DashMap;
use lattice_core::{MemberId, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub(crate) type OutboxMap = DashMap<MemberId, mpsc::UnboundedSender<SignalMessage>>;

/// The signaling relay: a single task owning the room membership tables and
/// forwarding point-to-point signals between member connections. Membership
/// mutation and the resulting add/remove-peer fan-out happen inside one
/// command handler, so no peer notification can race a membership change.
pub struct Relay {
    registry: RoomRegistry,
    outboxes: Arc<OutboxMap>,
    command_rx: mpsc::Receiver<RelayCommand>,
}

impl Relay {
    pub fn new() -> (RelayHandle, Self) {
        let (command_tx, command_rx) = mpsc::channel(256);
        let outboxes: Arc<OutboxMap> = Arc::new(DashMap::new());

        let relay = Self {
            registry: RoomRegistry::new(),
            outboxes: outboxes.clone(),
            command_rx,
        };

        (RelayHandle::new(command_tx, outboxes), relay)
    }

    pub async fn run(mut self) {
        info!("Relay event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        info!("Relay event loop finished");
    }

    fn handle_command(&mut self, cmd: RelayCommand) {
        match cmd {
            RelayCommand::Connect { member_id } => {
                self.send_to(
                    &member_id,
                    SignalMessage::Welcome {
                        member_id: member_id.clone(),
                    },
                );
                self.send_to(
                    &member_id,
                    SignalMessage::RoomList {
                        rooms: self.registry.rooms(),
                    },
                );
            }

            RelayCommand::Join { member_id, room } => {
                match self.registry.join(member_id.clone(), room.clone()) {
                    JoinOutcome::Joined(existing) => {
                        info!(
                            "Member {} joined room '{}' ({} already present)",
                            member_id,
                            room,
                            existing.len()
                        );

                        for peer in &existing {
                            self.send_to(
                                peer,
                                SignalMessage::AddPeer {
                                    peer_id: member_id.clone(),
                                    create_offer: false,
                                },
                            );
                            self.send_to(
                                &member_id,
                                SignalMessage::AddPeer {
                                    peer_id: peer.clone(),
                                    create_offer: true,
                                },
                            );
                        }

                        self.broadcast_rooms();
                    }
                    JoinOutcome::AlreadyMember => {
                        debug!("Member {} re-joined room '{}'", member_id, room);
                    }
                    JoinOutcome::OtherRoom(current) => {
                        warn!(
                            "Member {} tried to join '{}' while still in '{}'",
                            member_id, room, current
                        );
                    }
                }
            }

            RelayCommand::Leave { member_id } => self.remove_member(&member_id, false),

            RelayCommand::Disconnect { member_id } => self.remove_member(&member_id, true),

            RelayCommand::Description {
                member_id,
                peer_id,
                description,
            } => {
                self.forward(
                    &peer_id,
                    SignalMessage::RelayDescription {
                        peer_id: member_id,
                        description,
                    },
                );
            }

            RelayCommand::Candidate {
                member_id,
                peer_id,
                candidate,
            } => {
                self.forward(
                    &peer_id,
                    SignalMessage::RelayCandidate {
                        peer_id: member_id,
                        candidate,
                    },
                );
            }
        }
    }

    fn remove_member(&mut self, member_id: &MemberId, drop_outbox: bool) {
        if let Some(departure) = self.registry.leave(member_id) {
            info!(
                "Member {} left room '{}' ({} remaining)",
                member_id,
                departure.room,
                departure.remaining.len()
            );

            for peer in &departure.remaining {
                self.send_to(
                    peer,
                    SignalMessage::RemovePeer {
                        peer_id: member_id.clone(),
                    },
                );
                self.send_to(
                    member_id,
                    SignalMessage::RemovePeer {
                        peer_id: peer.clone(),
                    },
                );
            }

            self.broadcast_rooms();
        }

        if drop_outbox {
            self.outboxes.remove(member_id);
        }
    }

    /// Point-to-point forwarding. A target that already left is not an
    /// error: the message is dropped.
    fn forward(&self, target: &MemberId, msg: SignalMessage) {
        match self.outboxes.get(target) {
            Some(outbox) => {
                let _ = outbox.send(msg);
            }
            None => debug!("Dropping signal for unknown member {}", target),
        }
    }

    fn send_to(&self, target: &MemberId, msg: SignalMessage) {
        self.forward(target, msg);
    }

    fn broadcast_rooms(&self) {
        let msg = SignalMessage::RoomList {
            rooms: self.registry.rooms(),
        };

        for entry in self.outboxes.iter() {
            let _ = entry.value().send(msg.clone());
        }
    }
}
