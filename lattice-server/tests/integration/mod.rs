pub mod membership_tests;

use lattice_server::{Relay, RelayHandle};
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn spawn_relay() -> RelayHandle {
    let (handle, relay) = Relay::new();
    tokio::spawn(relay.run());
    handle
}
