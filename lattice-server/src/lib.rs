mod relay;
mod room;
mod signaling;

pub use relay::{Relay, RelayCommand, RelayHandle};
pub use room::{Departure, JoinOutcome, RoomRegistry};
pub use signaling::ws_handler;
