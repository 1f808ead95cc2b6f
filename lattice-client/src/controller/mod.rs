mod controller;
mod controller_event;
mod session;

pub use controller::*;
pub use controller_event::*;
pub use session::*;
