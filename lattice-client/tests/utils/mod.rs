pub mod mock_transport;

pub use harness::*;
pub use mock_media::*;
pub use mock_outbound::*;
pub use mock_transport::*;
