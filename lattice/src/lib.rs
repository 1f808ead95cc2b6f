pub use lattice_core::model::MemberId;

pub mod model {
    pub use lattice_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use lattice_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use lattice_client::*;
}
