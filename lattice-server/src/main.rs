use clap::Parser;
use lattice_server::{Relay, ws_handler};
use std::net::{IpAddr, SocketAddr};
use tower_http::cors::{Any, CorsLayer};
use tracing::{Level, info};

#[derive(Parser)]
#[command(name = "lattice-server", about = "Mesh video-chat signaling relay")]
struct Args {
    /// Address to bind the WebSocket listener to.
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Listener port.
    #[arg(long, default_value_t = 3001)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args = Args::parse();

    let (handle, relay) = Relay::new();
    tokio::spawn(relay.run());

    // Browser clients connect from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = axum::Router::new()
        .route("/ws", axum::routing::get(ws_handler))
        .layer(cors)
        .with_state(handle);

    let addr = SocketAddr::from((args.bind, args.port));
    info!("Signaling relay listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
