//! Local backends to dispatch against.
//!
//! ```text
//! cargo run --example mock_backend -- 8081 8082 8083
//! cargo run -- -b http://127.0.0.1:8081 -b http://127.0.0.1:8082 -b http://127.0.0.1:8083
//! ```
//!
//! Stop one of the backends to watch it get removed, restart it to watch the
//! prober bring it back.

use axum::{routing::get, Router};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ports: Vec<u16> = std::env::args()
        .skip(1)
        .map(|p| p.parse())
        .collect::<Result<_, _>>()?;
    let ports = if ports.is_empty() { vec![8081, 8082, 8083] } else { ports };

    let mut servers = Vec::new();
    for port in ports {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let body = format!("Hello from backend {}", port);
        let app = Router::new().route("/", get(move || async move { body }));

        let listener = tokio::net::TcpListener::bind(addr).await?;
        println!("Mock backend listening on http://{}", addr);
        servers.push(tokio::spawn(async move { axum::serve(listener, app).await }));
    }

    for server in servers {
        server.await??;
    }
    Ok(())
}
