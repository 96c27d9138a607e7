use tracing::info;

use crate::torn::HttpTransport;

pub mod api;
pub mod routes;

pub use routes::build_router;

pub async fn run_server(bind_addr: &str, api_base: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("warpay server listening on http://{bind_addr}");
    axum::serve(listener, build_router(HttpTransport::new(), api_base)).await
}
