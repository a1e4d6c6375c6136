use std::error::Error;

use axum::serve;
use dotenv::dotenv;
use task_tracker::{
    config::ServerConfig,
    logging,
    server::{service, store::Store, TaskState},
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    logging::init_stdout();

    let config = ServerConfig::from_env()?;

    // A store that cannot be opened aborts startup
    let store = Store::open(&config.store_uri)?;
    info!(store = %config.store_uri, "store connected");

    let state = TaskState::new(store);

    let listener = TcpListener::bind(config.listen_addr()).await?;
    info!(address = %listener.local_addr()?, "serving");
    serve(listener, service(state, config.cors_origin)).await?;

    Ok(())
}
