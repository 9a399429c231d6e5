use dotenvy::dotenv;

use stockroom::{config::Config, create_router, AppState};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let addr = format!("0.0.0.0:{}", config.port);
    log::info!("forwarding to PostgREST at {}", config.postgrest_url);

    let state = AppState::new(config);
    state.sessions.spawn_sweeper();

    let app = create_router(state);

    log::info!("stockroom listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app).await.expect("server error");
}
