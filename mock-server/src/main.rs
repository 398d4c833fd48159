use mock_server::Credentials;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "9200".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;

    info!("listening on {addr}");
    match std::env::var("MOCK_USER") {
        Ok(user) => {
            let pass = std::env::var("MOCK_PASS").unwrap_or_default();
            info!(%user, "basic auth enabled");
            mock_server::serve(listener, mock_server::app_with_credentials(Credentials::new(&user, &pass))).await
        }
        Err(_) => mock_server::run(listener).await,
    }
}
