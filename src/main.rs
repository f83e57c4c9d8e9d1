use std::io;
use std::net::TcpListener;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;

use football_league_backend::config::settings::{get_config, get_jwt_settings};
use football_league_backend::run;
use football_league_backend::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> io::Result<()> {
    let config = get_config()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("Failed to read the config: {}", e)))?;

    let subscriber = get_subscriber(
        "football-league-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    let jwt_settings = get_jwt_settings(&config);

    // Only try to establish connection when actually used
    let connection_pool = PgPoolOptions::new()
        .max_connections(32)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy(config.database.connection_string().expose_secret())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Failed to create Postgres connection pool: {}", e)))?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&connection_pool).await {
        tracing::error!("Failed to run database migrations: {}", e);
        return Err(io::Error::new(io::ErrorKind::Other, e.to_string()));
    }

    let address = config.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Listening on {}", address);

    run(listener, connection_pool, jwt_settings)?.await
}
