/**
 * Server Configuration
 *
 * Loads configuration from environment variables:
 *
 * - `DATABASE_URL` - PostgreSQL connection string (required)
 * - `PUSH_GATEWAY_URL` - push gateway endpoint (defaults to the Expo
 *   public gateway)
 * - `SERVER_PORT` - listen port, read in `main`
 * - `JWT_SECRET` - token signing secret, read in `auth::tokens`
 *
 * Migrations are run at startup. A migration failure is logged but does
 * not abort startup, since the schema may already be up to date.
 */

use sqlx::PgPool;

/// Default gateway matching the mobile client's push provider.
const DEFAULT_PUSH_GATEWAY: &str = "https://exp.host/--/api/v2/push/send";

/// Connect to the database and run migrations.
///
/// Unlike optional services, the API cannot serve requests without its
/// store, so a missing `DATABASE_URL` or failed connection is fatal.
pub async fn init_database() -> Result<PgPool, sqlx::Error> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        tracing::error!("DATABASE_URL not set");
        sqlx::Error::Configuration("DATABASE_URL not set".into())
    })?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {:?}", e);
            tracing::warn!("Continuing - database might not be up to date");
        }
    }

    Ok(pool)
}

/// Push gateway endpoint for outbound notifications.
pub fn push_gateway_url() -> String {
    std::env::var("PUSH_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_PUSH_GATEWAY.to_string())
}
