use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, Server};
use sea_orm::DatabaseConnection;
use tracing::info;

use gatehouse_backend::api::build_route;
use gatehouse_backend::config;
use gatehouse_backend::stores::{RoleStore, DEFAULT_ROLE_NAME};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    config::init_logging().expect("Failed to initialize logging");

    let db_config = config::DatabaseConfig::from_env();
    let db = db_config
        .connect()
        .await
        .expect("Failed to connect to database");
    info!(url = %db_config.url, "connected to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    info!("database migrations completed");

    // Registration requires the default role; seed it before serving.
    seed_default_role(&db).await;

    let bind_addr = config::bind_addr();
    let app = build_route(db, config::session_idle_timeout());

    info!(%bind_addr, "starting server");
    info!("Swagger UI available under /swagger");

    Server::new(TcpListener::bind(bind_addr)).run(app).await
}

async fn seed_default_role(db: &DatabaseConnection) {
    let roles = RoleStore::new(db.clone());
    let existing = roles
        .find_role_by_name(DEFAULT_ROLE_NAME)
        .await
        .expect("Failed to look up default role");

    if existing.is_none() {
        roles
            .create_role(DEFAULT_ROLE_NAME, "Default role granted on registration")
            .await
            .expect("Failed to seed default role");
        info!(role = DEFAULT_ROLE_NAME, "seeded default role");
    }
}
