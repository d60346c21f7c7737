use loyalty_cards::{
    adapters::mock::{
        customer_directory::CustomerDirectory as MockCustomerDirectory,
        reward_catalog::RewardCatalog as MockRewardCatalog,
    },
    adapters::postgres::{
        card_repository::CardRepository as PostgresCardRepository,
        ledger_store::LedgerStore as PostgresLedgerStore,
    },
    api::{handlers::AppState, router::create_router},
    application::cards::{CardLockRegistry, ServiceDependencies},
    domain::tier::TierSchedule,
    domain::value_objects::RewardId,
    ports::reward_catalog::Reward,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loyalty_cards=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection URL
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/loyalty_cards".into());

    tracing::info!("Database URL: {}", database_url);

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Apply pending migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    // Initialize adapters
    let card_repository = Arc::new(PostgresCardRepository::new(pool.clone()));
    let ledger_store = Arc::new(PostgresLedgerStore::new(pool.clone()));
    let customer_directory = Arc::new(MockCustomerDirectory::new());
    let reward_catalog = Arc::new(MockRewardCatalog::new());

    // Seed demo rewards for the mock catalog
    for (name, points_cost, description) in [
        (
            "Free night stay",
            50_000,
            "One complimentary night in a standard room",
        ),
        (
            "Dinner for two",
            20_000,
            "Course dinner at the main restaurant",
        ),
        ("Spa voucher", 8_000, "60-minute spa treatment"),
    ] {
        reward_catalog.add_reward(Reward {
            id: RewardId::new(),
            name: name.to_string(),
            points_cost,
            description: description.to_string(),
        });
    }

    // Create service dependencies
    let service_deps = ServiceDependencies {
        card_repository,
        ledger_store,
        customer_directory,
        reward_catalog,
        card_locks: Arc::new(CardLockRegistry::new()),
        tier_schedule: TierSchedule::from_env(),
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
