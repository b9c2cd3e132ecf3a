use database::{DatabaseConnectionInfo, PgDatabase};
use spots::{database::Database, index::GridIndex, memory::MemoryDatabase, SpotStore};
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = WebConfig::from_env();

    // database
    match DatabaseConnectionInfo::from_env() {
        Some(database_connection_info) => {
            let database = PgDatabase::connect(database_connection_info)
                .await
                .expect("could not connect to database.");
            serve(database, config).await;
        }
        None => {
            log::warn!("no database connection info in env, spots are kept in memory only.");
            serve(MemoryDatabase::new(), config).await;
        }
    }
}

async fn serve<D: Database>(database: D, config: WebConfig) {
    let store = SpotStore::open(database, GridIndex::new(config.grid_cell_degrees))
        .await
        .expect("could not load stored spots.");

    // web server
    if let Err(why) = start_web_server(WebState { store }, &config).await {
        log::error!("web server stopped: {}", why);
    }
}
