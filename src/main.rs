use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use estate_api::config::AppConfig;
use estate_api::create_pool;
use estate_api::handlers;
use estate_api::storage::{MEDIA_ROUTE, MediaStorage};
use migration::{Migrator, MigratorTrait};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let db = create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("Failed to apply migrations");
        tracing::info!("Database migrations applied");
    }

    let storage = MediaStorage::new(&config.media_dir);
    storage.ensure_root().await?;
    tracing::info!("Storing uploads in {}", storage.root().display());

    let db_data = web::Data::new(db);
    let storage_data = web::Data::new(storage);
    let max_upload_bytes = config.max_upload_bytes;
    let media_dir = config.media_dir.clone();

    let bind_addr = config.bind_addr();
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(storage_data.clone())
            .configure(|cfg| handlers::configure_extractors(cfg, max_upload_bytes))
            .service(web::scope("/api").configure(handlers::init_routes))
            .service(Files::new(MEDIA_ROUTE, media_dir.clone()))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
