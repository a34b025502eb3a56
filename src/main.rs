use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use serde_json::json;

use greenroom::handlers;
use greenroom::store::{NotificationStore, PgNotificationStore};
use greenroom::{Config, ConnectionRegistry, Notifier};

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({"status": "ok", "service": "greenroom"}))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    greenroom::logging::init_tracing();

    let config = Config::from_env()?;
    tracing::info!("starting greenroom backend ({})", config.app.env);

    let pool = greenroom::db::connect(&config.database).await?;
    greenroom::db::run_migrations(&pool).await?;

    // One registry and one dispatcher for the whole process, handed to every
    // handler by reference through app data.
    let registry = ConnectionRegistry::new();
    let store: Arc<dyn NotificationStore> = Arc::new(PgNotificationStore::new(pool.clone()));
    let notifier = Notifier::new(store.clone(), registry.clone());

    let addr = ("0.0.0.0", config.app.port);
    tracing::info!("listening on {}:{}", addr.0, addr.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(registry.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(notifier.clone()))
            .wrap(middleware::Logger::default())
            .wrap(Cors::permissive())
            .route("/health", web::get().to(health))
            .service(web::scope("/api/v1").configure(handlers::configure))
            .configure(handlers::realtime::register_routes)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
