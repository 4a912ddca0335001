use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;

use urlaubsverwaltung::database::init_database;
use urlaubsverwaltung::i18n::BundleMessageSource;
use urlaubsverwaltung::middleware::RequestIdMiddleware;
use urlaubsverwaltung::services::LoggingNotifier;
use urlaubsverwaltung::{routes, AppState, Config, Repositories, SystemClock};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Urlaubsverwaltung API v1.0")
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {}, locale: {})",
        config.environment,
        config.locale
    );

    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    let messages = Arc::new(BundleMessageSource::for_locale(&config.locale)?);
    let app_state = web::Data::new(AppState::new(
        Repositories::postgres(pool),
        &config,
        Arc::new(SystemClock),
        messages,
        Arc::new(LoggingNotifier),
    ));
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .app_data(app_state.clone())
            .wrap(
                Cors::default()
                    .allowed_origin("http://localhost:3000")
                    .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .expose_headers(vec!["Content-Disposition", "X-Correlation-ID"])
                    .max_age(3600),
            )
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
