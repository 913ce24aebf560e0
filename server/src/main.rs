use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use auth_core::TokenCodec;
use ripple_server::handlers;
use ripple_server::openapi::ApiDoc;
use ripple_server::services::ImageStore;
use ripple_server::Config;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn health_summary(pool: web::Data<sqlx::PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(&**pool).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "ripple-server",
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "ripple-server",
        })),
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting ripple-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    // Verify database connection
    sqlx::query("SELECT 1")
        .execute(&db_pool)
        .await
        .context("Failed to verify database connection")?;
    tracing::info!("Database pool created and verified");

    // Run database migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations completed");

    // Process-wide immutable state, injected into handlers as app data
    let codec = web::Data::new(TokenCodec::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_days,
    ));

    let image_store = match &config.storage {
        Some(storage_config) => {
            let store = ImageStore::from_config(storage_config).await;
            tracing::info!("Image store initialized for bucket {}", storage_config.bucket);
            Some(web::Data::new(store))
        }
        None => {
            tracing::warn!("STORAGE_BUCKET not configured; image uploads are disabled");
            None
        }
    };

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let openapi_doc = ApiDoc::openapi();

        let mut app = App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(codec.clone());

        if let Some(store) = &image_store {
            app = app.app_data(store.clone());
        }

        app.wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api/openapi.json", openapi_doc))
            .route("/health", web::get().to(health_summary))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::register))
                    .route("/login", web::post().to(handlers::login))
                    .route("/me", web::get().to(handlers::me)),
            )
            .service(
                web::scope("/posts")
                    .service(
                        web::resource("")
                            .route(web::get().to(handlers::list_posts))
                            .route(web::post().to(handlers::create_post)),
                    )
                    .service(
                        web::resource("/{post_id}")
                            .route(web::get().to(handlers::get_post))
                            .route(web::put().to(handlers::update_post))
                            .route(web::delete().to(handlers::delete_post)),
                    )
                    .route(
                        "/{post_id}/comments",
                        web::get().to(handlers::get_post_comments),
                    ),
            )
            .service(
                web::scope("/comments")
                    .service(web::resource("").route(web::post().to(handlers::add_comment)))
                    .service(
                        web::resource("/{comment_id}")
                            .route(web::delete().to(handlers::delete_comment)),
                    ),
            )
            .service(
                web::scope("/likes")
                    .service(web::resource("").route(web::post().to(handlers::toggle_like))),
            )
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {bind_address}"))?
    .run()
    .await
    .context("HTTP server error")
}
