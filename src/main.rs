use actix_web::{web, App, HttpServer};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

mod api;
mod config;
mod db;
mod schema;
mod shutdown;

use crate::api::job::handlers::job_config;
use crate::api::job::JobService;
use crate::api::job_type::handlers::job_type_config;
use crate::api::job_type::JobTypeService;
use crate::api::{error, health::health_config};
use crate::shutdown::ShutdownCoordinator;

/// Command-line overrides for the environment configuration
#[derive(Parser, Debug)]
#[command(name = "job-registry", about = "Schema-driven job tracking registry")]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long)]
    bind: Option<String>,

    /// Port to bind the HTTP server to
    #[arg(long)]
    port: Option<u16>,

    /// PostgreSQL connection string (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let mut config = config::Config::from_env().expect("Failed to load configuration");
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }

    std::fs::create_dir_all(&config.log_dir).expect("Failed to create logs directory");

    // File-based logging with daily rotation and level separation;
    // files land as logs/info.<date>.log, logs/error.<date>.log, etc.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(&config.log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(&config.log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(&config.log_dir, "error.log");
    let debug_file = tracing_appender::rolling::daily(&config.log_dir, "debug.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();

    info!("Starting job-registry application");
    info!("Configuration loaded:");
    info!("  - Bind address: {}:{}", config.bind_addr, config.port);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - Verbose errors: {}", config.verbose_errors);

    error::set_verbose_errors(config.verbose_errors);

    let pool = db::connection::get_connection(&config.database_url, config.max_db_connections)
        .await
        .expect("Failed to connect to database");

    info!("Database connection pool established");

    // Auto-migrate on startup
    db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Clone pool for the HTTP server (original is used for shutdown)
    let server_pool = pool.clone();

    let server = HttpServer::new(move || {
        let type_service = web::Data::new(JobTypeService::new(server_pool.clone()));
        let job_service = web::Data::new(JobService::new(server_pool.clone()));

        App::new()
            .app_data(web::Data::new(server_pool.clone())) // Share DB pool across workers
            .app_data(type_service)
            .app_data(job_service)
            .configure(health_config)
            .service(
                web::scope("/api/v1")
                    .configure(job_type_config)
                    .configure(job_config),
            )
    });

    info!("Server starting on http://{}:{}", config.bind_addr, config.port);

    let server = server.bind((config.bind_addr.as_str(), config.port))?.run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, pool);
    coordinator.wait_for_shutdown().await
}
