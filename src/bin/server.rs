//! The REST API server for centime.

use std::{env, fs::OpenOptions, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use centime::{build_router, graceful_shutdown, stores::create_app_state, timezone_is_valid};

/// The REST API server for centime.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// The canonical timezone used for dashboard day boundaries.
    #[arg(long, default_value = "Asia/Jakarta")]
    timezone: String,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    if !timezone_is_valid(&args.timezone) {
        tracing::error!("'{}' is not a canonical timezone name.", args.timezone);
        std::process::exit(1);
    }

    let secret =
        env::var("JWT_SECRET").expect("The environment variable 'JWT_SECRET' must be set");

    let connection = Connection::open(&args.db_path).expect("Could not open the database file.");
    let state = create_app_state(connection, &secret, &args.timezone)
        .expect("Could not initialize the database.");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
