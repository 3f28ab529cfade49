use clap::Parser;
use tokio::net::TcpListener;

mod app_context;
mod cli;
mod health;
mod http;
mod logging;
mod resize;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    logging::init(&args);
    let app_context = app_context::init(&args);
    tracing::info!(
        max_upload_bytes = app_context.resize.max_upload_bytes,
        max_output_dimension = app_context.resize.max_output_dimension,
        jpeg_quality = app_context.resize.jpeg_quality,
        "Initialized resize configuration."
    );
    let router = http::router::new(&args, app_context);

    let listener = TcpListener::bind(args.listen_address)
        .await
        .unwrap_or_else(|err| panic!("Failed to bind to {}: {}", args.listen_address, err));
    tracing::info!("Listening on {}.", args.listen_address);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("The HTTP server stopped unexpectedly.");
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for the shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down.");
}
