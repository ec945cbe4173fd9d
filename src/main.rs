//! Image Gateway - on-demand image resizing in front of S3.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_gateway::{
    config::Config,
    create_s3_client,
    resolve::ResolutionEngine,
    server::{create_router, RouterConfig},
    storage::S3ObjectStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let keys = config.key_scheme();
    let resizer = config.resizer();

    info!("Image Gateway v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  S3 bucket: {}", config.s3_bucket);
    if let Some(ref endpoint) = config.s3_endpoint {
        info!("  S3 endpoint: {}", endpoint);
    }
    info!("  S3 region: {}", config.s3_region);
    info!("  Original folder: {}", keys.original_folder());
    info!("  Resized folder: {}", keys.resized_folder());
    info!(
        "  Resize: filter={}, jpeg_quality={}, max_output_pixels={}",
        resizer.filter(),
        resizer.jpeg_quality(),
        resizer.max_output_pixels()
    );

    let s3_client = create_s3_client(config.s3_endpoint.as_deref(), &config.s3_region).await;

    info!("Connecting to S3...");
    if let Err(e) = test_s3_connection(&s3_client, &config.s3_bucket).await {
        error!("  Failed to connect to S3: {}", e);
        error!("  Please check:");
        error!("    - Your AWS credentials are configured correctly");
        error!(
            "    - The bucket '{}' exists and is accessible",
            config.s3_bucket
        );
        error!("    - The S3 endpoint is correct (if using MinIO/custom S3)");
        return ExitCode::FAILURE;
    }
    info!("  Connected successfully");

    let mut store = S3ObjectStore::new(s3_client, &config.s3_bucket, &config.s3_region);
    if let Some(ref endpoint) = config.s3_endpoint {
        store = store.with_endpoint_url(endpoint);
    }
    if let Some(ref base_url) = config.public_base_url {
        store = store.with_public_base_url(base_url);
    }

    let engine = ResolutionEngine::new(store, resizer, keys);
    let router = create_router(engine, build_router_config(&config));

    let addr = config.bind_address();

    info!("Server listening on: http://{}", addr);
    info!("  curl http://{}/health", addr);
    info!("  curl -i http://{}/<name>.jpeg?w=600", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Check that the bucket is reachable with the configured credentials.
async fn test_s3_connection(client: &aws_sdk_s3::Client, bucket: &str) -> Result<(), String> {
    client
        .head_bucket()
        .bucket(bucket)
        .send()
        .await
        .map_err(|e| format!("{}", aws_sdk_s3::error::DisplayErrorContext(&e)))?;

    Ok(())
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_gateway=debug,tower_http=debug"
    } else {
        "image_gateway=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new();

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}
