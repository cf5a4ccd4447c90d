use clap::Parser;
use s3_ingest::cli_service::{Cli, CliService, Command};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive("s3_ingest=info".parse().unwrap())
            .add_directive("aws_sdk=warn".parse().unwrap())
            .add_directive("mongodb=warn".parse().unwrap()))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Ingest(args) => {
            info!("Starting ingestion");
            debug!("Arguments: source_table={}, dest_table={}, concurrency={}",
                args.source_table, args.dest_table, args.concurrency);

            let service = CliService::new(args).await?;
            service.run().await
        }
    }
}
