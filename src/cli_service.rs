use std::sync::Arc;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};

use crate::{
    application::ingestion_service::{IngestionRequest, IngestionService},
    domain::{
        destination::{DestinationKind, DestinationTable, DestinationUri},
        error::IngestionError,
        ports::{DataRepository, RunLogRepository},
        source_uri::SourceUri,
        table_ref::TableReference,
    },
    infrastructure::{
        couchdb::data_repo::CouchDataRepository,
        dynamodb::data_repo::DynamoDataRepository,
        mongodb::{data_repo::MongoDataRepository, log_repo::MongoRunLogRepository},
        parser_adapter::ParserAdapter,
        s3_adapter::S3Adapter,
        tracing_log::TracingRunLogRepository,
    },
};

#[derive(Parser, Debug)]
#[command(name = "s3-ingest")]
#[command(about = "Copy files from an S3-compatible bucket into a database table", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a single ingestion from a bucket glob into a destination table
    Ingest(IngestArgs),
}

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    /// Source connection: s3://?access_key_id=<id>&secret_access_key=<key>
    #[arg(long, env = "SOURCE_URI")]
    pub source_uri: String,

    /// Source table: <bucket_name>/<file_glob>
    #[arg(long)]
    pub source_table: String,

    /// Destination connection, selected by scheme (mongodb, dynamodb, couchdb)
    #[arg(long, env = "DEST_URI")]
    pub dest_uri: String,

    /// Destination table: <namespace>.<table> or <table>
    #[arg(long)]
    pub dest_table: String,

    /// Number of objects to process at once
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,
}

pub struct CliService {
    service: IngestionService,
    request: IngestionRequest,
}

impl CliService {
    pub async fn new(args: IngestArgs) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        debug!("Initializing CLI service");

        let source = SourceUri::parse(&args.source_uri)?;
        info!("Source access key: {}", source.redacted_access_key());

        let table = TableReference::parse(&args.source_table)?;
        info!("Source table - bucket: {}, pattern: {}", table.bucket, table.pattern);

        let destination = DestinationUri::parse(&args.dest_uri)?;
        let dest_table = DestinationTable::parse(&args.dest_table)?;
        info!("Destination: {:?} table '{}'", destination.kind, dest_table.name);

        let object_store = Arc::new(S3Adapter::from_source(&source).await);
        let parser = Arc::new(ParserAdapter::new());
        debug!("S3 adapter and parser initialized");

        let (data_repo, run_log) = Self::build_destination(&destination, &dest_table).await?;

        let service = IngestionService::new(object_store, parser, data_repo, run_log);
        let request = IngestionRequest {
            table,
            target_table: dest_table.name.clone(),
            concurrency: args.concurrency,
        };

        debug!("CLI service initialization complete");
        Ok(Self { service, request })
    }

    async fn build_destination(
        destination: &DestinationUri,
        dest_table: &DestinationTable,
    ) -> Result<(Arc<dyn DataRepository>, Arc<dyn RunLogRepository>), Box<dyn std::error::Error + Send + Sync>> {
        match destination.kind {
            DestinationKind::MongoDb => {
                debug!("Connecting to MongoDB");
                let client = mongodb::Client::with_uri_str(&destination.raw).await
                    .map_err(|e| IngestionError::Database(e.to_string()))?;

                let database = dest_table
                    .namespace
                    .clone()
                    .or_else(|| destination.database())
                    .unwrap_or_else(|| "ingest".to_string());
                info!("MongoDB database: {}", database);

                let data_repo = Arc::new(MongoDataRepository::new(client.clone(), database.clone()));
                let run_log = Arc::new(MongoRunLogRepository::new(&client, &database));
                Ok((data_repo, run_log))
            }
            DestinationKind::DynamoDb => {
                debug!("Initializing DynamoDB client");
                if dest_table.namespace.is_some() {
                    warn!("DynamoDB destinations ignore the table namespace");
                }

                let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
                let region = destination.url.query_pairs()
                    .find(|(name, _)| name == "region")
                    .map(|(_, value)| value.to_string());
                if let Some(region) = region {
                    info!("DynamoDB region: {}", region);
                    config_loader = config_loader.region(aws_sdk_dynamodb::config::Region::new(region));
                }
                let aws_config = config_loader.load().await;
                let client = aws_sdk_dynamodb::Client::new(&aws_config);

                let data_repo = Arc::new(DynamoDataRepository::new(client));
                let run_log = Arc::new(TracingRunLogRepository);
                Ok((data_repo, run_log))
            }
            DestinationKind::CouchDb => {
                if dest_table.namespace.is_some() {
                    warn!("CouchDB destinations ignore the table namespace");
                }

                let scheme = if destination.url.scheme() == "couchdbs" { "https" } else { "http" };
                let host = destination.url.host_str()
                    .ok_or_else(|| IngestionError::InvalidDestination("couchdb URI is missing a host".to_string()))?;
                let base_url = match destination.url.port() {
                    Some(port) => format!("{}://{}:{}", scheme, host, port),
                    None => format!("{}://{}:5984", scheme, host),
                };
                info!("CouchDB endpoint: {}", base_url);

                let username = match destination.url.username() {
                    "" => None,
                    name => Some(name.to_string()),
                };
                let password = destination.url.password().map(str::to_string);

                let data_repo = Arc::new(CouchDataRepository::new(base_url, username, password));
                let run_log = Arc::new(TracingRunLogRepository);
                Ok((data_repo, run_log))
            }
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let run = self.service.ingest(self.request).await?;

        info!("Run {} status: {:?}", run.run_id, run.status);
        info!(
            "Objects: {} matched, {} ingested, {} failed; documents written: {}",
            run.objects_matched, run.objects_ingested, run.objects_failed, run.documents_written
        );

        if run.objects_failed > 0 {
            return Err(Box::new(IngestionError::PartialFailure {
                failed: run.objects_failed,
                total: run.objects_matched,
            }));
        }
        Ok(())
    }
}
