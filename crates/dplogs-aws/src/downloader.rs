use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use rusoto_core::Region;
use tracing::{debug, info, info_span, Instrument};

use crate::client::{create_datapipeline_client, create_s3_client};
use crate::error::Result;
use crate::location::{base_name, LogLocation};
use crate::registry::{
    find_pipeline, list_all_pipelines, DataPipelineRegistry, PipelineId, PipelineRegistry,
};
use crate::resolver::find_log_dir;
use crate::store::{LogStore, S3LogStore};

/// Where and as whom to talk to AWS.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub log_dir: LogLocation,
    pub profile: Option<String>,
    pub region: Region,
}

/// One log fetch: which pipeline, which day, and where to put the files.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub name: String,
    pub date: Option<NaiveDate>,
    pub dest_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FetchReport {
    pub pipeline_id: PipelineId,
    /// Full key of the selected log directory.
    pub log_dir: String,
    pub downloaded: Vec<PathBuf>,
}

pub struct LogFetcher<R, S> {
    registry: R,
    store: S,
    location: LogLocation,
}

impl LogFetcher<DataPipelineRegistry, S3LogStore> {
    pub fn new_with_config(config: &FetchConfig) -> Result<Self> {
        let profile = config.profile.as_deref();
        let pipelines = create_datapipeline_client(profile, config.region.clone())?;
        let s3 = create_s3_client(profile, config.region.clone())?;

        Ok(Self::with_clients(
            DataPipelineRegistry::new(pipelines),
            S3LogStore::new(s3, config.log_dir.bucket.clone()),
            config.log_dir.clone(),
        ))
    }
}

impl<R, S> LogFetcher<R, S>
where
    R: PipelineRegistry,
    S: LogStore,
{
    pub fn with_clients(registry: R, store: S, location: LogLocation) -> Self {
        Self {
            registry,
            store,
            location,
        }
    }

    pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchReport> {
        let span = info_span!("fetch_logs", pipeline = %request.name);
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &FetchRequest) -> Result<FetchReport> {
        let pipelines = list_all_pipelines(&self.registry).await?;
        let pipeline_id = find_pipeline(&pipelines, &request.name)?;
        info!("Found pipeline with id {}", pipeline_id);

        let description = self.registry.describe_pipeline(&pipeline_id).await?;
        debug!(
            state = ?description.state,
            health = ?description.health,
            "described pipeline"
        );

        let prefix = self.location.pipeline_prefix(pipeline_id.as_str());
        let log_dir = find_log_dir(&self.store, &prefix, request.date).await?;
        info!("Newest dir is {}", base_name(&log_dir));

        if !request.dest_dir.exists() {
            fs::create_dir_all(&request.dest_dir)?;
        }

        let mut downloaded = Vec::new();
        for entry in self.store.list_detailed(&log_dir).await? {
            let filename = base_name(&entry.key);
            let dest = request.dest_dir.join(filename);
            let size = self.store.download(&entry.key, &dest).await?;
            info!(bytes = size, "Downloaded file {}", filename);
            downloaded.push(dest);
        }

        Ok(FetchReport {
            pipeline_id,
            log_dir,
            downloaded,
        })
    }
}
