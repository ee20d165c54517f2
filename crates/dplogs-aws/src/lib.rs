mod client;
mod downloader;
mod error;
mod location;
mod registry;
mod resolver;
mod store;
mod utils;


pub use client::{create_datapipeline_client, create_s3_client};
pub use downloader::{FetchConfig, FetchReport, FetchRequest, LogFetcher};
pub use error::{Error, Result};
pub use location::{base_name, parent_dir, LogLocation};
pub use registry::{
    find_pipeline, list_all_pipelines, DataPipelineRegistry, PipelineDescription, PipelineId,
    PipelinePage, PipelineRegistry, PipelineSummary,
};
pub use resolver::{find_log_dir, parse_target_date, select_entry, DATE_FORMAT};
pub use store::{LogStore, RemoteFileEntry, S3LogStore};
