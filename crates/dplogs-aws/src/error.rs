use chrono::NaiveDate;
use rusoto_core::request::TlsError;
use rusoto_core::RusotoError;
use rusoto_credential::CredentialsError;
use rusoto_datapipeline::{DescribePipelinesError, ListPipelinesError};
use rusoto_s3::{GetObjectError, ListObjectsV2Error};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No pipeline in the registry carries the requested name.
    #[error("no such pipeline: {name}")]
    PipelineNotFound {
        name: String,
        /// Every pipeline name the registry returned, in listing order.
        available: Vec<String>,
    },

    /// The registry had no description for an id it had just listed.
    #[error("no description returned for pipeline id {id}")]
    DescriptionMissing { id: String },

    #[error("pipeline listing reported more results after {fetched} pipelines but gave no marker")]
    MissingMarker { fetched: usize },

    /// Nothing under the search prefix could be selected.
    #[error("no logs found under {prefix}{}", .date.map(|d| format!(" for {}", d)).unwrap_or_default())]
    NoLogsFound {
        prefix: String,
        date: Option<NaiveDate>,
    },

    #[error("invalid date {value:?}, expected YYYY-MM-DD")]
    DateParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid log location {0:?}")]
    InvalidLogDir(String),

    #[error("invalid LastModified {value:?} on {key}")]
    InvalidTimestamp {
        key: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    #[error("http client error: {0}")]
    HttpClient(#[from] TlsError),

    #[error("list pipelines failed: {0}")]
    ListPipelines(#[from] RusotoError<ListPipelinesError>),

    #[error("describe pipelines failed: {0}")]
    DescribePipelines(#[from] RusotoError<DescribePipelinesError>),

    #[error("list objects failed: {0}")]
    ListObjects(#[from] RusotoError<ListObjectsV2Error>),

    #[error("get object failed: {0}")]
    GetObject(#[from] RusotoError<GetObjectError>),

    #[error("empty response body for {0}")]
    MissingBody(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
