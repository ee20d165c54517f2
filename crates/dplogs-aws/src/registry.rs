use std::fmt;

use async_trait::async_trait;
use rusoto_datapipeline::{
    DataPipeline, DataPipelineClient, DescribePipelinesInput, DescribePipelinesOutput,
    ListPipelinesInput, ListPipelinesOutput,
};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Registry-assigned pipeline identifier, e.g. `df-0123456789ABCDEF`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PipelineId(String);

impl PipelineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    pub id: PipelineId,
    pub name: String,
}

impl PipelineSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PipelineId::new(id),
            name: name.into(),
        }
    }
}

/// One page of `ListPipelines`.
#[derive(Debug, Clone, Default)]
pub struct PipelinePage {
    pub pipelines: Vec<PipelineSummary>,
    pub marker: Option<String>,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineDescription {
    pub id: PipelineId,
    pub name: String,
    pub description: Option<String>,
    /// `@pipelineState` field, e.g. `SCHEDULED`.
    pub state: Option<String>,
    /// `@healthStatus` field, e.g. `HEALTHY`.
    pub health: Option<String>,
}

/// Read access to the Data Pipeline registry.
#[async_trait]
pub trait PipelineRegistry: Send + Sync {
    async fn list_pipelines(&self, marker: Option<String>) -> Result<PipelinePage>;

    async fn describe_pipeline(&self, id: &PipelineId) -> Result<PipelineDescription>;
}

pub struct DataPipelineRegistry {
    client: DataPipelineClient,
}

impl DataPipelineRegistry {
    pub fn new(client: DataPipelineClient) -> Self {
        Self { client }
    }
}

/// Summaries missing an id or a name are dropped.
pub(crate) fn page_from_output(output: ListPipelinesOutput) -> PipelinePage {
    let pipelines = output
        .pipeline_id_list
        .into_iter()
        .filter_map(|p| match (p.id, p.name) {
            (Some(id), Some(name)) => Some(PipelineSummary::new(id, name)),
            _ => None,
        })
        .collect();

    PipelinePage {
        pipelines,
        marker: output.marker,
        has_more: output.has_more_results.unwrap_or(false),
    }
}

pub(crate) fn description_from_output(
    id: &PipelineId,
    output: DescribePipelinesOutput,
) -> Result<PipelineDescription> {
    let found = output
        .pipeline_description_list
        .into_iter()
        .find(|d| d.pipeline_id == id.as_str())
        .ok_or_else(|| Error::DescriptionMissing { id: id.to_string() })?;

    let field = |key: &str| {
        found
            .fields
            .iter()
            .find(|f| f.key == key)
            .and_then(|f| f.string_value.clone())
    };
    let state = field("@pipelineState");
    let health = field("@healthStatus");

    Ok(PipelineDescription {
        id: PipelineId::new(found.pipeline_id),
        name: found.name,
        description: found.description,
        state,
        health,
    })
}

#[async_trait]
impl PipelineRegistry for DataPipelineRegistry {
    async fn list_pipelines(&self, marker: Option<String>) -> Result<PipelinePage> {
        let output = self
            .client
            .list_pipelines(ListPipelinesInput { marker })
            .await?;

        Ok(page_from_output(output))
    }

    async fn describe_pipeline(&self, id: &PipelineId) -> Result<PipelineDescription> {
        let output = self
            .client
            .describe_pipelines(DescribePipelinesInput {
                pipeline_ids: vec![id.to_string()],
            })
            .await?;

        description_from_output(id, output)
    }
}

/// Collects every pipeline, following the marker until the registry reports
/// no more results.
pub async fn list_all_pipelines<R>(registry: &R) -> Result<Vec<PipelineSummary>>
where
    R: PipelineRegistry + ?Sized,
{
    let mut page = registry.list_pipelines(None).await?;
    let mut pipelines = std::mem::take(&mut page.pipelines);

    while page.has_more {
        let marker = page.marker.take().ok_or(Error::MissingMarker {
            fetched: pipelines.len(),
        })?;
        debug!(%marker, fetched = pipelines.len(), "fetching next pipeline page");
        page = registry.list_pipelines(Some(marker)).await?;
        pipelines.append(&mut page.pipelines);
    }

    Ok(pipelines)
}

/// First pipeline whose name matches `name` exactly.
pub fn find_pipeline(pipelines: &[PipelineSummary], name: &str) -> Result<PipelineId> {
    if let Some(found) = pipelines.iter().find(|p| p.name == name) {
        return Ok(found.id.clone());
    }

    let available: Vec<String> = pipelines.iter().map(|p| p.name.clone()).collect();
    info!("Available pipelines: ");
    info!("{:?}", available);

    Err(Error::PipelineNotFound {
        name: name.to_string(),
        available,
    })
}
