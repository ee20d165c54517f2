use rusoto_core::{HttpClient, Region};
use rusoto_credential::{ChainProvider, ProfileProvider};
use rusoto_datapipeline::DataPipelineClient;
use rusoto_s3::S3Client;

use crate::error::Result;

fn credentials_provider(profile: Option<&str>) -> Result<ChainProvider> {
    let mut provider = ProfileProvider::new()?;
    if let Some(profile) = profile {
        provider.set_profile(profile);
    }
    Ok(ChainProvider::with_profile_provider(provider))
}

pub fn create_s3_client(profile: Option<&str>, region: Region) -> Result<S3Client> {
    let provider = credentials_provider(profile)?;
    let dispatcher = HttpClient::new()?;

    Ok(S3Client::new_with(dispatcher, provider, region))
}

pub fn create_datapipeline_client(
    profile: Option<&str>,
    region: Region,
) -> Result<DataPipelineClient> {
    let provider = credentials_provider(profile)?;
    let dispatcher = HttpClient::new()?;

    Ok(DataPipelineClient::new_with(dispatcher, provider, region))
}
