//! Settings resolved from flags and environment, once, before any AWS call.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use dplogs_aws::{FetchConfig, FetchRequest, LogLocation};
use rusoto_core::Region;

#[derive(Debug, Clone)]
pub struct Settings {
    pub name: String,
    pub log_dir: String,
    pub profile: Option<String>,
    pub region: Option<Region>,
    pub date: Option<NaiveDate>,
    pub dest: PathBuf,
}

impl Settings {
    pub fn fetch_config(&self) -> Result<FetchConfig> {
        Ok(FetchConfig {
            log_dir: LogLocation::parse(&self.log_dir)?,
            profile: self.profile.clone(),
            region: self.region.clone().unwrap_or_default(),
        })
    }

    pub fn fetch_request(&self) -> FetchRequest {
        FetchRequest {
            name: self.name.clone(),
            date: self.date,
            dest_dir: self.dest.clone(),
        }
    }
}
