use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use rusoto_core::Region;

use crate::config::Settings;
use crate::Cli;

const ENV_VARS: [&str; 3] = ["DATAPIPELINE_LOGDIR", "AWS_PROFILE", "AWS_REGION"];

fn parse(args: &[&str]) -> Result<Settings, clap::Error> {
    let argv = std::iter::once("dplogs").chain(args.iter().copied());
    Cli::try_parse_from(argv).map(Settings::from)
}

// Every case that reads the environment lives in this one test, since the
// variables are shared by all tests in the process.
#[test]
fn test_flags_override_environment() {
    for var in ENV_VARS {
        env::remove_var(var);
    }

    let err = parse(&["etl-daily"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

    let bare = parse(&["etl-daily", "--logdir", "s3://flag-bucket/logs"]).unwrap();
    assert_eq!(bare.log_dir, "s3://flag-bucket/logs");
    assert_eq!(bare.profile, None);
    assert_eq!(bare.region, None);

    env::set_var("DATAPIPELINE_LOGDIR", "s3://env-bucket/logs");
    env::set_var("AWS_PROFILE", "env-profile");
    env::set_var("AWS_REGION", "us-west-2");

    let from_env = parse(&["etl-daily"]).unwrap();
    assert_eq!(from_env.log_dir, "s3://env-bucket/logs");
    assert_eq!(from_env.profile.as_deref(), Some("env-profile"));
    assert_eq!(from_env.region, Some(Region::UsWest2));

    let flags = parse(&[
        "etl-daily",
        "--logdir",
        "s3://flag-bucket/logs",
        "--profile",
        "flag-profile",
        "--region",
        "eu-west-1",
    ])
    .unwrap();
    assert_eq!(flags.log_dir, "s3://flag-bucket/logs");
    assert_eq!(flags.profile.as_deref(), Some("flag-profile"));
    assert_eq!(flags.region, Some(Region::EuWest1));

    for var in ENV_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_date_and_dest() {
    let settings = parse(&[
        "etl-daily",
        "--logdir",
        "s3://bucket",
        "--date",
        "2024-01-01",
        "--dest",
        "out",
    ])
    .unwrap();

    assert_eq!(settings.date, NaiveDate::from_ymd_opt(2024, 1, 1));
    assert_eq!(settings.dest, PathBuf::from("out"));

    let request = settings.fetch_request();
    assert_eq!(request.name, "etl-daily");
    assert_eq!(request.dest_dir, PathBuf::from("out"));
}

#[test]
fn test_dest_defaults_to_current_dir() {
    let settings = parse(&["etl-daily", "--logdir", "s3://bucket"]).unwrap();
    assert_eq!(settings.dest, PathBuf::from("."));
    assert_eq!(settings.date, None);
}

#[test]
fn test_rejects_malformed_values() {
    let bad_date = parse(&["etl-daily", "--logdir", "s3://b", "--date", "01/03/2024"]);
    assert_eq!(
        bad_date.unwrap_err().kind(),
        clap::error::ErrorKind::ValueValidation
    );

    let bad_region = parse(&["etl-daily", "--logdir", "s3://b", "--region", "mars-north-1"]);
    assert_eq!(
        bad_region.unwrap_err().kind(),
        clap::error::ErrorKind::ValueValidation
    );
}

#[test]
fn test_fetch_config_parses_log_dir() -> anyhow::Result<()> {
    let settings = parse(&[
        "etl-daily",
        "--logdir",
        "s3://bucket/logs/",
        "--region",
        "eu-west-1",
    ])?;

    let config = settings.fetch_config()?;
    assert_eq!(config.log_dir.bucket, "bucket");
    assert_eq!(config.log_dir.prefix, "logs");
    assert_eq!(config.region, Region::EuWest1);
    Ok(())
}
