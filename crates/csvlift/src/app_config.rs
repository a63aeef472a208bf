//! 🔧 App Configuration — the sacred env-to-struct pipeline.
//!
//! 📡 "Config not found: We looked everywhere. Under the couch. Behind the fridge.
//! In the junk drawer. Nothing." — every developer at 3am 🦆
//!
//! 🏗️ Powered by Figment, because manually parsing env vars is a form of
//! self-harm that even the borrow checker wouldn't approve of.
//!
//! 🧠 Knowledge graph:
//! - Layer 1: serde defaults (region, bucket, key).
//! - Layer 2: the environment, restricted to the variables we actually read.
//!   Values go in verbatim: figment's `Env` would happily turn `S3_BUCKET=2025`
//!   into a number and `S3_KEY=007` into `7`, so we take its raw strings instead.
//! - Layer 3: an optional TOML file (same keys, lowercase). TOML wins on conflicts.
//! - Credentials are NOT validated here. A missing key is the uploader's business,
//!   so it surfaces as `CredentialsMissing` and not as a parse error.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::Deserialize;
use tracing::info;

use crate::backends::S3Connector;
use crate::credentials::Credentials;
use crate::destination::{DEFAULT_REGION, Destination};

/// 📋 The environment variables this job reads. Nothing else gets in.
pub const ENV_VARS: [&str; 7] = [
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "AWS_SESSION_TOKEN",
    "AWS_REGION",
    "S3_BUCKET",
    "S3_KEY",
    "S3_ENDPOINT_URL",
];

pub const DEFAULT_BUCKET: &str = "zeb-ds-poc-s3";
pub const DEFAULT_KEY: &str = "gunaranjan_poc/git-test/sample_data.csv";

/// 📦 Everything the job needs to know, read once at process entry.
#[derive(Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub aws_access_key_id: Option<String>,
    #[serde(default)]
    pub aws_secret_access_key: Option<String>,
    #[serde(default)]
    pub aws_session_token: Option<String>,
    #[serde(default = "default_region")]
    pub aws_region: String,
    #[serde(default = "default_bucket")]
    pub s3_bucket: String,
    #[serde(default = "default_key")]
    pub s3_key: String,
    /// 🌐 S3-compatible endpoint override (MinIO, LocalStack...). Absent means AWS.
    #[serde(default)]
    pub s3_endpoint_url: Option<String>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

// 🐛 Debug by hand: secrets stay secret even when someone `{:#?}`s the whole config.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("credentials", &self.credentials())
            .field("aws_region", &self.aws_region)
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_key", &self.s3_key)
            .field("s3_endpoint_url", &self.s3_endpoint_url)
            .finish()
    }
}

impl AppConfig {
    /// 🧪 Extract from any figment. `load_config` feeds it env + file; tests feed it strings.
    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        figment
            .extract()
            .context("💀 Failed to parse configuration. One of the values is the wrong shape.")
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::from_parts(
            self.aws_access_key_id.clone(),
            self.aws_secret_access_key.clone(),
            self.aws_session_token.clone(),
        )
    }

    pub fn destination(&self) -> Destination {
        Destination::new(self.s3_bucket.clone(), self.s3_key.clone())
            .with_region(self.aws_region.clone())
    }

    pub fn connector(&self) -> S3Connector {
        S3Connector::new(self.s3_endpoint_url.clone())
    }
}

/// 🌍 The environment layer: only `ENV_VARS`, keys lowercased, values kept as strings.
pub fn env_layer() -> Serialized<BTreeMap<String, String>> {
    let vars: BTreeMap<String, String> = Env::raw()
        .only(&ENV_VARS)
        .iter()
        .map(|(key, value)| (key.as_str().to_ascii_lowercase(), value))
        .collect();
    Serialized::defaults(vars)
}

/// 🚀 Load the config — from the environment, optionally topped with a TOML file.
///
/// - `None` → env vars (and defaults) only.
/// - `Some(path)` → env vars + TOML file, merged. TOML wins on conflicts.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    let config = Figment::new().merge(env_layer());
    let config = match config_file_name {
        Some(file_name) => config.merge(Toml::file(file_name)),
        None => config,
    };

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to load configuration from file '{}' and the environment. \
             The file exists in our hearts, but apparently not in valid TOML.",
            path.display()
        ),
        None => "💀 Failed to load configuration from the environment. \
                 No file was provided — this one's all on the environment. Classic."
            .to_string(),
    };

    AppConfig::from_figment(config).context(context_msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;

    fn load_in_jail(config_file: Option<&Path>) -> figment::error::Result<AppConfig> {
        load_config(config_file).map_err(|err| format!("{err:#}").into())
    }

    #[test]
    fn the_one_where_the_environment_does_all_the_talking() {
        Jail::expect_with(|jail| {
            jail.set_env("AWS_ACCESS_KEY_ID", "AKIAFROMENV");
            jail.set_env("AWS_SECRET_ACCESS_KEY", "env-secret");
            jail.set_env("AWS_SESSION_TOKEN", "");
            jail.set_env("AWS_REGION", "eu-west-2");
            jail.set_env("S3_BUCKET", "env-bucket");
            jail.set_env("S3_KEY", "exports/env.csv");
            jail.set_env("S3_ENDPOINT_URL", "");
            jail.set_env("AWS_PROFILE", "prod-admin");

            let app_config = load_in_jail(None)?;
            let credentials = app_config.credentials();
            let resolved = credentials
                .resolve()
                .expect("💀 both keys came from the environment");
            assert_eq!(resolved.access_key_id, "AKIAFROMENV");
            assert_eq!(resolved.secret_access_key, "env-secret");
            assert_eq!(resolved.session_token, None);

            let destination = app_config.destination();
            assert_eq!(destination.bucket, "env-bucket");
            assert_eq!(destination.key, "exports/env.csv");
            assert_eq!(destination.region, "eu-west-2");
            assert!(app_config.connector().endpoint_url.is_none());

            // -- 🚫 AWS_PROFILE is somebody else's problem
            let layer = Figment::from(env_layer());
            assert!(layer.find_value("aws_profile").is_err());
            assert!(layer.find_value("aws_access_key_id").is_ok());
            Ok(())
        });
    }

    #[test]
    fn the_one_where_the_file_outranks_the_environment() {
        Jail::expect_with(|jail| {
            jail.set_env("AWS_ACCESS_KEY_ID", "AKIAFROMENV");
            jail.set_env("AWS_SECRET_ACCESS_KEY", "env-secret");
            jail.set_env("S3_BUCKET", "env-bucket");
            jail.create_file("csvlift.toml", r#"s3_bucket = "file-bucket""#)?;

            let app_config = load_in_jail(Some(Path::new("csvlift.toml")))?;
            assert_eq!(app_config.s3_bucket, "file-bucket");
            assert_eq!(app_config.aws_access_key_id.as_deref(), Some("AKIAFROMENV"));
            Ok(())
        });
    }

    #[test]
    fn the_one_where_numbers_in_the_environment_stay_strings() {
        Jail::expect_with(|jail| {
            jail.set_env("AWS_ACCESS_KEY_ID", "12345");
            jail.set_env("AWS_SECRET_ACCESS_KEY", "true");
            jail.set_env("S3_BUCKET", "2025");
            jail.set_env("S3_KEY", "007");

            let app_config = load_in_jail(None)?;
            assert_eq!(app_config.aws_access_key_id.as_deref(), Some("12345"));
            assert_eq!(app_config.aws_secret_access_key.as_deref(), Some("true"));
            assert_eq!(app_config.s3_bucket, "2025");
            assert_eq!(app_config.s3_key, "007");
            Ok(())
        });
    }

    #[test]
    fn the_one_where_nothing_is_set_and_the_defaults_carry_the_team() {
        let app_config = AppConfig::from_figment(Figment::new())
            .expect("💀 an empty figment should still produce defaults");

        assert_eq!(app_config.aws_region, "us-east-1");
        assert_eq!(app_config.s3_bucket, "zeb-ds-poc-s3");
        assert_eq!(app_config.s3_key, "gunaranjan_poc/git-test/sample_data.csv");
        assert!(app_config.aws_access_key_id.is_none());
        assert!(app_config.s3_endpoint_url.is_none());
        assert_eq!(
            app_config.credentials().missing_fields(),
            vec!["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"]
        );
    }

    #[test]
    fn the_one_where_the_file_brings_its_own_bucket() {
        let mut config_file = tempfile::NamedTempFile::new()
            .expect("💀 Failed to create a temp file. The filesystem said 'new phone who dis'.");
        write!(
            config_file,
            r#"
            aws_access_key_id = "AKIAFROMFILE"
            aws_secret_access_key = "file-secret"
            aws_region = "ap-south-1"
            s3_bucket = "file-bucket"
            s3_key = "reports/2025/q1.csv"
            s3_endpoint_url = "http://localhost:9000"
            "#
        )
        .expect("💀 Failed to write test config.");

        let app_config = load_config(Some(config_file.path()))
            .expect("💀 a well-formed TOML file should load");

        let destination = app_config.destination();
        assert_eq!(destination.bucket, "file-bucket");
        assert_eq!(destination.key, "reports/2025/q1.csv");
        assert_eq!(destination.region, "ap-south-1");
        assert!(app_config.credentials().resolve().is_ok());
        assert_eq!(
            app_config.connector().endpoint_url.as_deref(),
            Some("http://localhost:9000")
        );
    }

    #[test]
    fn the_one_where_an_empty_session_token_is_treated_as_absent() {
        let app_config: AppConfig = toml::from_str(
            r#"
            aws_access_key_id = "AKIA"
            aws_secret_access_key = "shh"
            aws_session_token = ""
            "#,
        )
        .expect("💀 plain TOML should deserialize");
        let credentials = app_config.credentials();
        let resolved = credentials.resolve().expect("💀 both keys are present");
        assert_eq!(resolved.session_token, None);
    }

    #[test]
    fn the_one_where_debug_output_does_not_leak_the_secret() {
        let app_config: AppConfig = serde_json::from_str(
            r#"{ "aws_access_key_id": "AKIA", "aws_secret_access_key": "hunter2" }"#,
        )
        .expect("💀 JSON config fragment should deserialize");
        let debug_output = format!("{app_config:?}");
        assert!(debug_output.contains("AKIA"));
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn the_one_where_a_broken_file_gets_a_readable_error() {
        let mut config_file = tempfile::NamedTempFile::new()
            .expect("💀 Failed to create a temp file.");
        write!(config_file, "s3_bucket = [this is not toml").expect("💀 Failed to write test config.");

        let err = load_config(Some(config_file.path()))
            .expect_err("💀 garbage TOML should not load");
        assert!(format!("{err:#}").contains("Failed to load configuration from file"));
    }
}
