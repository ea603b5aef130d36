//! Configuration for shipway
//! Searched in order: shipway.toml, .shipway.toml
//!
//! Every key has a default, so a project with the stock layout needs no
//! config file at all. The `[tools]` table exists so wrapped or stubbed
//! executables can stand in for the real ones (CI images, integration tests).

use crate::core::error::{ConfigError, ShipResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_CANDIDATES: &[&str] = &["shipway.toml", ".shipway.toml"];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShipConfig {
  #[serde(default)]
  pub remote: RemoteConfig,
  #[serde(default)]
  pub build: BuildConfig,
  #[serde(default)]
  pub tools: ToolsConfig,
  #[serde(default)]
  pub layout: LayoutConfig,
}

/// Publish destination defaults; both keys are overridable from the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
  #[serde(default = "default_server")]
  pub server: String,
  #[serde(default = "default_remote_path")]
  pub path: String,
}

fn default_server() -> String {
  "releases@dist.shipway.dev".to_string()
}

fn default_remote_path() -> String {
  "/srv/releases".to_string()
}

impl Default for RemoteConfig {
  fn default() -> Self {
    Self {
      server: default_server(),
      path: default_remote_path(),
    }
  }
}

/// External build-tool invocations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Build tool executable
  #[serde(default = "default_build_command")]
  pub command: String,

  /// Task that produces the release artifacts
  #[serde(default = "default_build_task")]
  pub build_task: String,

  /// Extra options enabled only for real-run builds (publish-to-central)
  #[serde(default = "default_publish_options")]
  pub publish_options: Vec<String>,

  /// Advisory binary-compatibility task
  #[serde(default = "default_compat_task")]
  pub compat_task: String,

  /// Artifact-upload task run during the publish stage
  #[serde(default = "default_upload_task")]
  pub upload_task: String,

  /// JDK major version that must be active
  #[serde(default = "default_required_java")]
  pub required_java: u32,
}

fn default_build_command() -> String {
  "sbt".to_string()
}

fn default_build_task() -> String {
  "dist".to_string()
}

fn default_publish_options() -> Vec<String> {
  vec!["-Dpublish.central=true".to_string()]
}

fn default_compat_task() -> String {
  "mimaReportBinaryIssues".to_string()
}

fn default_upload_task() -> String {
  "uploadArchives".to_string()
}

fn default_required_java() -> u32 {
  17
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      command: default_build_command(),
      build_task: default_build_task(),
      publish_options: default_publish_options(),
      compat_task: default_compat_task(),
      upload_task: default_upload_task(),
      required_java: default_required_java(),
    }
  }
}

/// Names of the external executables the pipeline drives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
  #[serde(default = "default_git")]
  pub git: String,
  #[serde(default = "default_java")]
  pub java: String,
  #[serde(default = "default_remote_copy")]
  pub remote_copy: String,
  #[serde(default = "default_remote_shell")]
  pub remote_shell: String,
}

fn default_git() -> String {
  "git".to_string()
}

fn default_java() -> String {
  "java".to_string()
}

fn default_remote_copy() -> String {
  "rsync".to_string()
}

fn default_remote_shell() -> String {
  "ssh".to_string()
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      git: default_git(),
      java: default_java(),
      remote_copy: default_remote_copy(),
      remote_shell: default_remote_shell(),
    }
  }
}

/// Local artifact layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
  /// Local release-output directory, synchronized verbatim
  #[serde(default = "default_artifact_dir")]
  pub artifact_dir: String,

  /// Subdirectory on the remote side that must never be overwritten
  #[serde(default = "default_downloads_dir")]
  pub downloads_dir: String,
}

fn default_artifact_dir() -> String {
  "target/dist".to_string()
}

fn default_downloads_dir() -> String {
  "downloads".to_string()
}

impl Default for LayoutConfig {
  fn default() -> Self {
    Self {
      artifact_dir: default_artifact_dir(),
      downloads_dir: default_downloads_dir(),
    }
  }
}

impl ShipConfig {
  /// Load config from the working copy root, falling back to defaults when
  /// no candidate file exists
  pub fn load(root: &Path) -> ShipResult<Self> {
    for candidate in CONFIG_CANDIDATES {
      let path = root.join(candidate);
      if !path.exists() {
        continue;
      }

      let content = fs::read_to_string(&path).map_err(|e| ConfigError::Unreadable {
        path: path.display().to_string(),
        detail: e.to_string(),
      })?;

      let config: ShipConfig =
        toml_edit::de::from_str(&content).map_err(|e| ConfigError::Invalid {
          path: path.display().to_string(),
          detail: e.to_string(),
        })?;

      return Ok(config);
    }

    Ok(ShipConfig::default())
  }
}
