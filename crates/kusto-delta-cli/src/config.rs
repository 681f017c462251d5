use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// A job configuration file: several named jobs, executed in name order.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobsConfig {
    pub jobs: BTreeMap<String, Job>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    pub current: Source,
    pub target: Source,
    #[serde(default)]
    pub action: Action,
}

/// Where a schema comes from: one or more script files or folders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Source {
    pub scripts: Vec<PathBuf>,
}

/// What to do with the computed delta.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Action {
    /// Write the delta as one script file.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Write the delta as a folder of per-command scripts.
    #[serde(default)]
    pub folder_path: Option<PathBuf>,

    /// Print the delta to standard output.
    #[serde(default)]
    pub push_to_console: bool,

    /// Emit database-scoped commands in current-database syntax.
    #[serde(default)]
    pub current_database: Option<String>,
}

impl JobsConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file `{}`", path.display()))?;
        let config: JobsConfig = toml::from_str(&contents)
            .with_context(|| format!("cannot parse config file `{}`", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs.is_empty() {
            bail!("config declares no jobs");
        }
        for (name, job) in &self.jobs {
            if job.current.scripts.is_empty() || job.target.scripts.is_empty() {
                bail!("job `{name}` needs at least one current and one target script");
            }
        }
        Ok(())
    }
}
