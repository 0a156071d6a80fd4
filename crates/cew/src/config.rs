//! Configuration loading
//!
//! Settings come from a TOML file whose keys mirror the generator's options
//! (`classes`, `outputFolder`, `generatedNamePrefix`, ...). Command line
//! flags override file values in `main`.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use etcetera::BaseStrategy;
use indexmap::IndexSet;
use log::debug;
use serde::Deserialize;

use crate::{
    source::jdk_source_archives,
    transformations::{
        DEFAULT_MESSAGE, DEFAULT_PREFIX, DEFAULT_SUFFIX, DEFAULT_UNCHECKED_EXCEPTION,
        TransformOptions,
    },
    types::UnitId,
};

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "cew.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Units to process, e.g. `java/io/Reader`; order is kept, duplicates dropped
    pub classes: IndexSet<String>,
    /// Root directory for generated sources
    pub output_folder: Option<PathBuf>,
    pub generated_name_prefix: String,
    pub generated_name_suffix: String,
    /// Exception thrown in place of checked ones
    pub unchecked_failure_type: String,
    pub failure_message: String,
    /// Source archives or directories, searched in order
    pub source_paths: Vec<PathBuf>,
    /// JDK whose `src.zip` is searched last; defaults to `$JDK_HOME`
    pub jdk_home: Option<PathBuf>,
    /// Stop the batch at the first failing unit
    pub fail_fast: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classes: IndexSet::new(),
            output_folder: None,
            generated_name_prefix: DEFAULT_PREFIX.to_owned(),
            generated_name_suffix: DEFAULT_SUFFIX.to_owned(),
            unchecked_failure_type: DEFAULT_UNCHECKED_EXCEPTION.to_owned(),
            failure_message: DEFAULT_MESSAGE.to_owned(),
            source_paths: Vec::new(),
            jdk_home: None,
            fail_fast: false,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Load the explicit file if given, else the first of `./cew.toml` and
    /// `<user config dir>/cew/cew.toml` that exists, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidates = [Some(PathBuf::from(CONFIG_FILE_NAME)), user_config_path()];
        for candidate in candidates.into_iter().flatten() {
            if candidate.is_file() {
                debug!("Using configuration {}", candidate.display());
                return Self::from_file(&candidate);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Fill `jdk_home` from the `JDK_HOME` value when the file left it unset
    pub fn apply_jdk_home_env(&mut self, jdk_home: Option<OsString>) {
        if self.jdk_home.is_none() {
            self.jdk_home = jdk_home
                .filter(|value| !value.is_empty())
                .map(PathBuf::from);
        }
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            prefix: self.generated_name_prefix.clone(),
            suffix: self.generated_name_suffix.clone(),
            unchecked_exception: self.unchecked_failure_type.clone(),
            message: self.failure_message.clone(),
        }
    }

    pub fn units(&self) -> Vec<UnitId> {
        self.classes.iter().map(|class| UnitId::new(class.as_str())).collect()
    }

    /// Configured locations followed by the JDK source archive, if any
    pub fn source_locations(&self) -> Vec<PathBuf> {
        let mut locations = self.source_paths.clone();
        if let Some(jdk_home) = &self.jdk_home {
            locations.extend(jdk_source_archives(jdk_home));
        }
        locations
    }

    pub fn output_folder(&self) -> Result<&Path> {
        self.output_folder
            .as_deref()
            .context("no output folder configured (set `outputFolder` or pass --output)")
    }
}

fn user_config_path() -> Option<PathBuf> {
    etcetera::choose_base_strategy()
        .ok()
        .map(|strategy| strategy.config_dir().join("cew").join(CONFIG_FILE_NAME))
}
