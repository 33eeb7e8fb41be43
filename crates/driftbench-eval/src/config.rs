//! Preset configuration loading for the CLI.
//!
//! A preset starts from its defaults, is optionally replaced by a JSON file
//! (`--config`, missing keys keep their defaults) and finally patched by
//! whichever command-line flags were given.

use anyhow::{Context, Result};
use clap::ValueEnum;
use driftbench_core::config::{LedStreamConfig, RbfStreamConfig};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Synthetic stream presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetKind {
    /// Random RBF concepts with drift-free extra dimensions
    Rbf,
    /// Seven-segment LED digits with alternating noise
    Led,
}

impl DatasetKind {
    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Rbf => "RBF",
            DatasetKind::Led => "LED",
        }
    }
}

/// Loads a preset config from `path`, or its defaults when no path is given.
pub fn load_config<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Settings given explicitly on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamOverrides {
    pub num_concepts: Option<usize>,
    pub n_per_concept: Option<usize>,
    pub drift_length: Option<usize>,
    pub stretch: Option<bool>,
    pub seed: Option<u64>,
}

impl StreamOverrides {
    /// Overwrites the settings of `config` that were given on the command line.
    pub fn apply<C: StreamSettings>(&self, config: &mut C) {
        let fields = config.settings_mut();
        patch(fields.num_concepts, self.num_concepts);
        patch(fields.n_per_concept, self.n_per_concept);
        patch(fields.drift_length, self.drift_length);
        patch(fields.stretch, self.stretch);
        patch(fields.seed, self.seed);
    }
}

/// Mutable view of the settings every preset shares.
pub struct SettingsMut<'a> {
    pub num_concepts: &'a mut usize,
    pub n_per_concept: &'a mut usize,
    pub drift_length: &'a mut usize,
    pub stretch: &'a mut bool,
    pub seed: &'a mut u64,
}

/// Preset configs that can be patched by [`StreamOverrides`].
pub trait StreamSettings {
    fn settings_mut(&mut self) -> SettingsMut<'_>;
}

impl StreamSettings for RbfStreamConfig {
    fn settings_mut(&mut self) -> SettingsMut<'_> {
        SettingsMut {
            num_concepts: &mut self.num_concepts,
            n_per_concept: &mut self.n_per_concept,
            drift_length: &mut self.drift_length,
            stretch: &mut self.stretch,
            seed: &mut self.seed,
        }
    }
}

impl StreamSettings for LedStreamConfig {
    fn settings_mut(&mut self) -> SettingsMut<'_> {
        SettingsMut {
            num_concepts: &mut self.num_concepts,
            n_per_concept: &mut self.n_per_concept,
            drift_length: &mut self.drift_length,
            stretch: &mut self.stretch,
            seed: &mut self.seed,
        }
    }
}

fn patch<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}
