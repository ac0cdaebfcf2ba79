// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! File-based configuration (TOML or JSON).
//!
//! ```toml
//! federate_name = "Ping"
//! federate_type = "PingFederate"
//! federation_name = "PingPong"
//! can_create_federation = true
//! fom_modules = ["fom/PingPong.xml"]
//!
//! [time]
//! time_stepped = true
//! lookahead = 1.0
//!
//! [[interactions]]
//! name = "Ping"
//! sharing = "publish"
//! parameters = [{ name = "count", data_type = "int" }]
//! ```

use super::{FederateConfiguration, InteractionClass, InteractionParameter, ObjectAttribute, ObjectClass, Sharing};
use crate::codec::DataType;
use crate::error::{Error, Result};
use crate::rti::ResignAction;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are JSON, everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// On-disk shape of a [`FederateConfiguration`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub federate_name: String,
    pub federate_type: String,
    pub federation_name: String,

    #[serde(default)]
    pub can_create_federation: bool,
    #[serde(default = "default_max_join_attempts")]
    pub max_join_attempts: u32,
    #[serde(default = "default_join_retry_interval_secs")]
    pub join_retry_interval_secs: u64,

    #[serde(default)]
    pub late_joiner: bool,
    #[serde(default)]
    pub sync_before_resign: bool,
    #[serde(default)]
    pub sim_control: bool,
    #[serde(default)]
    pub resign_action: ResignAction,

    #[serde(default)]
    pub fom_modules: Vec<String>,
    #[serde(default)]
    pub som_modules: Vec<String>,

    #[serde(default)]
    pub time: TimeSection,

    #[serde(default)]
    pub objects: Vec<ObjectClassEntry>,
    #[serde(default)]
    pub interactions: Vec<InteractionClassEntry>,
}

/// `[time]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeSection {
    #[serde(default = "default_true")]
    pub time_stepped: bool,
    #[serde(default = "default_one")]
    pub lookahead: f64,
    #[serde(default = "default_one")]
    pub step_size: f64,
    #[serde(default = "default_true")]
    pub callbacks_evoked: bool,
    #[serde(default = "default_evoke_min")]
    pub evoke_min_secs: f64,
    #[serde(default = "default_evoke_max")]
    pub evoke_max_secs: f64,
    /// Upper bound for any blocking wait, in milliseconds. Absent = unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_timeout_ms: Option<u64>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for TimeSection {
    fn default() -> Self {
        Self {
            time_stepped: true,
            lookahead: 1.0,
            step_size: 1.0,
            callbacks_evoked: true,
            evoke_min_secs: default_evoke_min(),
            evoke_max_secs: default_evoke_max(),
            wait_timeout_ms: None,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectClassEntry {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeEntry {
    pub name: String,
    pub data_type: DataType,
    pub sharing: Sharing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InteractionClassEntry {
    pub name: String,
    pub sharing: Sharing,
    #[serde(default)]
    pub parameters: Vec<ParameterEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterEntry {
    pub name: String,
    pub data_type: DataType,
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

fn default_evoke_min() -> f64 {
    0.1
}

fn default_evoke_max() -> f64 {
    0.2
}

fn default_poll_interval_ms() -> u64 {
    super::DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_max_join_attempts() -> u32 {
    super::DEFAULT_MAX_JOIN_ATTEMPTS
}

fn default_join_retry_interval_secs() -> u64 {
    super::DEFAULT_JOIN_RETRY_INTERVAL_SECS
}

impl ConfigFile {
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| Error::config(format!("TOML parse error: {}", e))),
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| Error::config(format!("JSON parse error: {}", e))),
        }
    }

    pub fn render(&self, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("TOML encode error: {}", e))),
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| Error::config(format!("JSON encode error: {}", e))),
        }
    }

    /// Build an unfrozen configuration from this file.
    pub fn into_configuration(self) -> FederateConfiguration {
        let mut config = FederateConfiguration::new(
            self.federate_name,
            self.federate_type,
            self.federation_name,
        );
        config
            .set_can_create_federation(self.can_create_federation)
            .set_max_join_attempts(self.max_join_attempts)
            .set_join_retry_interval_secs(self.join_retry_interval_secs)
            .set_late_joiner(self.late_joiner)
            .set_sync_before_resign(self.sync_before_resign)
            .set_sim_control(self.sim_control)
            .set_resign_action(self.resign_action)
            .set_time_stepped(self.time.time_stepped)
            .set_lookahead(self.time.lookahead)
            .set_step_size(self.time.step_size)
            .set_callbacks_evoked(self.time.callbacks_evoked)
            .set_evoke_window(self.time.evoke_min_secs, self.time.evoke_max_secs)
            .set_wait_timeout(self.time.wait_timeout_ms.map(Duration::from_millis))
            .set_poll_interval(Duration::from_millis(self.time.poll_interval_ms))
            .add_fom_modules(self.fom_modules)
            .add_som_modules(self.som_modules);

        for entry in self.objects {
            let mut class = ObjectClass::new(entry.name);
            for attr in entry.attributes {
                class.add_attribute(ObjectAttribute::new(attr.name, attr.data_type, attr.sharing));
            }
            config.add_object_class(class);
        }
        for entry in self.interactions {
            let mut class = InteractionClass::new(entry.name, entry.sharing);
            for param in entry.parameters {
                class.add_parameter(InteractionParameter::new(param.name, param.data_type));
            }
            config.add_interaction_class(class);
        }
        config
    }
}

impl From<&FederateConfiguration> for ConfigFile {
    fn from(config: &FederateConfiguration) -> Self {
        let (evoke_min_secs, evoke_max_secs) = config.evoke_window();
        Self {
            federate_name: config.federate_name().to_string(),
            federate_type: config.federate_type().to_string(),
            federation_name: config.federation_name().to_string(),
            can_create_federation: config.can_create_federation(),
            max_join_attempts: config.max_join_attempts(),
            join_retry_interval_secs: config.join_retry_interval_secs(),
            late_joiner: config.is_late_joiner(),
            sync_before_resign: config.sync_before_resign(),
            sim_control: config.sim_control(),
            resign_action: config.resign_action(),
            fom_modules: config.fom_modules().to_vec(),
            som_modules: config.som_modules().to_vec(),
            time: TimeSection {
                time_stepped: config.is_time_stepped(),
                lookahead: config.lookahead(),
                step_size: config.step_size(),
                callbacks_evoked: config.are_callbacks_evoked(),
                evoke_min_secs,
                evoke_max_secs,
                wait_timeout_ms: config.wait_timeout().map(|d| d.as_millis() as u64),
                poll_interval_ms: config.poll_interval().as_millis() as u64,
            },
            objects: config
                .object_classes()
                .map(|class| ObjectClassEntry {
                    name: class.name.clone(),
                    attributes: class
                        .attributes()
                        .map(|a| AttributeEntry {
                            name: a.name.clone(),
                            data_type: a.data_type,
                            sharing: a.sharing,
                        })
                        .collect(),
                })
                .collect(),
            interactions: config
                .interaction_classes()
                .map(|class| InteractionClassEntry {
                    name: class.name.clone(),
                    sharing: class.sharing,
                    parameters: class
                        .parameters()
                        .map(|p| ParameterEntry {
                            name: p.name.clone(),
                            data_type: p.data_type,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl FederateConfiguration {
    /// Load and validate a configuration file. The result is not frozen, so
    /// command-line overrides can still be applied.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_str_with(&content, ConfigFormat::from_path(path))?;
        config.validate()?;
        log::info!("[config] loaded '{}' from {}", config.federate_name(), path.display());
        Ok(config)
    }

    /// Parse configuration text without validating module paths.
    pub fn from_str_with(content: &str, format: ConfigFormat) -> Result<Self> {
        Ok(ConfigFile::parse(content, format)?.into_configuration())
    }

    /// Render this configuration in the given format.
    pub fn render(&self, format: ConfigFormat) -> Result<String> {
        ConfigFile::from(self).render(format)
    }
}
