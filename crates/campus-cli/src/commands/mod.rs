pub mod check;
pub mod config;
pub mod listing;
pub mod resolve;
pub mod roles;
pub mod sample;

use crate::config::CliConfig;
use anyhow::{Context, Result};
use campus_access::{AccessControl, InMemoryAssignmentStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

pub struct CommandContext {
    pub store: Arc<InMemoryAssignmentStore>,
    pub access: AccessControl,
}

impl CommandContext {
    pub fn new(config: &CliConfig) -> Result<Self> {
        let store = match &config.data_file {
            Some(path) => InMemoryAssignmentStore::from_file(path).with_context(|| format!("loading dataset {}", path.display()))?,
            None => {
                debug!("No dataset configured, using the sample academy");
                InMemoryAssignmentStore::sample()
            }
        };
        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(config: &CliConfig, store: Arc<InMemoryAssignmentStore>) -> Self {
        let access = AccessControl::new(store.clone(), &config.access);
        Self { store, access }
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
