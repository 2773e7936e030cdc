//! Command line and environment configuration.

use clap::Parser;
use paintflow_core::storage::{DEFAULT_LIST_LIMIT, DrawingStore, FileStore, MemoryStore, StoreResult};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

/// Largest accepted request body (drawings carry a PNG preview).
pub const DEFAULT_BODY_LIMIT: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "paintflow-server", about = "PaintFlow drawing persistence server")]
pub struct ServerConfig {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Directory for drawing files. Drawings are kept in memory when unset.
    #[arg(long, env = "PAINTFLOW_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Maximum request body size in bytes.
    #[arg(long, env = "PAINTFLOW_BODY_LIMIT", default_value_t = DEFAULT_BODY_LIMIT)]
    pub body_limit: usize,

    /// Maximum number of drawings returned by a listing.
    #[arg(long, env = "PAINTFLOW_LIST_LIMIT", default_value_t = DEFAULT_LIST_LIMIT)]
    pub list_limit: usize,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn open_store(&self) -> StoreResult<Arc<dyn DrawingStore>> {
        match &self.data_dir {
            Some(dir) => {
                tracing::info!("Storing drawings in {}", dir.display());
                Ok(Arc::new(FileStore::new(dir.clone())?))
            }
            None => {
                tracing::warn!("No data directory configured; drawings are kept in memory");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}
