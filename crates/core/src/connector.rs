//! Connectors build storage clients for the profile list
//!
//! A [`ConnectorLoader`] discovers connectors from one source (the config
//! file, the shared AWS config, the demo backend). The profiles page shows
//! the connectors of every enabled loader.

use std::sync::Arc;

use crate::client::StorageClient;
use crate::error::Result;
use crate::memory::MemoryClient;

/// A named way to create a [`StorageClient`]
pub trait Connector {
    fn name(&self) -> &str;

    /// Source of the connector, shown in the profile list ("profile", "aws", "memory")
    fn kind(&self) -> &str;

    fn create_client(&self) -> Result<Arc<dyn StorageClient>>;
}

/// Discovers connectors from one source
pub trait ConnectorLoader {
    fn load(&self) -> Result<Vec<Arc<dyn Connector>>>;
}

/// Connector handing out one shared in-memory client
pub struct MemoryConnector {
    name: String,
    client: Arc<MemoryClient>,
}

impl MemoryConnector {
    pub fn new(name: impl Into<String>, client: MemoryClient) -> Self {
        Self {
            name: name.into(),
            client: Arc::new(client),
        }
    }
}

impl Connector for MemoryConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "memory"
    }

    fn create_client(&self) -> Result<Arc<dyn StorageClient>> {
        Ok(self.client.clone())
    }
}

/// Loader yielding the demo memory backend
#[derive(Debug, Default)]
pub struct MemoryLoader;

impl ConnectorLoader for MemoryLoader {
    fn load(&self) -> Result<Vec<Arc<dyn Connector>>> {
        Ok(vec![Arc::new(MemoryConnector::new("Memory", MemoryClient::demo()))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paginator::collect_pages;

    #[test]
    fn test_memory_loader() {
        let connectors = MemoryLoader.load().unwrap();
        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].name(), "Memory");
        assert_eq!(connectors[0].kind(), "memory");
    }

    #[test]
    fn test_memory_connector_shares_state() {
        let connector = MemoryConnector::new("m", MemoryClient::new());
        connector
            .create_client()
            .unwrap()
            .create_bucket("kept", "")
            .unwrap();

        let client = connector.create_client().unwrap();
        let buckets = collect_pages(client.list_buckets().as_mut()).unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].name, "kept");
    }
}
