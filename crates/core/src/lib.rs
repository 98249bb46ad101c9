//! s3nav-core: Core library for the s3nav object storage browser
//!
//! This crate provides everything the terminal front end draws, including:
//! - The `StorageClient` contract and an in-memory reference backend
//! - Hierarchical listing helpers (`ObjectKeyTree`, `SearchableTable`)
//! - The navigation engine: page stack, modal stack and key routing
//! - The browsing pages and the external editor workflow
//! - Configuration and profile management
//!
//! This crate does not depend on any S3 SDK or terminal library. The front
//! end turns terminal events into [`KeyEvent`]s and draws the [`Screen`] the
//! controller produces.

pub mod client;
pub mod config;
pub mod connector;
pub mod context;
pub mod editor;
pub mod error;
pub mod format;
pub mod memory;
pub mod nav;
pub mod object;
pub mod pages;
pub mod paginator;
pub mod profile;
pub mod table;
pub mod tree;

pub use client::StorageClient;
pub use config::{Config, ConfigManager};
pub use connector::{Connector, ConnectorLoader, MemoryConnector, MemoryLoader};
pub use context::{Context, Suspend};
pub use editor::Editor;
pub use error::{Error, Result};
pub use memory::MemoryClient;
pub use nav::{KeyCode, KeyEvent, Modifiers, NavigationController, Screen};
pub use object::{Bucket, ConnectionParameters, FileEntry, ObjectEntry, ObjectMetadata};
pub use paginator::{Paginator, collect_pages};
pub use profile::{BUCKET_LOOKUP_STYLES, Profile, ProfileManager};
pub use table::SearchableTable;
pub use tree::ObjectKeyTree;
