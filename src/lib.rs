//! Parel portal - headless client for the Parel Agency project portal
//!
//! This library provides the portal's client-side behavior without a DOM:
//! routing, the auth-gated render state machine, the authenticated API
//! client, page views and the notification queue. The browser front-end
//! and the `portal` CLI both drive it through [`portal::Portal`].
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `identity`: Identity provider capability and session snapshots
//! - `api`: Bearer-authenticated backend client and wire types
//! - `notifier`: Transient notification queue
//! - `router`: Route matching, link classification and the navigator
//! - `view`: Content slot, auth widget and click predicates
//! - `pages`: List, detail and new project pages
//! - `bridge`: Session state machine gating all rendering
//! - `portal`: Composition root
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use parel_portal::{Config, Portal};
//! use parel_portal::identity::EnvIdentity;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/portal.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let identity = Arc::new(EnvIdentity::new(&config.identity.publishable_key, None));
//!     let portal = Portal::new(&config, identity, "/")?;
//!     portal.start().await?;
//!     println!("{}", portal.content_markup());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bridge;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod notifier;
pub mod pages;
pub mod portal;
pub mod router;
pub mod view;

// Re-export commonly used types
pub use api::ApiClient;
pub use bridge::{AuthBridge, AuthState};
pub use config::Config;
pub use error::{ApiError, ApiResult, PortalError, Result};
pub use notifier::Notifier;
pub use portal::{Portal, SubmitOutcome};
pub use router::{Location, Navigator, Route};
