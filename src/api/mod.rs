//! Backend API access
//!
//! - [`client`]: bearer-authenticated HTTP client with normalized errors
//! - [`types`]: request and response shapes

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiRequest};
pub use types::{
    Asset, AssetKind, AssetStatus, CreatedProject, DiscordLinkStatus, Manager, Masterplan,
    NewProjectRequest, Project,
};
