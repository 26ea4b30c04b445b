//! Update source for plugins and themes hosted on a self-hosted Bitbucket Server.
//!
//! [`fetcher::RemoteResourceFetcher`] fetches and caches the remote resources of a
//! [`descriptor::RepositoryDescriptor`], while the host it runs in plugs in through the
//! [`cache::Cache`], [`host::Host`] and [`markdown::MarkdownRenderer`] traits.

pub mod auth;
pub mod cache;
pub mod config;
pub mod descriptor;
pub mod fetcher;
pub mod host;
pub mod logging;
pub mod markdown;
pub mod parsers;
pub mod payload;

pub use bitbucket_server;
