//! Pure conversions from provider responses into the normalized payloads the fetcher caches.

mod changelog;
pub use changelog::*;
mod error;
pub use error::*;
mod headers;
pub use headers::*;
mod language_packs;
pub use language_packs::*;
mod metadata;
pub use metadata::*;
mod readme;
pub use readme::*;
mod tags;
pub use tags::*;
pub mod version;
