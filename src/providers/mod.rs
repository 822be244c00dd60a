//! Track sources: SoundCloud, Bandcamp and Mixcloud.
//!
//! # Architecture
//!
//! Each provider follows the same split:
//! - **DTOs / page extraction** - the exact shape the remote side hands back
//! - **Adapters** - the only place raw records become [`Track`](crate::model::Track)s
//! - **Clients** - HTTP calls, always through [`HttpTransport`]
//!
//! The [`Provider`] trait ties them together so the pipeline never knows
//! which source it is driving. [`resolver`] decides which one to build.

pub mod bandcamp;
pub mod domain;
pub mod mixcloud;
pub mod resolver;
pub mod soundcloud;
pub mod traits;

use std::sync::Arc;

pub use bandcamp::BandcampProvider;
pub use domain::{ProviderError, SourceRecord, TrackSkip};
pub use mixcloud::MixcloudProvider;
pub use resolver::{Resolution, ResolveOptions, classify};
pub use soundcloud::SoundCloudProvider;
pub use traits::Provider;

use crate::config::Config;
use crate::model::ProviderKind;
use crate::transport::HttpTransport;

/// Build the provider for `kind`.
///
/// `downloadable_only` only affects SoundCloud, the one source that
/// distinguishes licensed downloads from streams.
pub fn build_provider(
    kind: ProviderKind,
    config: &Config,
    transport: Arc<dyn HttpTransport>,
    downloadable_only: bool,
) -> Box<dyn Provider> {
    match kind {
        ProviderKind::SoundCloud => Box::new(SoundCloudProvider::new(
            transport,
            config.credentials.clone(),
            &config.http.soundcloud_api_base,
            downloadable_only,
        )),
        ProviderKind::Bandcamp => Box::new(BandcampProvider::new(transport)),
        ProviderKind::Mixcloud => Box::new(MixcloudProvider::new(transport)),
    }
}
