pub mod config;
pub mod error;
pub mod extract;
pub mod interact;
pub mod models;
pub mod render;
pub mod scrape;
pub mod traits;
pub mod util;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use config::{FetchConfig, InteractionConfig, RenderConfig, ScrapeConfig};
pub use error::AppError;
pub use models::{
    ErrorPhase, InteractionLog, PageMeta, RenderedPage, ScrapeError, ScrapeResult, Section,
    SectionContent, SectionType,
};
pub use scrape::ScrapeService;
pub use traits::{Fetcher, NoopRenderer, PageDriver, Renderer};
pub use util::parse_target_url;
