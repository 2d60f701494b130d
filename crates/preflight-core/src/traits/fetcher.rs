use crate::errors::PreflightResult;
use crate::models::ComponentDescriptor;

/// The preload hook. The library decides *what* to preload; the
/// application decides *how* — URL conventions and the actual resource
/// fetch are entirely its business.
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, component: &ComponentDescriptor) -> PreflightResult<()>;
}

/// Default fetcher that does nothing. Useful for tests and for
/// applications that only want the prediction side of the library.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFetcher;

impl AssetFetcher for NoopFetcher {
    fn fetch(&self, _component: &ComponentDescriptor) -> PreflightResult<()> {
        Ok(())
    }
}
