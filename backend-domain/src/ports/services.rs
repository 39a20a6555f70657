use async_trait::async_trait;

use crate::entities::GeoInfo;

#[async_trait]
pub trait GeoLookup: Send + Sync {
    /// Resolve a raw (unmasked) client IP. Callers are responsible for
    /// short-circuiting private and loopback addresses.
    async fn lookup(&self, ip: &str) -> anyhow::Result<GeoInfo>;
}
