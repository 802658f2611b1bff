//! Builder shared by every resolver kind.

use std::sync::Arc;

use sn_01_interceptors::{AntifloodHandler, InterceptorThrottler};

use crate::adapters::StorageService;
use crate::domain::DataPool;
use crate::events::ResolverError;
use crate::ports::ResolverSender;
use crate::resolvers::common::ResolverCore;

/// Every collaborator is required; `build_*` fails with
/// `MissingCollaborator` naming the first one absent.
#[derive(Default)]
pub struct ResolverBuilder {
    sender: Option<Arc<dyn ResolverSender>>,
    antiflood: Option<Arc<dyn AntifloodHandler>>,
    throttler: Option<Arc<dyn InterceptorThrottler>>,
    pool: Option<Arc<DataPool>>,
    storage: Option<Arc<StorageService>>,
}

pub(crate) struct ResolverParts {
    pub(crate) core: ResolverCore,
    pub(crate) pool: Arc<DataPool>,
    pub(crate) storage: Arc<StorageService>,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(mut self, sender: Arc<dyn ResolverSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn antiflood(mut self, antiflood: Arc<dyn AntifloodHandler>) -> Self {
        self.antiflood = Some(antiflood);
        self
    }

    pub fn throttler(mut self, throttler: Arc<dyn InterceptorThrottler>) -> Self {
        self.throttler = Some(throttler);
        self
    }

    pub fn pool(mut self, pool: Arc<DataPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn storage(mut self, storage: Arc<StorageService>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub(crate) fn into_parts(self) -> Result<ResolverParts, ResolverError> {
        let core = ResolverCore::new(self.sender, self.antiflood, self.throttler)?;
        Ok(ResolverParts {
            core,
            pool: self
                .pool
                .ok_or(ResolverError::MissingCollaborator("data pool"))?,
            storage: self
                .storage
                .ok_or(ResolverError::MissingCollaborator("storage service"))?,
        })
    }
}
