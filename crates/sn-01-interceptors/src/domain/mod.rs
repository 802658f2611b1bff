//! Domain layer: throttling, quotas, blacklist, whitelist and the
//! intercepted data model.

pub mod blacklist;
pub mod debug;
pub mod factory;
pub mod intercepted;
pub mod quota;
pub mod throttler;
pub mod whitelist;

pub use blacklist::{BlacklistEntry, PeerBlacklist};
pub use debug::{DebugEvent, DisabledDebugger, RecordingDebugger};
pub use factory::{InterceptedDataFactory, TopicDataFactory};
pub use intercepted::{
    DataKind, InterceptContext, InterceptedData, InterceptedMetaHeader, InterceptedMiniBlock,
    InterceptedShardHeader, InterceptedTransaction,
};
pub use quota::{FloodPreventer, QuotaConfig, QuotaUsage};
pub use throttler::{CountingThrottler, ThrottleGuard};
pub use whitelist::{WhiteListCache, WhiteListConfig};
