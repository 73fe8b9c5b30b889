//! Token lifecycle: refresh token persistence, per-scope ttl policy and the
//! engine that issues, validates and rotates token pairs.

mod engine;
mod policy;
mod store;

pub use engine::{ExtractedTokens, TokenLifecycleEngine, TokenPair, Validated};
pub use policy::{ScopePolicy, TokenPolicy};
pub use store::{RefreshTokenStore, PURGE_GRACE_SECONDS};
