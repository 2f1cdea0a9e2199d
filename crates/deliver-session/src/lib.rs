//! # Deliver Session
//!
//! The session state core: everything between the credential codec and
//! the HTTP layer.
//!
//! Three independently mutable pieces of state live here, each behind a
//! capability trait with exactly one production implementation:
//!
//! - [`store`]: capability traits ([`SessionStore`], [`UserStore`],
//!   [`VersionLedger`], [`SidBlacklist`], [`PermissionSource`],
//!   [`PermissionCache`])
//! - [`postgres`]: durable implementations over sqlx
//! - [`ledger`]: cached token-version counter, invalidate-on-write
//! - [`blacklist`]: self-expiring sid denylist
//! - [`permissions`]: cached permission snapshots
//!
//! The orchestrator (in the `deliver` binary crate) is the only writer
//! of session transitions and version bumps; the request gate reads
//! only the ledger and the blacklist.

pub mod blacklist;
pub mod ledger;
pub mod permissions;
pub mod postgres;
pub mod store;

// Re-export commonly used types at crate root
pub use blacklist::CachedSidBlacklist;
pub use ledger::CachedVersionLedger;
pub use permissions::CachedPermissions;
pub use postgres::{PgPermissionSource, PgSessionStore, PgUserStore};
pub use store::{
    PermissionCache, PermissionSource, SessionStore, SidBlacklist, UserStore, VersionLedger,
};
