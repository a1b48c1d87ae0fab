//! Client-side resolution of extra account metas.
//!
//! A gating program publishes a configuration account listing the extra
//! accounts its instructions need. [`Resolver::resolve`] fetches that
//! account, decodes its records and turns each one into a concrete
//! [`ResolvedAccountMeta`], in order, so that later records can build on the
//! addresses and account data of earlier ones.
//!
//! ```ignore
//! let metas = Resolver::new()
//!     .resolve(&config_address, &base_metas, &ix_data, &gating_program_id, &fetch)
//!     .await?;
//! ```

mod error;
mod pointer;
mod resolve;
mod seeds;

#[cfg(feature = "solana")]
mod ix;

pub use error::*;
pub use pointer::*;
pub use resolve::*;
pub use seeds::resolve_seeds;

#[cfg(feature = "solana")]
pub use ix::*;

// Re-exports
pub mod fetch {
    pub use exmeta_fetch::*;
}

pub mod meta {
    pub use exmeta_meta::*;
}

pub mod pda {
    pub use exmeta_pda::*;
}

pub use exmeta_meta::{AccountRole, ResolvedAccountMeta};
