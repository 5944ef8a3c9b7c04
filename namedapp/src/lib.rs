//! Namedapp is a client for the NameDapp contract: an on-chain list of names
//! that anyone can read and any wallet can append to or remove from.
//!
//! The crate is split the same way a dapp front-end is:
//!
//! - [`wallet`]: discovers and wraps the wallet provider (accounts, reads, signing)
//! - [`contract`]: a typed proxy for the four contract functions
//! - [`controller`]: UI state, input validation, and per-action transaction status
//! - [`config`]: JSON configuration and the cache refresh policy
//!
//! ```rust,ignore
//! use namedapp::prelude::*;
//!
//! let config = load_config(None).await?;
//! let controller = NameDappController::builder()
//!     .maybe_wallet(wallet::discover(&config).await?)
//!     .settings(ControllerSettings::from(&config))
//!     .build();
//!
//! controller.connect().await?;
//! controller.set_new_name("Carol").await;
//! controller.add_name().await?;
//! ```

pub mod config;
pub mod contract;
pub mod controller;
pub mod error;
pub mod prelude;
pub mod wallet;

pub use error::{Error, Result};
