//! specnote artifact primitives
//!
//! Content addresses and fuzzy matching shared by every specnote crate.
//!
//! # Core Concepts
//!
//! - [`Address`]: 20-byte git-compatible object id used as a metadata key
//! - [`fuzzy`]: normalized Damerau-Levenshtein ranking with the negligible,
//!   equivalent and relatedness thresholds
//!
//! # Example
//!
//! ```rust
//! use specnote_artifact::{fuzzy, Address};
//!
//! let address = Address::of_blob(b"Feature: Login\n");
//! assert_eq!(address.to_string().len(), 40);
//!
//! let ranked = fuzzy::rank("login", ["login", "logout"]);
//! assert_eq!(ranked[0].term, "login");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod address;
pub mod fuzzy;

pub use address::{Address, AddressError, ADDRESS_LEN};
pub use fuzzy::{Match, ADJACENT_THRESHOLD, MIN_THRESHOLD, RELATEDNESS_THRESHOLD};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
