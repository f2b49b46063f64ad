//! License string helpers.
//!
//! - [`classifier`] — derives license names from PyPI trove classifiers when
//!   the registry's `license` field is empty.
//! - [`matcher`] — normalization and fuzzy matching of license names against
//!   policy lists.

pub mod classifier;
pub mod matcher;
