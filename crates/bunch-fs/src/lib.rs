//! Filesystem layer for bunch
//!
//! Provides normalized path handling, tombstone-aware variant reads,
//! locked atomic writes and the lazy tree scanner used to discover
//! bunch files.

pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod scan;
pub mod variant;

pub use constants::BunchPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use scan::{IgnoreRules, TreeScanner};
pub use variant::{VariantContent, is_tombstone, normalize_whitespace, read_variant, read_variant_opt};
