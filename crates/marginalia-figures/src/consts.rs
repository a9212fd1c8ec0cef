//! Defaults for figure rendering.

use std::time::Duration;

/// Font package loaded when the document does not name one.
pub const DEFAULT_FONT: &str = "garamondx";

/// Rasterization density for PNG output, in dots per inch.
pub const DEFAULT_DENSITY: u32 = 300;

/// Time limit for each external program invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
