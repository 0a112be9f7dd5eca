// Default limits for the step interpreter

/// Maximum nesting of step evaluation before `DepthLimitExceeded`
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Snapshot history budget in bytes (64 MiB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 64 * 1024 * 1024;
