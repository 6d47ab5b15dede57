//! Shared constants for onyx-ext.

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Flat timeout for every call to the upstream Onyx API.
pub const UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Default upper bound for the headless browser PDF conversion.
pub const PDF_TIMEOUT_SECS: u64 = 60;

/// Maximum rows returned by any list endpoint.
pub const MAX_LIST_LIMIT: usize = 1000;

/// Default number of log lines returned by the Loki proxy.
pub const DEFAULT_LOG_LIMIT: usize = 100;

/// Maximum size of a generated chart (number of slices).
pub const MAX_CHART_SEGMENTS: usize = 24;

/// Placeholder rendered for zero durations in reports.
pub const ZERO_PLACEHOLDER: &str = "–";

/// Minutes per hour, times the percent base of tier rates.
pub const RATE_MINUTES_PER_HOUR: u64 = 6000;
