//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default access token lifetime in minutes
pub const DEFAULT_JWT_EXPIRE_MINUTES: i64 = 30;

/// Longest accepted access token lifetime in minutes (one year)
pub const MAX_JWT_EXPIRE_MINUTES: i64 = 365 * 24 * 60;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per minute (for token expiration calculation)
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Header carrying the bot shared key
pub const API_KEY_HEADER: &str = "api-key";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default service name reported by the API
pub const DEFAULT_PROJECT_NAME: &str = "Habit Tracker";

/// Default API version
pub const DEFAULT_API_VERSION: &str = "0.1.0";

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default log level when neither RUST_LOG nor LOG_LEVEL is set
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Database
// =============================================================================

/// Default PostgreSQL host (docker-compose service name)
pub const DEFAULT_POSTGRES_HOST: &str = "db";

/// Default PostgreSQL port
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

// =============================================================================
// Habits
// =============================================================================

/// Days needed to form a habit when the client does not say otherwise
pub const DEFAULT_DAYS_TO_FORM_HABIT: i32 = 21;

/// Default number of executions returned by the "recent" endpoint
pub const DEFAULT_RECENT_EXECUTIONS: u64 = 7;

/// Upper bound for the "recent" endpoint
pub const MAX_RECENT_EXECUTIONS: u64 = 366;

/// How far back streak recomputation looks
pub const STREAK_LOOKBACK_DAYS: u64 = 366;
