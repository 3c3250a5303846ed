//! Default configuration values

/// Maximum number of download retry attempts
pub const MAX_DOWNLOAD_RETRIES: u32 = 3;

/// Base delay for download retry backoff (in milliseconds)
pub const DOWNLOAD_RETRY_BASE_DELAY_MS: u64 = 1000;

/// Default build-tool debug level (`-d+N`)
pub const DEFAULT_B2_DEBUG_LEVEL: u32 = 1;

/// External build tool binary
pub const BUILD_TOOL: &str = "b2";

/// External registry tool binary
pub const REGISTRY_TOOL: &str = "conan";

/// Registry pattern matching every package of the Boost family
pub const FAMILY_REGISTRY_PATTERN: &str = "boost_*";

/// Name prefix of packages in the Boost family
pub const FAMILY_PREFIX: &str = "boost_";

/// Default registry channel packages are created under
pub const DEFAULT_CHANNEL: &str = "bincrafters/testing";

/// Preprocessor define disabling MSVC auto-linking for consumers
pub const NO_AUTOLINK_DEFINE: &str = "BOOST_ALL_NO_LIB=1";

/// File extensions recognized as binary library artifacts
pub const LIBRARY_EXTENSIONS: [&str; 4] = ["so", "lib", "a", "dylib"];

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
