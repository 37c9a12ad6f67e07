//! Shared testing utilities
//!
//! Fixtures for the session codec, OAuth2 clients and settings, used by unit
//! tests and by the integration tests under `tests/` (with the `testing`
//! feature).
//!
//! ```ignore
//! use passport::testing::TestFixtures;
//!
//! let codec = TestFixtures::session_codec();
//! let value = codec.issue("1001", 60).unwrap();
//! assert!(codec.verify(&value));
//! ```

pub mod fixtures;

pub use fixtures::TestFixtures;

/// Common test constants
pub mod constants {
    /// HS256 signing secret for test sessions
    pub const TEST_SIGNING_SECRET: &str = "test-signing-secret-for-sessions";

    /// Cipher key material for test sessions (32 bytes)
    pub const TEST_CIPHER_KEY: &str = "test_key_32_bytes_long_for_test_";

    /// Local user id used across tests
    pub const TEST_UID: &str = "1001";

    pub const TEST_CLIENT_ID: &str = "test-client-id";
    pub const TEST_CLIENT_SECRET: &str = "test-client-secret";
    pub const TEST_STATE: &str = "test-state";
}
