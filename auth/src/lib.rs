//! Authentication infrastructure library
//!
//! Provides the credential primitives shared by the identity service:
//! - Password hashing (Argon2id)
//! - Typed access/refresh JWT claims and HS256 encoding/decoding
//! - `TokenSigner`, a per-actor-kind pair of signing keys
//!
//! The service defines its own domain traits and adapts these
//! implementations; nothing in here touches storage or transport.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Token signing
//! ```
//! use auth::{AccessClaims, TokenSigner};
//!
//! let signer = TokenSigner::new(
//!     b"access_secret_at_least_32_bytes_long!",
//!     b"refresh_secret_at_least_32_bytes_ok!!",
//! );
//! let claims = AccessClaims::new("actor-1", "alice@example.com", 15);
//! let token = signer.sign_access(&claims).unwrap();
//! let decoded = signer.verify_access(&token).unwrap();
//! assert_eq!(decoded.sub, "actor-1");
//! ```

pub mod jwt;
pub mod password;
pub mod signer;

// Re-export commonly used items
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::RefreshClaims;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use signer::TokenSigner;
