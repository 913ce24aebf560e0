/// Shared authentication library for the ripple service
///
/// Provides the two security primitives every authenticated request depends
/// on: the JWT token codec (issue/verify of signed identity tokens) and
/// Argon2id password hashing.
///
/// The codec holds its signing secret as constructor-injected state so that
/// callers can build independent instances in tests; there is no process-wide
/// key registry.
pub mod jwt;
pub mod password;

pub use jwt::{Claims, Identity, TokenCodec, TokenError};
pub use password::{hash_password, verify_password, PasswordError};
