//! Authentication middleware: token codec, identity resolution, and the
//! per-request access gate.

pub mod extractor;
pub mod jwt;
pub mod layer;
pub mod resolver;
pub mod types;

pub use extractor::Auth;
pub use jwt::{TokenCodec, TokenError, TOKEN_TTL_DAYS};
pub use layer::{AuthLayer, AuthMiddleware, RequireRoleLayer, RequireRoleMiddleware};
pub use resolver::IdentityResolver;
pub use types::{Claims, CurrentUser};
