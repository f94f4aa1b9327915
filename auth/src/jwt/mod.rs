pub mod authority;
pub mod claims;
pub mod errors;
pub mod handler;

pub use authority::TokenAuthority;
pub use authority::TokenConfig;
pub use authority::TokenPair;
pub use claims::SessionClaims;
pub use claims::TokenKind;
pub use claims::TokenSubject;
pub use errors::JwtError;
pub use handler::JwtHandler;
