pub mod claims;
pub mod errors;
pub mod issuer;
pub mod validator;

pub use claims::Claims;
pub use errors::TokenError;
pub use errors::TokenRejection;
pub use issuer::TokenIssuer;
pub use validator::AuthenticatedIdentity;
pub use validator::TokenValidator;
