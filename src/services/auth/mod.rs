pub mod claims;
pub mod credentials;
pub mod error;
pub mod factory;
pub mod password;
pub mod roles;
pub mod signing_key;
pub mod token_issuer;
pub mod token_validator;

pub use claims::AuthenticatedIdentity;
pub use credentials::{CredentialAuthenticator, Credentials};
pub use error::{CredentialError, TokenError};
pub use factory::build_token_services;
pub use signing_key::SigningKey;
pub use token_issuer::TokenIssuer;
pub use token_validator::TokenValidator;
