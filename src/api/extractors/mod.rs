pub mod identity;
pub mod json_body;

pub use identity::{Identity, MaybeIdentity, RequestIdentity};
pub use json_body::JsonBody;
