pub mod error;
pub mod identifier;
pub mod resource;

pub use error::{CoreError, Result};
pub use identifier::Identifier;
pub use resource::{IdentityResource, ResourceType};
