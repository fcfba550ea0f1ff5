pub mod identity;

pub use identity::{FirebaseIdentity, IdentityError, IdentityProvider, ProviderUser};
