// HTTP routes
pub mod auth;
pub mod health;
pub mod profiles;
pub mod vendor;

pub use auth::*;
pub use health::*;
pub use profiles::*;
pub use vendor::*;
