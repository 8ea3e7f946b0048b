pub mod profile;
pub mod research;
pub mod vendor_cache;

pub use profile::*;
pub use research::*;
pub use vendor_cache::*;
