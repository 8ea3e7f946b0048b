// Business domains
pub mod vendors;
