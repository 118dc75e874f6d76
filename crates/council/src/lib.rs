pub mod council;
pub mod errors;
pub mod models;
pub mod providers;
