pub mod ask;
pub mod models;
