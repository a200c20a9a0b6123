pub mod analysis;
pub mod handlers;
