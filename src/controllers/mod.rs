pub mod creative;
pub mod generation;
pub mod health;
pub mod tracks;
pub mod vocals;
