pub mod creative;
pub mod generation;
pub mod track;
pub mod vocals;
