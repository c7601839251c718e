pub mod devices;
pub mod snapshot;
