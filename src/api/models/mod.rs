pub mod reading;
pub mod request;
pub mod snapshot;
