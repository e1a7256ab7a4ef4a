pub mod event;
pub mod swap_request;

pub use event::{DEFAULT_LOCATION_LABEL, Event, Visibility};
pub use swap_request::{SwapRequestCreate, SwapRequestCreated};
