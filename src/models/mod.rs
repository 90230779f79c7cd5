pub mod event;
pub mod response;

pub use event::{available_spots, is_full, Event, EventId, InvalidEventId, NewEvent};
pub use response::ApiResponse;
