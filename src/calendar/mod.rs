pub mod backend;
pub mod error;
pub mod event;
pub mod ops;
pub mod reader;
pub mod search;
pub mod slots;
#[cfg(test)]
pub(crate) mod testing;

pub use backend::{CalendarBackend, GcalBackend};
pub use error::CalendarError;
pub use event::{Event, FreeSlot, WorkingHours, day_bounds};
pub use reader::MultiCalendarReader;
