//! Site logic: request routing, document root resolution and the clock
//! behind the `/time` and `/date` endpoints.

pub mod clock;
pub mod resolver;
pub mod router;

pub use clock::{Clock, FixedClock, SystemClock};
pub use resolver::Resource;
pub use router::{RouteError, Router};
