pub mod geo;
pub mod leg;
pub mod markers;
pub mod route;

pub use geo::GeoPoint;
pub use leg::{track, LegContext, SnapResult, Waypoint};
pub use markers::{compute_offsets, ScreenPoint};
pub use route::RouteSegment;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
