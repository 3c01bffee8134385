//! Quote domain - swap intent, routes, and the simulated route generator

pub mod intent;
pub mod route;
pub mod route_generator;

pub use intent::{EditFocus, SwapIntent};
pub use route::{Route, RouteBadge, RouteSet};
pub use route_generator::{GenerateOptions, MockRouteGenerator, RouteSource};
