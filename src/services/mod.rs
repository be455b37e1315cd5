pub mod geolocation;
pub mod metrics;
pub mod stats;

pub use geolocation::{IpInfoClient, LocationInfo, LocationProvider};
pub use metrics::{MetricsProvider, SysinfoProvider};
pub use stats::{Reply, Replyable, StatsReporter};
