pub mod stats;

use std::sync::Arc;

use crate::services::geolocation::IpInfoClient;
use crate::services::metrics::SysinfoProvider;
use crate::services::stats::StatsReporter;

pub type NodeReporter = StatsReporter<SysinfoProvider, IpInfoClient>;

#[derive(Clone)]
pub struct Data {
    pub reporter: Arc<NodeReporter>,
}
