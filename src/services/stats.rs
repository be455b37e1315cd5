use async_trait::async_trait;
use poise::serenity_prelude::CreateEmbed;
use std::fmt;
use tracing::{info, warn};

use crate::config::{EmbedConfig, NodeConfig};
use crate::error::{Result, StatsError};
use crate::services::geolocation::{LocationInfo, LocationProvider};
use crate::services::metrics::MetricsProvider;
use crate::utils::{duration::format_uptime, embed};

const CPU_OVERLOAD_PERCENT: f64 = 90.0;
const RAM_OVERLOAD_PERCENT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSnapshot {
    pub cpu_percent: f64,
    pub ram_used_mb: f64,
    pub ram_total_mb: f64,
    pub disk_used_gb: f64,
    pub disk_total_gb: f64,
    pub uptime_seconds: u64,
}

impl ResourceSnapshot {
    /// Rounded to two decimals, the same value the embed shows.
    pub fn ram_used_percent(&self) -> f64 {
        percent(self.ram_used_mb, self.ram_total_mb)
    }

    pub fn disk_used_percent(&self) -> f64 {
        percent(self.disk_used_gb, self.disk_total_gb)
    }
}

fn percent(used: f64, total: f64) -> f64 {
    ((used / total) * 100.0 * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct CpuInfo {
    pub model: String,
    pub threads: usize,
}

impl CpuInfo {
    /// Assumes two hardware threads per core; not read from the topology.
    pub fn cores(&self) -> f64 {
        self.threads as f64 / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub resources: ResourceSnapshot,
    pub cpu: CpuInfo,
    pub location: LocationInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Operational,
    CpuOverloaded,
    RamOverloaded,
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLevel::Operational => write!(f, ":green_circle: Operational"),
            StatusLevel::CpuOverloaded => write!(f, ":warning: CPU is overloaded"),
            StatusLevel::RamOverloaded => write!(f, ":warning: RAM is overloaded"),
        }
    }
}

/// Only one level is reported. The RAM check runs last and wins when both
/// thresholds trip.
pub fn compute_status(snapshot: &ResourceSnapshot) -> StatusLevel {
    let mut status = StatusLevel::Operational;

    if snapshot.cpu_percent > CPU_OVERLOAD_PERCENT {
        status = StatusLevel::CpuOverloaded;
    }

    if snapshot.ram_used_percent() > RAM_OVERLOAD_PERCENT {
        status = StatusLevel::RamOverloaded;
    }

    status
}

/// The display fields of a stats reply, in order.
pub fn report_fields(snapshot: &Snapshot, hostname: &str) -> Vec<(&'static str, String)> {
    let res = &snapshot.resources;
    let location = &snapshot.location;

    vec![
        ("Status", compute_status(res).to_string()),
        ("Provider", location.organization.clone()),
        ("IPv4 Address", location.ip_address.clone()),
        ("Hostname", hostname.to_string()),
        ("Location", location.display()),
        (
            "RAM Usage",
            format!(
                "{:.2} GiB of {:.2} GiB ({:.2}%)",
                res.ram_used_mb / 1000.0,
                res.ram_total_mb / 1000.0,
                res.ram_used_percent()
            ),
        ),
        ("CPU Usage", format!("{}%", res.cpu_percent)),
        ("CPU Model", snapshot.cpu.model.clone()),
        (
            "CPU Information",
            format!("{} cores, {} threads", snapshot.cpu.cores(), snapshot.cpu.threads),
        ),
        (
            "Disk Usage",
            format!(
                "{:.1} GiB of {:.1} GiB ({:.2}%)",
                res.disk_used_gb,
                res.disk_total_gb,
                res.disk_used_percent()
            ),
        ),
        ("Uptime", format_uptime(res.uptime_seconds)),
    ]
}

pub enum Reply {
    Embed(CreateEmbed),
    Text(String),
}

/// Anything a stats reply can be sent back through.
#[async_trait]
pub trait Replyable: Sync {
    /// Acknowledge the request before the slow gather starts.
    async fn defer(&self) -> Result<()> {
        Ok(())
    }

    async fn reply(&self, reply: Reply) -> Result<()>;
}

pub struct StatsReporter<M, L> {
    metrics: M,
    locator: L,
    node: NodeConfig,
    embed: EmbedConfig,
}

impl<M, L> StatsReporter<M, L>
where
    M: MetricsProvider,
    L: LocationProvider,
{
    pub fn new(metrics: M, locator: L, node: NodeConfig, embed: EmbedConfig) -> Self {
        Self {
            metrics,
            locator,
            node,
            embed,
        }
    }

    /// Queries are awaited one after another; the first failure discards
    /// everything gathered so far.
    pub async fn gather_snapshot(&self) -> std::result::Result<Snapshot, StatsError> {
        let memory = self.metrics.memory().await?;
        let disk = self.metrics.disk().await?;
        let cpu_percent = self.metrics.cpu_usage().await?;
        let uptime_seconds = self.metrics.uptime().await?;
        let location = self.locator.locate().await?;

        Ok(Snapshot {
            resources: ResourceSnapshot {
                cpu_percent,
                ram_used_mb: memory.used_mb,
                ram_total_mb: memory.total_mb,
                disk_used_gb: disk.used_gb,
                disk_total_gb: disk.total_gb,
                uptime_seconds,
            },
            cpu: CpuInfo {
                model: self.metrics.cpu_model(),
                threads: self.metrics.thread_count(),
            },
            location,
        })
    }

    pub async fn build_embed(&self) -> std::result::Result<CreateEmbed, StatsError> {
        let snapshot = self.gather_snapshot().await?;
        Ok(embed::stats(&self.embed, report_fields(&snapshot, &self.node.hostname)))
    }

    /// Replies with the stats embed, or with `Error: <message>` if gathering
    /// failed or the embed was rejected.
    pub async fn respond<R: Replyable>(&self, target: &R) -> Result<()> {
        target.defer().await?;

        let embed = match self.build_embed().await {
            Ok(embed) => embed,
            Err(e) => {
                warn!(node = %self.node.name, error = %e, "Failed to gather node statistics");
                return target.reply(Reply::Text(format!("Error: {}", e))).await;
            }
        };

        info!(node = %self.node.name, "Sending node statistics");
        if let Err(e) = target.reply(Reply::Embed(embed)).await {
            warn!(node = %self.node.name, error = %e, "Stats embed was rejected");
            return target.reply(Reply::Text(format!("Error: {}", e))).await;
        }

        Ok(())
    }
}
