use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};

use crate::error::StatsError;

const CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryInfo {
    pub used_mb: f64,
    pub total_mb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskInfo {
    pub used_gb: f64,
    pub total_gb: f64,
}

/// Source of host resource readings.
///
/// The async queries may suspend for as long as the provider needs (CPU usage
/// is sampled over a window) and are never cancelled by the caller.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Host-wide CPU usage in percent.
    async fn cpu_usage(&self) -> Result<f64, StatsError>;
    async fn memory(&self) -> Result<MemoryInfo, StatsError>;
    async fn disk(&self) -> Result<DiskInfo, StatsError>;
    /// Host uptime in seconds.
    async fn uptime(&self) -> Result<u64, StatsError>;
    fn cpu_model(&self) -> String;
    /// Logical CPUs, hyperthreads included.
    fn thread_count(&self) -> usize;
}

#[derive(Debug, Default, Clone)]
pub struct SysinfoProvider;

impl SysinfoProvider {
    pub fn new() -> Self {
        Self
    }

    fn cpu_system() -> System {
        System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()))
    }
}

#[async_trait]
impl MetricsProvider for SysinfoProvider {
    async fn cpu_usage(&self) -> Result<f64, StatsError> {
        let mut sys = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage()),
        );
        // Usage is a delta between two refreshes.
        tokio::time::sleep(CPU_SAMPLE_WINDOW.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)).await;
        sys.refresh_cpu_usage();

        if sys.cpus().is_empty() {
            return Err(StatsError::OperationFailed(
                "No CPU information available".to_string(),
            ));
        }
        Ok(round_to(sys.global_cpu_usage() as f64, 2))
    }

    async fn memory(&self) -> Result<MemoryInfo, StatsError> {
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
        );

        let total = sys.total_memory();
        if total == 0 {
            return Err(StatsError::OperationFailed(
                "No memory information available".to_string(),
            ));
        }
        let used = total.saturating_sub(sys.available_memory());

        Ok(MemoryInfo {
            used_mb: round_to(used as f64 / MIB, 2),
            total_mb: round_to(total as f64 / MIB, 2),
        })
    }

    async fn disk(&self) -> Result<DiskInfo, StatsError> {
        let disks = Disks::new_with_refreshed_list();
        let disk = disks
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| disks.first())
            .ok_or_else(|| {
                StatsError::OperationFailed("No disk information available".to_string())
            })?;

        let total = disk.total_space();
        let used = total.saturating_sub(disk.available_space());

        Ok(DiskInfo {
            used_gb: round_to(used as f64 / GIB, 1),
            total_gb: round_to(total as f64 / GIB, 1),
        })
    }

    async fn uptime(&self) -> Result<u64, StatsError> {
        Ok(System::uptime())
    }

    fn cpu_model(&self) -> String {
        Self::cpu_system()
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| "Unknown CPU".to_string())
    }

    fn thread_count(&self) -> usize {
        Self::cpu_system().cpus().len()
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.3456, 2), 12.35);
        assert_eq!(round_to(12.34, 1), 12.3);
        assert_eq!(round_to(7.0, 2), 7.0);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_sysinfo_memory_is_consistent() {
        let memory = SysinfoProvider::new().memory().await;
        assert!(memory.is_ok(), "{:?}", memory.err());

        let memory = memory.unwrap();
        assert!(memory.total_mb > 0.0);
        assert!(memory.used_mb <= memory.total_mb);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_sysinfo_cpu_usage_in_range() {
        let provider = SysinfoProvider::new();
        let usage = provider.cpu_usage().await;
        assert!(usage.is_ok(), "{:?}", usage.err());
        assert!(usage.unwrap() >= 0.0);
        assert!(provider.thread_count() > 0);
    }
}
