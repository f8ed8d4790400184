use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{path::Path, thread, time::Instant};
use sysinfo::{Disks, MINIMUM_CPU_UPDATE_INTERVAL, Networks, Pid, ProcessesToUpdate, System};

use crate::config::{Config, DatabaseSettings, RedisSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthState,
    pub message: Option<String>,
    pub response_time_ms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ping {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    pub version: String,
    pub components: Vec<ComponentHealth>,
    pub uptime_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub cpu_percent: f32,
    pub cpu_count: usize,
    pub memory_percent: f64,
    pub memory_available_gb: f64,
    pub disk_usage_percent: f64,
    pub disk_free_gb: f64,
    pub network_bytes_sent: u64,
    pub network_bytes_recv: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    pub pid: u32,
    pub memory_rss_mb: f64,
    pub memory_vms_mb: f64,
    pub cpu_percent: f32,
    pub num_threads: Option<usize>,
    pub uptime_seconds: f64,
    pub open_files: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub platform: String,
    pub kernel_version: Option<String>,
    pub hostname: Option<String>,
    pub boot_time: Option<DateTime<Utc>>,
    pub load_average: Option<[f64; 3]>,
}

/// [`HealthStatus`] plus host and process metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedHealth {
    #[serde(flatten)]
    pub health: HealthStatus,
    pub system_metrics: SystemMetrics,
    pub process_metrics: ProcessMetrics,
    pub system_info: SystemInfo,
}

const MB: f64 = 1024.0 * 1024.0;
const GB: f64 = MB * 1024.0;

/// Liveness and configuration-level readiness. Components are reported
/// healthy when their location is configured; nothing is dialled.
#[derive(Debug, Clone)]
pub struct HealthService {
    version: String,
    database: DatabaseSettings,
    redis: RedisSettings,
    started: Instant,
}

impl HealthService {
    pub fn from_config(config: &Config) -> Self {
        Self {
            version: config.app.version.clone(),
            database: config.database.clone(),
            redis: config.redis.clone(),
            started: Instant::now(),
        }
    }

    pub fn ping(&self) -> Ping {
        Ping { status: "ok".to_string(), message: "pong".to_string() }
    }

    pub fn status(&self) -> HealthStatus {
        let components = vec![self.check_database(), self.check_redis()];

        let status = if components.iter().all(|c| c.status == HealthState::Healthy) {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        };

        HealthStatus {
            status,
            version: self.version.clone(),
            components,
            uptime_seconds: self.started.elapsed().as_secs_f64(),
        }
    }

    /// Blocks for about [`MINIMUM_CPU_UPDATE_INTERVAL`] so CPU usage has two
    /// samples to compare. Call it off the async executor.
    pub fn detailed(&self) -> DetailedHealth {
        let health = self.status();
        let pid = Pid::from_u32(std::process::id());

        let mut system = System::new();
        system.refresh_cpu_usage();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]));
        thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
        system.refresh_cpu_usage();
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        let process_metrics = match system.process(pid) {
            Some(process) => ProcessMetrics {
                pid: pid.as_u32(),
                memory_rss_mb: process.memory() as f64 / MB,
                memory_vms_mb: process.virtual_memory() as f64 / MB,
                cpu_percent: process.cpu_usage(),
                num_threads: process.tasks().map(|tasks| tasks.len()),
                uptime_seconds: health.uptime_seconds,
                open_files: open_files(),
            },
            None => ProcessMetrics {
                pid: pid.as_u32(),
                memory_rss_mb: 0.0,
                memory_vms_mb: 0.0,
                cpu_percent: 0.0,
                num_threads: None,
                uptime_seconds: health.uptime_seconds,
                open_files: open_files(),
            },
        };

        DetailedHealth {
            system_metrics: system_metrics(&system),
            process_metrics,
            system_info: system_info(),
            health,
        }
    }

    fn check_database(&self) -> ComponentHealth {
        let started = Instant::now();
        let (status, message) = if !self.database.host.is_empty() && !self.database.name.is_empty() {
            (
                HealthState::Healthy,
                format!("Database configured: {}/{}", self.database.host, self.database.name),
            )
        } else {
            (HealthState::Unhealthy, "Database not configured".to_string())
        };

        component("database", status, message, started)
    }

    fn check_redis(&self) -> ComponentHealth {
        let started = Instant::now();
        let (status, message) = if !self.redis.host.is_empty() {
            (HealthState::Healthy, format!("Redis configured: {}:{}", self.redis.host, self.redis.port))
        } else {
            (HealthState::Unhealthy, "Redis not configured".to_string())
        };

        component("redis", status, message, started)
    }
}

fn component(name: &str, status: HealthState, message: String, started: Instant) -> ComponentHealth {
    ComponentHealth {
        name: name.to_string(),
        status,
        message: Some(message),
        response_time_ms: Some(started.elapsed().as_secs_f64() * 1000.0),
    }
}

fn system_metrics(system: &System) -> SystemMetrics {
    let (disk_total, disk_free) = root_disk();
    let networks = Networks::new_with_refreshed_list();

    SystemMetrics {
        cpu_percent: system.global_cpu_usage(),
        cpu_count: system.cpus().len(),
        memory_percent: percent(system.used_memory(), system.total_memory()),
        memory_available_gb: system.available_memory() as f64 / GB,
        disk_usage_percent: percent(disk_total.saturating_sub(disk_free), disk_total),
        disk_free_gb: disk_free as f64 / GB,
        network_bytes_sent: networks.iter().map(|(_, data)| data.total_transmitted()).sum(),
        network_bytes_recv: networks.iter().map(|(_, data)| data.total_received()).sum(),
    }
}

/// Total and available bytes of the disk mounted at `/`, or of the first
/// disk listed when there is no such mount.
fn root_disk() -> (u64, u64) {
    let disks = Disks::new_with_refreshed_list();
    disks
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))
        .or_else(|| disks.iter().next())
        .map_or((0, 0), |disk| (disk.total_space(), disk.available_space()))
}

fn system_info() -> SystemInfo {
    let load = System::load_average();

    SystemInfo {
        platform: System::long_os_version().unwrap_or_else(|| std::env::consts::OS.to_string()),
        kernel_version: System::kernel_version(),
        hostname: System::host_name(),
        boot_time: i64::try_from(System::boot_time())
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        load_average: (!cfg!(windows)).then_some([load.one, load.five, load.fifteen]),
    }
}

/// Descriptors held by this process; only Linux exposes them cheaply.
fn open_files() -> Option<usize> {
    if cfg!(target_os = "linux") {
        std::fs::read_dir("/proc/self/fd").ok().map(|entries| entries.count())
    } else {
        None
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 { 0.0 } else { part as f64 / total as f64 * 100.0 }
}
