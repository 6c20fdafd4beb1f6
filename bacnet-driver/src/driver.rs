//! Driver facade
//!
//! [`BacnetDriver`] is what the scheduling layer talks to. It owns the current
//! [`Snapshot`] and runs every request against exactly one snapshot, so a scrape
//! never mixes two configurations.
//!
//! # Usage
//!
//! ```rust,no_run
//! use bacnet_driver::BacnetDriver;
//! use bacnet_core::DeviceConfig;
//! use bacnet_transport::TcpProxy;
//! use std::sync::Arc;
//!
//! # async fn run(registers: Vec<bacnet_interface::RegisterModel>) -> bacnet_core::BacnetResult<()> {
//! let driver = BacnetDriver::new(Arc::new(TcpProxy::new("127.0.0.1:9001")));
//! driver.configure(DeviceConfig::new("192.168.1.20", 1001), registers).await?;
//!
//! let result = driver.scrape_all().await?;
//! for (name, value) in result.values() {
//!     println!("{} = {}", name, value);
//! }
//! # Ok(())
//! # }
//! ```

use crate::config::DriverConfig;
use crate::result::{GroupResult, ScrapeResult};
use crate::snapshot::Snapshot;
use crate::state::DriverState;
use arc_swap::ArcSwapOption;
use bacnet_application::{PointFailure, ReadGroup, ResultDecoder, WriteService};
use bacnet_core::{BacnetError, BacnetResult, DeviceConfig, PointValue};
use bacnet_interface::{into_registers, RegisterModel, RegistryRecord};
use bacnet_transport::{ProxyClient, TransportProxy, DEFAULT_RETRY_BACKOFF};
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// BACnet driver for one device
pub struct BacnetDriver {
    proxy: Arc<dyn TransportProxy>,
    retry_backoff: Duration,
    snapshot: ArcSwapOption<Snapshot>,
    generation: AtomicU64,
    stopped: AtomicBool,
    /// Serializes configure and stop
    reconfigure: Mutex<()>,
}

impl BacnetDriver {
    /// Create an unconfigured driver using `proxy` for every request
    pub fn new(proxy: Arc<dyn TransportProxy>) -> Self {
        Self {
            proxy,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            snapshot: ArcSwapOption::from(None),
            generation: AtomicU64::new(0),
            stopped: AtomicBool::new(false),
            reconfigure: Mutex::new(()),
        }
    }

    /// Override the wait before retrying a busy proxy
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> DriverState {
        if self.stopped.load(Ordering::Acquire) {
            DriverState::Stopped
        } else if self.snapshot.load().is_some() {
            DriverState::Ready
        } else {
            DriverState::Unconfigured
        }
    }

    /// Configured point names in declaration order (empty unless ready)
    pub fn point_names(&self) -> Vec<String> {
        self.snapshot
            .load_full()
            .map(|s| s.points.names())
            .unwrap_or_default()
    }

    /// Current configuration generation (0 before the first configure)
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Configure or reconfigure the driver
    ///
    /// Validates the device, resolves the registers and plans the read groups,
    /// then swaps the result in as a whole. May be called while scrapes are in
    /// flight; their remaining groups are reported as superseded.
    ///
    /// # Errors
    /// `BacnetError::Configuration` if the driver is stopped or the configuration is
    /// invalid; the previous configuration then stays in effect
    pub async fn configure(&self, device: DeviceConfig, registers: Vec<RegisterModel>) -> BacnetResult<()> {
        let _guard = self.reconfigure.lock().await;
        self.ensure_running()?;

        let generation = self.generation.load(Ordering::Acquire) + 1;
        let snapshot = Snapshot::build(generation, device, registers, self.proxy.clone(), self.retry_backoff)
            .inspect_err(|e| log::error!("Rejected configuration: {}", e))?;

        let action = if self.snapshot.load().is_some() { "Reconfigured" } else { "Configured" };
        log::info!(
            "{} device {} at {}: {} points in {} read groups (generation {})",
            action,
            snapshot.device.device_instance,
            snapshot.device.address,
            snapshot.points.len(),
            snapshot.plan.len(),
            generation
        );

        self.snapshot.store(Some(Arc::new(snapshot)));
        self.generation.store(generation, Ordering::Release);
        Ok(())
    }

    /// Configure from a driver config file and registry rows
    pub async fn configure_from_registry(&self, config: DriverConfig, records: &[RegistryRecord]) -> BacnetResult<()> {
        let device = config.into_device_config()?;
        let registers = into_registers(records)?;
        self.configure(device, registers).await
    }

    /// Stop the driver; every later call fails with a configuration error
    pub async fn stop(&self) {
        let _guard = self.reconfigure.lock().await;
        if !self.stopped.swap(true, Ordering::AcqRel) {
            self.snapshot.store(None);
            log::info!("Driver stopped at generation {}", self.generation());
        }
    }

    /// Read every configured point
    ///
    /// Read groups run in plan order, at most `max_concurrent_requests` at a time.
    /// Failures are reported per point and never abort the scrape; groups still
    /// outstanding at the scrape deadline are reported as timed out.
    ///
    /// # Errors
    /// `BacnetError::Configuration` if the driver is not ready
    pub async fn scrape_all(&self) -> BacnetResult<ScrapeResult> {
        let snapshot = self.ready_snapshot()?;
        let groups = snapshot.plan.groups();
        if groups.is_empty() {
            return Ok(ScrapeResult::new(snapshot.generation, Vec::new()));
        }

        let deadline = snapshot.scrape_deadline();
        let fan_out = snapshot.device.max_concurrent_requests.max(1);
        let mut slots: Vec<Option<GroupResult>> = vec![None; groups.len()];

        let current: &Snapshot = &snapshot;
        let mut results = stream::iter(groups.iter().enumerate())
            .map(|(index, group)| async move { (index, self.read_group(current, group).await) })
            .buffered(fan_out);

        let collect = async {
            while let Some((index, group_result)) = results.next().await {
                slots[index] = Some(group_result);
            }
        };
        if tokio::time::timeout(deadline, collect).await.is_err() {
            log::warn!(
                "Scrape of device {} hit its {:?} deadline",
                snapshot.device.device_instance,
                deadline
            );
        }

        let group_results = slots
            .into_iter()
            .zip(groups)
            .map(|(slot, group)| {
                slot.unwrap_or_else(|| {
                    GroupResult::failed(ResultDecoder::fail_group(group, PointFailure::Timeout))
                })
            })
            .collect();

        let result = ScrapeResult::new(snapshot.generation, group_results);
        log::debug!(
            "Scrape of device {} finished: {} ({} points, {} of {} groups failed)",
            snapshot.device.device_instance,
            result.status(),
            result.len(),
            result.failed_groups(),
            groups.len()
        );
        Ok(result)
    }

    /// Read a single point
    ///
    /// # Errors
    /// - `BacnetError::Configuration` if the driver is not ready (no request is sent)
    /// - `BacnetError::PointNotFound` for unknown names
    /// - `BacnetError::Timeout` / `BacnetError::Transport` if the request fails
    /// - `BacnetError::Decode` if the value does not fit the point's data type
    /// - `BacnetError::Property` if the device rejects the property
    pub async fn get_point(&self, name: &str) -> BacnetResult<PointValue> {
        let snapshot = self.ready_snapshot()?;
        let register = Self::lookup(&snapshot, name)?;

        let group = ReadGroup::single(register.clone());
        let outcome = match snapshot.client.send_read(&group).await {
            Ok(mut outcomes) if outcomes.len() == 1 => outcomes.remove(0),
            Ok(outcomes) => {
                return Err(BacnetError::Transport(format!(
                    "Reply carries {} values for 1 requested property",
                    outcomes.len()
                )))
            }
            Err(BacnetError::SegmentationNotSupported(message)) => {
                return Err(BacnetError::Transport(message))
            }
            Err(e) => {
                log::warn!("Read of {} failed: {}", register, e);
                return Err(e);
            }
        };
        ResultDecoder::decode_point(&register, outcome)
    }

    /// Write a point
    ///
    /// The value is checked against the point's data type and run through the
    /// inverse transform before anything is sent. It is written at the point's
    /// priority, or the device default when the point has none.
    ///
    /// # Returns
    /// The value written, as a subsequent read would report it
    ///
    /// # Errors
    /// - `BacnetError::Configuration` if the driver is not ready
    /// - `BacnetError::PointNotFound`, `BacnetError::NotWritable`, `BacnetError::TypeMismatch`
    ///   before any request is sent
    /// - `BacnetError::Timeout`, `BacnetError::Transport`, `BacnetError::Rejected` from the write
    pub async fn set_point(&self, name: &str, value: PointValue) -> BacnetResult<PointValue> {
        let snapshot = self.ready_snapshot()?;
        let register = Self::lookup(&snapshot, name)?;
        let write = WriteService::prepare(&register, &value, &snapshot.device)?;

        snapshot
            .client
            .send_write(&register, write.value.clone(), Some(write.priority))
            .await
            .inspect_err(|e| log::error!("Write of {} to {} failed: {}", value, register, e))?;

        Ok(write.written.unwrap_or(value))
    }

    /// Relinquish the point's priority slot (write NULL at its priority)
    ///
    /// # Errors
    /// `BacnetError::NotWritable` if the point is read-only or has no configured
    /// priority, otherwise as [`set_point`](Self::set_point)
    pub async fn revert_point(&self, name: &str) -> BacnetResult<()> {
        let snapshot = self.ready_snapshot()?;
        let register = Self::lookup(&snapshot, name)?;
        let write = WriteService::prepare_relinquish(&register)?;
        Self::relinquish(&snapshot.client, &register, write.priority).await
    }

    /// Relinquish every writable point that has a configured priority
    ///
    /// All points are attempted; the first error is returned.
    pub async fn revert_all(&self) -> BacnetResult<()> {
        let snapshot = self.ready_snapshot()?;
        let mut first_error = None;

        for register in snapshot.points.iter().filter(|r| r.is_writable()) {
            let Some(priority) = register.write_priority() else {
                log::debug!("Skipping revert of {}: no configured priority", register);
                continue;
            };
            if let Err(e) = Self::relinquish(&snapshot.client, register, priority).await {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn relinquish(client: &ProxyClient, register: &RegisterModel, priority: u8) -> BacnetResult<()> {
        client
            .send_write(register, bacnet_core::PropertyValue::Null, Some(priority))
            .await
            .inspect_err(|e| log::error!("Revert of {} at priority {} failed: {}", register, priority, e))
    }

    fn ensure_running(&self) -> BacnetResult<()> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(BacnetError::Configuration("Driver is stopped".to_string()));
        }
        Ok(())
    }

    fn ready_snapshot(&self) -> BacnetResult<Arc<Snapshot>> {
        self.ensure_running()?;
        self.snapshot
            .load_full()
            .ok_or_else(|| BacnetError::Configuration("Driver is not configured".to_string()))
    }

    fn lookup(snapshot: &Snapshot, name: &str) -> BacnetResult<Arc<RegisterModel>> {
        snapshot
            .points
            .get(name)
            .cloned()
            .ok_or_else(|| BacnetError::PointNotFound(name.to_string()))
    }

    fn is_current(&self, generation: u64) -> bool {
        self.snapshot
            .load_full()
            .is_some_and(|s| s.generation == generation)
    }

    async fn read_group(&self, snapshot: &Snapshot, group: &ReadGroup) -> GroupResult {
        let group_result = read_with_split(&snapshot.client, group.clone()).await;
        if !self.is_current(snapshot.generation) {
            log::warn!(
                "Discarding {} values read under generation {}: configuration replaced",
                group.len(),
                snapshot.generation
            );
            return GroupResult::failed(ResultDecoder::fail_group(group, PointFailure::Superseded));
        }
        group_result
    }
}

/// Read a group, halving it for as long as the device cannot return it unsegmented
///
/// The group counts as answered only if every request issued for it was.
fn read_with_split(client: &ProxyClient, group: ReadGroup) -> BoxFuture<'_, GroupResult> {
    Box::pin(async move {
        match client.send_read(&group).await {
            Ok(outcomes) => match ResultDecoder::decode(&group, outcomes) {
                Ok(points) => GroupResult::answered(points),
                Err(e) => {
                    log::warn!("Discarding reply for {} properties: {}", group.len(), e);
                    GroupResult::failed(ResultDecoder::fail_group(&group, PointFailure::from_error(&e)))
                }
            },
            Err(BacnetError::SegmentationNotSupported(message)) => match group.split() {
                Some((left, right)) => {
                    log::warn!(
                        "Device cannot return {} properties unsegmented ({}), splitting into {} + {}",
                        group.len(),
                        message,
                        left.len(),
                        right.len()
                    );
                    let mut merged = read_with_split(client, left).await;
                    let second = read_with_split(client, right).await;
                    merged.points.extend(second.points);
                    merged.answered &= second.answered;
                    merged
                }
                None => {
                    log::warn!("Device cannot return {} unsegmented: {}", group.names().collect::<Vec<_>>().join(", "), message);
                    GroupResult::failed(ResultDecoder::fail_group(&group, PointFailure::Transport { message }))
                }
            },
            Err(e) => {
                log::warn!("Read of {} properties failed: {}", group.len(), e);
                GroupResult::failed(ResultDecoder::fail_group(&group, PointFailure::from_error(&e)))
            }
        }
    })
}
