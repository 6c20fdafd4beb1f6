//! Immutable per-configuration state
//!
//! A [`Snapshot`] bundles everything derived from one configure call. The driver
//! swaps whole snapshots; nothing inside one is ever mutated.

use bacnet_application::{BatchPlan, BatchPlanner};
use bacnet_core::{BacnetResult, DeviceConfig};
use bacnet_interface::{PointMap, RegisterModel};
use bacnet_transport::{ClientSettings, ProxyClient, TransportProxy};
use std::sync::Arc;
use std::time::Duration;

/// Configuration generation in use by a driver
#[derive(Debug)]
pub struct Snapshot {
    pub generation: u64,
    pub device: DeviceConfig,
    pub points: PointMap,
    pub plan: BatchPlan,
    pub client: ProxyClient,
}

impl Snapshot {
    /// Validate, resolve and plan a configuration
    ///
    /// # Errors
    /// Returns `BacnetError::Configuration` if the device or any register is invalid
    pub fn build(
        generation: u64,
        device: DeviceConfig,
        registers: Vec<RegisterModel>,
        proxy: Arc<dyn TransportProxy>,
        retry_backoff: Duration,
    ) -> BacnetResult<Self> {
        device.validate()?;
        let points = PointMap::resolve(&device, registers)?;
        let plan = BatchPlanner::plan(&points, &device);
        let settings = ClientSettings::from_device(&device).with_retry_backoff(retry_backoff);
        let client = ProxyClient::new(proxy, settings);
        Ok(Self {
            generation,
            device,
            points,
            plan,
            client,
        })
    }

    /// Hard limit on one scrape
    ///
    /// `scrape_timeout` when configured, otherwise the sum of every group's worst
    /// case (all attempts plus backoff).
    pub fn scrape_deadline(&self) -> Duration {
        match self.device.scrape_timeout {
            Some(limit) => limit,
            None => {
                let groups = u32::try_from(self.plan.len().max(1)).unwrap_or(u32::MAX);
                self.client.settings().worst_case().saturating_mul(groups)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bacnet_core::{DataType, ObjectIdentifier, ObjectType, PropertyIdentifier};
    use bacnet_transport::{ReadReply, ReadRequest, WriteRequest};
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl TransportProxy for Unreachable {
        async fn read_properties(&self, _request: ReadRequest) -> BacnetResult<ReadReply> {
            Err(bacnet_core::BacnetError::Transport("unreachable".into()))
        }

        async fn write_property(&self, _request: WriteRequest) -> BacnetResult<()> {
            Err(bacnet_core::BacnetError::Transport("unreachable".into()))
        }
    }

    fn registers(count: u32) -> Vec<RegisterModel> {
        (1..=count)
            .map(|i| {
                RegisterModel::new(
                    format!("AI{}", i),
                    ObjectIdentifier::new(ObjectType::AnalogInput, i).unwrap(),
                    PropertyIdentifier::PresentValue,
                    DataType::Float,
                )
            })
            .collect()
    }

    fn build(device: DeviceConfig, count: u32) -> Snapshot {
        Snapshot::build(1, device, registers(count), Arc::new(Unreachable), Duration::from_millis(100)).unwrap()
    }

    #[test]
    fn test_deadline_sums_group_worst_cases() {
        // 50-byte APDU: five points plan as 3 + 2
        let device = DeviceConfig::new("10.0.0.2", 1)
            .with_max_apdu_length(50)
            .with_timeout(Duration::from_secs(2));
        let snapshot = build(device, 5);
        assert_eq!(snapshot.plan.len(), 2);
        // (2s * 2 attempts + 100ms backoff) per group
        assert_eq!(snapshot.scrape_deadline(), Duration::from_millis(8200));
    }

    #[test]
    fn test_deadline_prefers_scrape_timeout() {
        let device = DeviceConfig::new("10.0.0.2", 1).with_scrape_timeout(Duration::from_secs(3));
        assert_eq!(build(device, 2).scrape_deadline(), Duration::from_secs(3));
    }

    #[test]
    fn test_deadline_saturates_for_huge_timeouts() {
        let device = DeviceConfig::new("10.0.0.2", 1)
            .with_max_apdu_length(50)
            .with_timeout(Duration::from_secs(5_000_000_000_000_000_000));
        let snapshot = build(device, 5);
        assert_eq!(snapshot.scrape_deadline(), Duration::MAX);
    }
}
