//! Transport proxy client
//!
//! [`ProxyClient`] wraps a [`TransportProxy`] with the driver's request policy:
//! - every attempt is bounded by the device timeout
//! - a busy proxy is retried at most once, after a short fixed backoff
//! - timeouts and transport errors are returned as-is, never retried

use crate::proxy::{ReadRequest, TransportProxy, WriteRequest};
use bacnet_application::ReadGroup;
use bacnet_core::{BacnetError, BacnetResult, DeviceConfig, PropertyOutcome, PropertyValue};
use bacnet_interface::RegisterModel;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Wait before retrying a busy proxy
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Per-device request settings
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub device_address: String,
    pub device_instance: u32,
    pub use_read_multiple: bool,
    /// Bound on each attempt
    pub timeout: Duration,
    /// Retries on a busy proxy (0 or 1)
    pub retries: u8,
    pub retry_backoff: Duration,
}

impl ClientSettings {
    /// Settings taken from a device configuration
    pub fn from_device(device: &DeviceConfig) -> Self {
        Self {
            device_address: device.address.clone(),
            device_instance: device.device_instance,
            use_read_multiple: device.use_read_multiple,
            timeout: device.timeout,
            retries: device.effective_retries(),
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Longest a single request can take, retries included
    ///
    /// Saturates at `Duration::MAX` for very large timeouts.
    pub fn worst_case(&self) -> Duration {
        let attempts = 1 + u32::from(self.retries);
        self.timeout
            .saturating_mul(attempts)
            .saturating_add(self.retry_backoff.saturating_mul(u32::from(self.retries)))
    }
}

/// Client issuing requests for one device through a transport proxy
#[derive(Clone)]
pub struct ProxyClient {
    proxy: Arc<dyn TransportProxy>,
    settings: ClientSettings,
}

impl fmt::Debug for ProxyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyClient")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ProxyClient {
    /// Create a client
    ///
    /// # Arguments
    /// * `proxy` - Transport proxy shared by every request
    /// * `settings` - Device address and request policy
    pub fn new(proxy: Arc<dyn TransportProxy>, settings: ClientSettings) -> Self {
        Self { proxy, settings }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Read every property of a group
    ///
    /// # Returns
    /// The proxy's outcomes, in group order
    ///
    /// # Errors
    /// - `BacnetError::Timeout` if an attempt exceeds the device timeout
    /// - `BacnetError::Transport` on transport failures and on a busy proxy that stays busy
    /// - `BacnetError::SegmentationNotSupported` if the reply does not fit unsegmented
    pub async fn send_read(&self, group: &ReadGroup) -> BacnetResult<Vec<PropertyOutcome>> {
        let request = ReadRequest {
            device_address: self.settings.device_address.clone(),
            device_instance: self.settings.device_instance,
            use_read_multiple: self.settings.use_read_multiple,
            properties: group.references(),
        };
        log::debug!(
            "Reading {} properties ({} bytes estimated) from device {} at {}",
            group.len(),
            group.estimated_size(),
            self.settings.device_instance,
            self.settings.device_address
        );
        let reply = self
            .with_retry("read", || self.proxy.read_properties(request.clone()))
            .await?;
        Ok(reply.values)
    }

    /// Write one value
    ///
    /// # Arguments
    /// * `register` - Target register
    /// * `value` - Encoded value (`Null` relinquishes)
    /// * `priority` - Priority slot, if any
    ///
    /// # Errors
    /// As [`send_read`](Self::send_read), plus `BacnetError::Rejected` when the device
    /// refuses the write
    pub async fn send_write(
        &self,
        register: &RegisterModel,
        value: PropertyValue,
        priority: Option<u8>,
    ) -> BacnetResult<()> {
        let request = WriteRequest {
            device_address: self.settings.device_address.clone(),
            device_instance: self.settings.device_instance,
            reference: register.reference(),
            value,
            priority,
        };
        log::debug!(
            "Writing {} to {} at priority {:?}",
            request.value,
            register,
            priority
        );
        self.with_retry("write", || self.proxy.write_property(request.clone()))
            .await
    }

    async fn with_retry<T, F, Fut>(&self, operation: &str, mut attempt_fn: F) -> BacnetResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = BacnetResult<T>>,
    {
        let mut attempt: u8 = 0;
        loop {
            let result = match tokio::time::timeout(self.settings.timeout, attempt_fn()).await {
                Ok(result) => result,
                Err(_) => Err(BacnetError::Timeout(self.settings.timeout)),
            };

            match result {
                Err(e) if e.is_recoverable() => {
                    if attempt < self.settings.retries {
                        attempt += 1;
                        log::warn!(
                            "Proxy busy on {} for device {} ({}), retrying in {:?}",
                            operation,
                            self.settings.device_instance,
                            e,
                            self.settings.retry_backoff
                        );
                        tokio::time::sleep(self.settings.retry_backoff).await;
                        continue;
                    }
                    return Err(BacnetError::Transport(format!(
                        "{} failed after {} attempt(s): {}",
                        operation,
                        attempt + 1,
                        e
                    )));
                }
                Err(BacnetError::Io(e)) => return Err(BacnetError::Transport(e.to_string())),
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::{MockTransportProxy, ReadReply};
    use async_trait::async_trait;
    use bacnet_core::{DataType, ObjectIdentifier, ObjectType, PropertyIdentifier};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    fn register(name: &str, instance: u32) -> Arc<RegisterModel> {
        Arc::new(RegisterModel::new(
            name,
            ObjectIdentifier::new(ObjectType::AnalogValue, instance).unwrap(),
            PropertyIdentifier::PresentValue,
            DataType::Float,
        ))
    }

    fn group() -> ReadGroup {
        ReadGroup::new(vec![register("A", 1), register("B", 2)])
    }

    fn settings() -> ClientSettings {
        ClientSettings::from_device(&DeviceConfig::new("10.0.0.7", 77).with_timeout(Duration::from_millis(100)))
            .with_retry_backoff(Duration::from_millis(5))
    }

    fn reply() -> ReadReply {
        ReadReply {
            values: vec![
                PropertyOutcome::Value(PropertyValue::Real(1.0)),
                PropertyOutcome::Value(PropertyValue::Real(2.0)),
            ],
        }
    }

    #[tokio::test]
    async fn test_read_builds_request() {
        let mut mock = MockTransportProxy::new();
        mock.expect_read_properties()
            .withf(|req| {
                req.device_address == "10.0.0.7"
                    && req.device_instance == 77
                    && req.use_read_multiple
                    && req.properties.len() == 2
                    && req.properties[1].instance == 2
            })
            .times(1)
            .returning(|_| Ok(reply()));

        let client = ProxyClient::new(Arc::new(mock), settings());
        let values = client.send_read(&group()).await.unwrap();
        assert_eq!(values.len(), 2);
    }

    #[tokio::test]
    async fn test_busy_retried_exactly_once() {
        let mut mock = MockTransportProxy::new();
        let mut calls = 0;
        mock.expect_read_properties().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(BacnetError::Busy("queue full".into()))
            } else {
                Ok(reply())
            }
        });

        let client = ProxyClient::new(Arc::new(mock), settings());
        assert_ok!(client.send_read(&group()).await);
    }

    #[tokio::test]
    async fn test_persistent_busy_surfaces_transport() {
        let mut mock = MockTransportProxy::new();
        mock.expect_read_properties()
            .times(2)
            .returning(|_| Err(BacnetError::Busy("queue full".into())));

        let client = ProxyClient::new(Arc::new(mock), settings());
        let err = client.send_read(&group()).await.unwrap_err();
        assert!(matches!(err, BacnetError::Transport(_)));
    }

    #[tokio::test]
    async fn test_no_retry_when_retries_zero() {
        let mut mock = MockTransportProxy::new();
        mock.expect_read_properties()
            .times(1)
            .returning(|_| Err(BacnetError::Busy("queue full".into())));

        let mut settings = settings();
        settings.retries = 0;
        let client = ProxyClient::new(Arc::new(mock), settings);
        assert_err!(client.send_read(&group()).await);
    }

    #[tokio::test]
    async fn test_transport_error_not_retried() {
        let mut mock = MockTransportProxy::new();
        mock.expect_read_properties()
            .times(1)
            .returning(|_| Err(BacnetError::Transport("connection reset".into())));

        let client = ProxyClient::new(Arc::new(mock), settings());
        let err = client.send_read(&group()).await.unwrap_err();
        assert!(matches!(err, BacnetError::Transport(_)));
    }

    #[tokio::test]
    async fn test_write_rejected_stays_distinct() {
        let mut mock = MockTransportProxy::new();
        mock.expect_write_property()
            .withf(|req| req.priority == Some(8) && req.value == PropertyValue::Real(72.5))
            .times(1)
            .returning(|_| Err(BacnetError::Rejected("write-access-denied".into())));

        let client = ProxyClient::new(Arc::new(mock), settings());
        let err = client
            .send_write(&register("A", 1), PropertyValue::Real(72.5), Some(8))
            .await
            .unwrap_err();
        assert!(matches!(err, BacnetError::Rejected(_)));
    }

    struct SlowProxy {
        calls: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl TransportProxy for SlowProxy {
        async fn read_properties(&self, _request: ReadRequest) -> BacnetResult<ReadReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(ReadReply::default())
        }

        async fn write_property(&self, _request: WriteRequest) -> BacnetResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_timeout_not_retried() {
        let proxy = Arc::new(SlowProxy {
            calls: AtomicUsize::new(0),
            delay: Duration::from_secs(5),
        });
        let client = ProxyClient::new(proxy.clone(), settings());
        let err = client.send_read(&group()).await.unwrap_err();
        assert!(matches!(err, BacnetError::Timeout(_)));
        assert_eq!(proxy.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_worst_case() {
        let settings = ClientSettings::from_device(&DeviceConfig::new("a", 1).with_timeout(Duration::from_secs(2)));
        assert_eq!(settings.worst_case(), Duration::from_millis(4250));
    }

    #[test]
    fn test_worst_case_saturates() {
        let settings = ClientSettings::from_device(&DeviceConfig::new("a", 1).with_timeout(Duration::MAX));
        assert_eq!(settings.worst_case(), Duration::MAX);
    }
}
