//! Recording fake transport proxy for driver tests

use async_trait::async_trait;
use bacnet_core::{BacnetResult, PropertyOutcome, PropertyReference, PropertyValue};
use bacnet_transport::{ReadReply, ReadRequest, TransportProxy, WriteRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type ReadHandler = Box<dyn Fn(&ReadRequest) -> BacnetResult<ReadReply> + Send + Sync>;
type WriteHandler = Box<dyn Fn(&WriteRequest) -> BacnetResult<()> + Send + Sync>;
type DelayFn = Box<dyn Fn(&ReadRequest) -> Duration + Send + Sync>;

/// Value the default handler reports for a reference: its instance number as a REAL
pub fn instance_value(reference: &PropertyReference) -> PropertyOutcome {
    PropertyOutcome::Value(PropertyValue::Real(reference.instance as f32))
}

/// Counts a read as in flight until dropped, completed or cancelled
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct FakeProxy {
    reads: Mutex<Vec<ReadRequest>>,
    writes: Mutex<Vec<WriteRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    on_read: ReadHandler,
    on_write: WriteHandler,
    delay: DelayFn,
}

impl FakeProxy {
    pub fn new() -> Self {
        Self {
            reads: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            on_read: Box::new(|req| {
                Ok(ReadReply {
                    values: req.properties.iter().map(instance_value).collect(),
                })
            }),
            on_write: Box::new(|_| Ok(())),
            delay: Box::new(|_| Duration::ZERO),
        }
    }

    pub fn on_read<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ReadRequest) -> BacnetResult<ReadReply> + Send + Sync + 'static,
    {
        self.on_read = Box::new(handler);
        self
    }

    pub fn on_write<F>(mut self, handler: F) -> Self
    where
        F: Fn(&WriteRequest) -> BacnetResult<()> + Send + Sync + 'static,
    {
        self.on_write = Box::new(handler);
        self
    }

    /// Delay each read by an amount chosen per request
    pub fn with_delay<F>(mut self, delay: F) -> Self
    where
        F: Fn(&ReadRequest) -> Duration + Send + Sync + 'static,
    {
        self.delay = Box::new(delay);
        self
    }

    pub fn reads(&self) -> Vec<ReadRequest> {
        self.reads.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<WriteRequest> {
        self.writes.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.reads.lock().unwrap().len() + self.writes.lock().unwrap().len()
    }

    /// Reads currently in flight
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of reads observed in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransportProxy for FakeProxy {
    async fn read_properties(&self, request: ReadRequest) -> BacnetResult<ReadReply> {
        self.reads.lock().unwrap().push(request.clone());
        let _in_flight = InFlight::enter(&self.in_flight, &self.max_in_flight);

        let delay = (self.delay)(&request);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        (self.on_read)(&request)
    }

    async fn write_property(&self, request: WriteRequest) -> BacnetResult<()> {
        self.writes.lock().unwrap().push(request.clone());
        (self.on_write)(&request)
    }
}
