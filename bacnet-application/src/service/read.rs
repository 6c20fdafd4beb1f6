//! Read batching
//!
//! [`BatchPlanner`] partitions a point map into [`ReadGroup`]s, each small enough
//! to come back in one reply. Planning is pure: no I/O, no clock, and the same
//! input always yields the same plan.

use crate::encoding::{estimate_register, read_budget};
use bacnet_core::{DeviceConfig, PropertyReference};
use bacnet_interface::{PointMap, RegisterModel};
use std::sync::Arc;

/// Registers read together in one request
#[derive(Debug, Clone, Default)]
pub struct ReadGroup {
    registers: Vec<Arc<RegisterModel>>,
    estimated_size: usize,
    must_succeed_unsegmented: bool,
}

impl ReadGroup {
    /// Create a group from registers, estimating its size
    pub fn new(registers: Vec<Arc<RegisterModel>>) -> Self {
        let estimated_size = registers.iter().map(|r| estimate_register(r)).sum();
        Self {
            registers,
            estimated_size,
            must_succeed_unsegmented: false,
        }
    }

    /// Group holding a single register
    pub fn single(register: Arc<RegisterModel>) -> Self {
        Self::new(vec![register])
    }

    fn flagged(mut self, must_succeed_unsegmented: bool) -> Self {
        self.must_succeed_unsegmented = must_succeed_unsegmented;
        self
    }

    pub fn registers(&self) -> &[Arc<RegisterModel>] {
        &self.registers
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    pub fn estimated_size(&self) -> usize {
        self.estimated_size
    }

    /// Set for an oversized singleton on a device that cannot segment replies;
    /// the read may still fail on the device side
    pub fn must_succeed_unsegmented(&self) -> bool {
        self.must_succeed_unsegmented
    }

    /// Point names in request order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.registers.iter().map(|r| r.name())
    }

    /// Wire references in request order
    pub fn references(&self) -> Vec<PropertyReference> {
        self.registers.iter().map(|r| r.reference()).collect()
    }

    /// Split into two halves (first half gets the smaller share on odd lengths)
    ///
    /// Returns `None` for groups of fewer than two registers.
    pub fn split(&self) -> Option<(ReadGroup, ReadGroup)> {
        if self.registers.len() < 2 {
            return None;
        }
        let mid = self.registers.len() / 2;
        let (left, right) = self.registers.split_at(mid);
        Some((ReadGroup::new(left.to_vec()), ReadGroup::new(right.to_vec())))
    }
}

/// Ordered read groups covering every register of a point map exactly once
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    groups: Vec<ReadGroup>,
    budget: usize,
}

impl BatchPlan {
    pub fn groups(&self) -> &[ReadGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Size budget the plan was built against
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Number of registers across all groups
    pub fn register_count(&self) -> usize {
        self.groups.iter().map(ReadGroup::len).sum()
    }
}

/// Greedy request batcher
pub struct BatchPlanner;

impl BatchPlanner {
    /// Plan read groups for a point map
    ///
    /// Registers are taken in declaration order; a group closes when the next
    /// register would push it over the size budget or over `max_per_request`.
    /// A register that alone exceeds the budget gets a group of its own.
    pub fn plan(points: &PointMap, device: &DeviceConfig) -> BatchPlan {
        let budget = read_budget(device);
        let per_request = device.max_per_request.unwrap_or(usize::MAX).max(1);
        let oversized_flag = !device.segmentation.can_transmit();

        let mut groups = Vec::with_capacity(points.len() / 8 + 1);
        let mut current: Vec<Arc<RegisterModel>> = Vec::new();
        let mut current_size = 0usize;

        for register in points.iter() {
            let size = estimate_register(register);

            if size > budget {
                if !current.is_empty() {
                    groups.push(ReadGroup::new(std::mem::take(&mut current)));
                    current_size = 0;
                }
                log::debug!(
                    "Point {} ({} bytes) exceeds the {} byte budget, reading it alone",
                    register.name(),
                    size,
                    budget
                );
                groups.push(ReadGroup::single(register.clone()).flagged(oversized_flag));
                continue;
            }

            if !current.is_empty() && (current_size + size > budget || current.len() >= per_request) {
                groups.push(ReadGroup::new(std::mem::take(&mut current)));
                current_size = 0;
            }
            current.push(register.clone());
            current_size += size;
        }
        if !current.is_empty() {
            groups.push(ReadGroup::new(current));
        }

        BatchPlan { groups, budget }
    }
}
