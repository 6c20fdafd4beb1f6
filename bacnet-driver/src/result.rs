//! Scrape results

use bacnet_application::{PointFailure, PointResult};
use bacnet_core::PointValue;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Overall outcome of a scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeStatus {
    /// Every point has a value (or there were no points)
    Success,
    /// Some points have a value, some failed
    Partial,
    /// No point has a value
    Failure,
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScrapeStatus::Success => "success",
            ScrapeStatus::Partial => "partial",
            ScrapeStatus::Failure => "failure",
        };
        f.write_str(name)
    }
}

/// Points of one planned read group and whether the device answered it
///
/// A group is answered when every request issued for it (after any splitting)
/// returned a reply. Points of an answered group may still fail individually
/// with a decode or property error.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupResult {
    pub points: Vec<(String, PointResult)>,
    pub answered: bool,
}

impl GroupResult {
    pub fn answered(points: Vec<(String, PointResult)>) -> Self {
        Self { points, answered: true }
    }

    pub fn failed(points: Vec<(String, PointResult)>) -> Self {
        Self {
            points,
            answered: false,
        }
    }
}

/// Per-point results of one scrape, in plan order
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeResult {
    generation: u64,
    status: ScrapeStatus,
    failed_groups: usize,
    points: Vec<(String, PointResult)>,
}

impl ScrapeResult {
    /// Collect group results in plan order and derive the status
    ///
    /// `success` when every group was answered (or there were none), `failure`
    /// when none was, `partial` otherwise.
    pub fn new(generation: u64, groups: Vec<GroupResult>) -> Self {
        let failed_groups = groups.iter().filter(|g| !g.answered).count();
        let status = if failed_groups == 0 {
            ScrapeStatus::Success
        } else if failed_groups == groups.len() {
            ScrapeStatus::Failure
        } else {
            ScrapeStatus::Partial
        };
        let points = groups.into_iter().flat_map(|g| g.points).collect();
        Self {
            generation,
            status,
            failed_groups,
            points,
        }
    }

    /// Configuration generation the scrape ran against
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> ScrapeStatus {
        self.status
    }

    /// Number of read groups that got no reply
    pub fn failed_groups(&self) -> usize {
        self.failed_groups
    }

    pub fn points(&self) -> &[(String, PointResult)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Result for one point
    pub fn get(&self, name: &str) -> Option<&PointResult> {
        self.points.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    /// Successfully read values, in plan order
    pub fn values(&self) -> impl Iterator<Item = (&str, &PointValue)> {
        self.points
            .iter()
            .filter_map(|(name, r)| r.as_ref().ok().map(|v| (name.as_str(), v)))
    }

    /// Failed points, in plan order
    pub fn failures(&self) -> impl Iterator<Item = (&str, &PointFailure)> {
        self.points
            .iter()
            .filter_map(|(name, r)| r.as_ref().err().map(|f| (name.as_str(), f)))
    }
}

#[derive(Serialize)]
struct PointEntry<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a PointValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a PointFailure>,
}

impl Serialize for ScrapeResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<PointEntry<'_>> = self
            .points
            .iter()
            .map(|(name, result)| PointEntry {
                name,
                value: result.as_ref().ok(),
                error: result.as_ref().err(),
            })
            .collect();

        let mut state = serializer.serialize_struct("ScrapeResult", 3)?;
        state.serialize_field("generation", &self.generation)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("points", &entries)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        let ok = || GroupResult::answered(vec![("A".to_string(), Ok(PointValue::Float(1.0)))]);
        let failed = || GroupResult::failed(vec![("B".to_string(), Err(PointFailure::Timeout))]);

        assert_eq!(ScrapeResult::new(1, vec![]).status(), ScrapeStatus::Success);
        assert_eq!(ScrapeResult::new(1, vec![ok()]).status(), ScrapeStatus::Success);
        let partial = ScrapeResult::new(1, vec![ok(), failed()]);
        assert_eq!(partial.status(), ScrapeStatus::Partial);
        assert_eq!(partial.failed_groups(), 1);
        assert_eq!(partial.len(), 2);
        assert_eq!(ScrapeResult::new(1, vec![failed(), failed()]).status(), ScrapeStatus::Failure);
    }

    #[test]
    fn test_status_follows_groups_not_points() {
        // the device answered, every value failed to decode
        let decode_failures = GroupResult::answered(vec![
            ("A".to_string(), Err(PointFailure::Decode { message: "null".into() })),
            ("B".to_string(), Err(PointFailure::Decode { message: "null".into() })),
        ]);
        let result = ScrapeResult::new(1, vec![decode_failures]);
        assert_eq!(result.status(), ScrapeStatus::Success);
        assert_eq!(result.failures().count(), 2);
        assert_eq!(result.failed_groups(), 0);
    }

    #[test]
    fn test_accessors() {
        let result = ScrapeResult::new(
            3,
            vec![
                GroupResult::answered(vec![("A".to_string(), Ok(PointValue::Int(4)))]),
                GroupResult::failed(vec![("B".to_string(), Err(PointFailure::Superseded))]),
            ],
        );
        assert_eq!(result.get("A"), Some(&Ok(PointValue::Int(4))));
        assert_eq!(result.values().count(), 1);
        assert_eq!(result.failures().next(), Some(("B", &PointFailure::Superseded)));
    }

    #[test]
    fn test_json() {
        let result = ScrapeResult::new(
            2,
            vec![
                GroupResult::answered(vec![("Temp".to_string(), Ok(PointValue::Float(72.5)))]),
                GroupResult::failed(vec![("Fan".to_string(), Err(PointFailure::Timeout))]),
            ],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "partial");
        assert_eq!(json["points"][0]["value"], 72.5);
        assert_eq!(json["points"][1]["error"]["failure"], "timeout");
    }
}
