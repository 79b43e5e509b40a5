use serde::{Deserialize, Serialize};

use crate::error::DetectionError;

/// Ordered onset positions, as sample offsets into the analyzed buffer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct OnsetSet(Vec<u64>);

impl OnsetSet {
    /// Build an onset set, rejecting offsets that go backwards
    pub fn new(offsets: Vec<u64>) -> Result<Self, DetectionError> {
        if let Some(pair) = offsets.windows(2).find(|pair| pair[1] < pair[0]) {
            return Err(DetectionError::NonMonotonic {
                previous: pair[0],
                next: pair[1],
            });
        }
        Ok(Self(offsets))
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &u64> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Onset positions in seconds
    pub fn to_seconds(&self, sample_rate: u32) -> Vec<f64> {
        self.0
            .iter()
            .map(|&offset| offset as f64 / sample_rate as f64)
            .collect()
    }
}

impl TryFrom<Vec<u64>> for OnsetSet {
    type Error = DetectionError;

    fn try_from(offsets: Vec<u64>) -> Result<Self, Self::Error> {
        Self::new(offsets)
    }
}

impl From<OnsetSet> for Vec<u64> {
    fn from(onsets: OnsetSet) -> Self {
        onsets.0
    }
}

impl<'a> IntoIterator for &'a OnsetSet {
    type Item = &'a u64;
    type IntoIter = std::slice::Iter<'a, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Outcome of analyzing one file: the rate the offsets refer to and the offsets themselves
///
/// Field order is the key order of the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sample_rate: u32,
    pub onsets: OnsetSet,
}

impl AnalysisResult {
    pub fn new(sample_rate: u32, onsets: OnsetSet) -> Self {
        Self { sample_rate, onsets }
    }

    /// Onset positions in seconds
    pub fn onset_times(&self) -> Vec<f64> {
        self.onsets.to_seconds(self.sample_rate)
    }
}
