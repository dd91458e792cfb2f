use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Outcome of a single test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Passed,
    Failed,
    Error,
    Skipped,
    Disabled,
}

/// Whether a `TestResults` was parsed successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Success,
    Error,
}

/// Aggregated counters for a suite or a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub skipped: usize,
    pub error: usize,
    pub failed: usize,
    pub disabled: usize,
    /// Wall-clock or summed duration, serialized in nanoseconds
    #[serde(with = "nanos")]
    pub duration: Duration,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            total: 0,
            passed: 0,
            skipped: 0,
            error: 0,
            failed: 0,
            disabled: 0,
            duration: Duration::zero(),
        }
    }
}

impl Summary {
    /// Count one test in the given state
    pub fn count(&mut self, state: State) {
        self.total += 1;
        match state {
            State::Passed => self.passed += 1,
            State::Failed => self.failed += 1,
            State::Error => self.error += 1,
            State::Skipped => self.skipped += 1,
            State::Disabled => self.disabled += 1,
        }
    }

    /// Add every counter and the duration of `other`
    pub fn merge(&mut self, other: &Summary) {
        self.total += other.total;
        self.passed += other.passed;
        self.skipped += other.skipped;
        self.error += other.error;
        self.failed += other.failed;
        self.disabled += other.disabled;
        self.duration = self.duration + other.duration;
    }
}

/// Serde adapter storing a `chrono::Duration` as signed nanoseconds
pub(crate) mod nanos {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = value.num_nanoseconds().unwrap_or(if *value < Duration::zero() {
            i64::MIN
        } else {
            i64::MAX
        });
        serializer.serialize_i64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        i64::deserialize(deserializer).map(Duration::nanoseconds)
    }
}
