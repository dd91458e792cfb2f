use super::{SemEnv, State, derive_id, nanos, trim_text};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload attached to a failed or errored test
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fault {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub body: String,
}

/// A single test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Test {
    /// Derived ID, see `Test::ensure_id`
    pub id: Uuid,
    /// `id` attribute read from the source report, if any
    #[serde(skip)]
    pub source_id: String,
    pub file: String,
    pub classname: String,
    pub package: String,
    pub name: String,
    #[serde(with = "nanos")]
    pub duration: Duration,
    pub state: State,
    pub failure: Option<Fault>,
    pub error: Option<Fault>,
    pub system_out: String,
    pub system_err: String,
    #[serde(rename = "semaphoreEnv")]
    pub sem_env: SemEnv,
}

impl Default for Test {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            source_id: String::new(),
            file: String::new(),
            classname: String::new(),
            package: String::new(),
            name: String::new(),
            duration: Duration::zero(),
            state: State::Passed,
            failure: None,
            error: None,
            system_out: String::new(),
            system_err: String::new(),
            sem_env: SemEnv::default(),
        }
    }
}

impl Test {
    /// Create a passing test carrying an environment snapshot
    pub fn new(name: impl Into<String>, sem_env: SemEnv) -> Self {
        Self {
            name: name.into(),
            sem_env,
            ..Self::default()
        }
    }

    /// String hashed into the owning suite's ID to produce `id`
    pub fn identity(&self) -> String {
        // Unit separator keeps "a"+"b.c" distinct from "a.b"+"c".
        [
            self.source_id.as_str(),
            &self.name,
            &self.classname,
            &self.package,
            &self.file,
        ]
        .join("\u{1f}")
    }

    /// Derive `id` from the identity fields and the owning suite's ID
    pub fn ensure_id(&mut self, suite_id: &Uuid) {
        self.id = derive_id(suite_id, &self.identity());
    }

    /// Mark as failed with the given payload
    pub fn fail(&mut self, fault: Fault) {
        self.state = State::Failed;
        self.failure = Some(fault);
    }

    /// Mark as errored with the given payload
    pub fn error(&mut self, fault: Fault) {
        self.state = State::Error;
        self.error = Some(fault);
    }

    /// Whether an incoming record with the same ID should replace this one
    ///
    /// A skip carries no information and is always superseded. A pass is
    /// superseded by a failure or an error. Failures and errors are sticky.
    pub fn superseded_by(&self, incoming: &Test) -> bool {
        match self.state {
            State::Skipped => true,
            State::Passed => matches!(incoming.state, State::Failed | State::Error),
            _ => false,
        }
    }

    pub(crate) fn trim_output(&mut self, max_chars: usize) {
        trim_text(&mut self.system_out, max_chars);
        trim_text(&mut self.system_err, max_chars);
    }
}
