use serde::{Deserialize, Serialize};
use std::env;

/// Snapshot of the CI environment a test was recorded in
///
/// Informational only: never part of identity or merge decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SemEnv {
    pub project_id: String,
    pub pipeline_id: String,
    pub workflow_id: String,
    pub job_started_at: String,
    pub job_name: String,
    pub job_id: String,
    pub agent_type: String,
    pub agent_os_image: String,
    pub git_ref_type: String,
    pub git_ref_name: String,
    pub git_ref_sha: String,
}

impl SemEnv {
    /// Capture the snapshot from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Capture the snapshot through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).unwrap_or_default();

        Self {
            project_id: get("SEMAPHORE_PROJECT_ID"),
            pipeline_id: get("SEMAPHORE_PIPELINE_ID"),
            workflow_id: get("SEMAPHORE_WORKFLOW_ID"),
            job_started_at: get("SEMAPHORE_JOB_CREATION_TIME"),
            job_name: get("SEMAPHORE_JOB_NAME"),
            job_id: get("SEMAPHORE_JOB_ID"),
            agent_type: get("SEMAPHORE_AGENT_MACHINE_TYPE"),
            agent_os_image: get("SEMAPHORE_AGENT_MACHINE_OS_IMAGE"),
            git_ref_type: get("SEMAPHORE_GIT_REF_TYPE"),
            git_ref_name: get("SEMAPHORE_GIT_BRANCH"),
            git_ref_sha: get("SEMAPHORE_GIT_SHA"),
        }
    }
}
