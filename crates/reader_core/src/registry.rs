use crate::{JobId, JobState};

/// Jobs currently queued or in progress, in the order they were first registered.
///
/// The registry trusts its callers: states are stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobRegistry {
    jobs: Vec<(JobId, JobState)>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the state for `id`, or appends it when the id is new.
    pub fn upsert(&mut self, id: &str, state: JobState) {
        match self.jobs.iter_mut().find(|(job_id, _)| job_id == id) {
            Some((_, existing)) => *existing = state,
            None => self.jobs.push((id.to_string(), state)),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<JobState> {
        let index = self.jobs.iter().position(|(job_id, _)| job_id == id)?;
        Some(self.jobs.remove(index).1)
    }

    pub fn all(&self) -> impl Iterator<Item = (&JobId, &JobState)> {
        self.jobs.iter().map(|(id, state)| (id, state))
    }

    pub fn get(&self, id: &str) -> Option<&JobState> {
        self.jobs
            .iter()
            .find(|(job_id, _)| job_id == id)
            .map(|(_, state)| state)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<JobId> {
        self.jobs.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JobStatus, Progress};

    fn running(done: u64, total: u64) -> JobState {
        JobState {
            status: JobStatus::InProgress("started".into()),
            progress: Progress {
                done,
                total,
                note: String::new(),
            },
            result: None,
            error: None,
        }
    }

    #[test]
    fn upsert_keeps_first_insertion_position() {
        let mut registry = JobRegistry::new();
        registry.upsert("b", JobState::queued());
        registry.upsert("a", JobState::queued());
        registry.upsert("b", running(1, 2));

        assert_eq!(registry.ids(), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(registry.get("b"), Some(&running(1, 2)));
    }

    #[test]
    fn remove_returns_the_dropped_state() {
        let mut registry = JobRegistry::new();
        registry.upsert("a", running(0, 3));

        assert_eq!(registry.remove("a"), Some(running(0, 3)));
        assert_eq!(registry.remove("a"), None);
        assert!(registry.is_empty());
    }
}
