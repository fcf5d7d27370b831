use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::{Effect, Job, JobId, Stats};

/// Ordered job list, newest first.
///
/// Every mutation recomputes [`Stats`] and yields the persistence effect that
/// mirrors the new contents.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobStore {
    jobs: Vec<Job>,
    stats: Stats,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id() == id)
    }

    /// Time-based id (`JOB_<millis>`), suffixed when the millisecond is already taken.
    pub fn fresh_id(&self, now: DateTime<Utc>) -> JobId {
        let base = format!("JOB_{}", now.timestamp_millis());
        if self.get(&base).is_none() {
            return base;
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}_{n}");
            if self.get(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Inserts at the front. Returns `None` if the id is already present.
    pub fn prepend(&mut self, job: Job) -> Option<Effect> {
        if self.get(job.id()).is_some() {
            return None;
        }
        self.jobs.insert(0, job);
        Some(self.synced())
    }

    /// Applies `mutation` to the job with `id` in place.
    ///
    /// The mutation reports whether it changed anything; unknown ids and
    /// unchanged jobs yield no effect.
    pub fn update_by_id(
        &mut self,
        id: &str,
        mutation: impl FnOnce(&mut Job) -> bool,
    ) -> Option<Effect> {
        let job = self.jobs.iter_mut().find(|job| job.id() == id)?;
        if !mutation(job) {
            return None;
        }
        Some(self.synced())
    }

    /// Replaces the whole list, keeping the first occurrence of any duplicated id.
    pub fn replace_all(&mut self, jobs: Vec<Job>) -> Effect {
        let mut seen = HashSet::new();
        self.jobs = jobs
            .into_iter()
            .filter(|job| seen.insert(job.id().to_owned()))
            .collect();
        self.synced()
    }

    /// Empties the store; the persisted record is removed rather than overwritten.
    pub fn clear(&mut self) -> Effect {
        self.jobs.clear();
        self.stats = Stats::from_jobs(&self.jobs);
        Effect::ClearPersistedJobs
    }

    fn synced(&mut self) -> Effect {
        self.stats = Stats::from_jobs(&self.jobs);
        Effect::PersistJobs(self.jobs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).single().unwrap()
    }

    #[test]
    fn fresh_id_is_unique_within_the_same_millisecond() {
        let mut store = JobStore::new();
        let now = at(1_700_000_000_000);
        let first = store.fresh_id(now);
        store.prepend(Job::new(first.clone(), "https://a.example", now));
        let second = store.fresh_id(now);
        assert_eq!(first, "JOB_1700000000000");
        assert_eq!(second, "JOB_1700000000000_1");
    }

    #[test]
    fn prepend_rejects_duplicate_ids() {
        let mut store = JobStore::new();
        let now = at(1);
        assert!(store.prepend(Job::new("JOB_1".into(), "https://a.example", now)).is_some());
        assert!(store.prepend(Job::new("JOB_1".into(), "https://b.example", now)).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.jobs()[0].website_url(), "https://a.example");
    }

    #[test]
    fn update_of_unknown_id_is_a_noop() {
        let mut store = JobStore::new();
        store.prepend(Job::new("JOB_1".into(), "https://a.example", at(1)));
        let before = store.clone();
        assert!(store.update_by_id("JOB_404", |job| job.advance_progress(5.0)).is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn replace_all_drops_duplicate_ids_and_recomputes_stats() {
        let mut store = JobStore::new();
        let effect = store.replace_all(vec![
            Job::new("JOB_2".into(), "https://b.example", at(2)),
            Job::new("JOB_2".into(), "https://dup.example", at(2)),
            Job::new("JOB_1".into(), "https://a.example", at(1)),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().processing, 2);
        assert_eq!(effect, Effect::PersistJobs(store.jobs().to_vec()));
    }
}
