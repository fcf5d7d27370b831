use crate::{Job, JobStatus};

/// Summary counters derived from the job list. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub processing: usize,
    /// Mean elapsed seconds over completed jobs with an end time; 0 when there are none.
    pub avg_time_secs: f64,
}

impl Stats {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        let mut stats = Stats {
            total: jobs.len(),
            ..Stats::default()
        };
        let mut elapsed_sum = 0.0;
        let mut timed = 0usize;
        for job in jobs {
            match job.status() {
                JobStatus::Processing => stats.processing += 1,
                JobStatus::Failed => stats.failed += 1,
                JobStatus::Completed => {
                    stats.completed += 1;
                    if let Some(elapsed) = job.elapsed_secs() {
                        elapsed_sum += elapsed;
                        timed += 1;
                    }
                }
            }
        }
        if timed > 0 {
            stats.avg_time_secs = elapsed_sum / timed as f64;
        }
        stats
    }

    /// Completed share of all jobs as a rounded percentage.
    pub fn success_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}
