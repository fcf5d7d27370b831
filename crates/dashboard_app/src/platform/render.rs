use dashboard_core::{AppViewModel, JobRowView, JobStatus};

pub fn render(view: &AppViewModel) -> Vec<String> {
    let stats = &view.stats;
    let mut lines = vec![
        "=== Employer Profile Automation ===".to_string(),
        format!(
            "Total: {} | Completed: {} | Processing: {} | Failed: {} | Avg Time: {:.1}s | Success Rate: {}%",
            stats.total,
            stats.completed,
            stats.processing,
            stats.failed,
            stats.avg_time_secs,
            view.success_rate
        ),
        format!("Webhook: {}", view.webhook_url),
    ];

    if view.submitting {
        lines.push("Submitting...".to_string());
    }
    if let Some(error) = &view.last_error {
        lines.push(format!("! {error}"));
    }
    if view.confirm_clear_pending {
        lines.push("Are you sure you want to clear all job history? (yes/no)".to_string());
    }

    if view.jobs.is_empty() {
        lines.push("No jobs yet. Submit a company website to get started.".to_string());
    } else {
        lines.push(format!("Recent jobs ({} total):", view.jobs.len()));
        for row in &view.jobs {
            lines.extend(render_row(row));
        }
    }
    lines
}

/// One status line per running job, for progress-only refreshes.
pub fn render_progress(view: &AppViewModel) -> Vec<String> {
    view.jobs
        .iter()
        .filter(|row| row.status == JobStatus::Processing)
        .map(|row| format!("  ... {} {:.0}%", row.label, row.progress))
        .collect()
}

fn render_row(row: &JobRowView) -> Vec<String> {
    let marker = match row.status {
        JobStatus::Processing => "[..]",
        JobStatus::Completed => "[ok]",
        JobStatus::Failed => "[!!]",
    };
    let mut lines = vec![format!(
        "{marker} {} <{}> {} ({})",
        row.label, row.website_url, row.duration, row.job_id
    )];
    match row.status {
        JobStatus::Processing => lines.push(format!("     progress {:.0}%", row.progress)),
        JobStatus::Completed => {
            if let Some(url) = &row.drive_folder_url {
                lines.push(format!("     Drive folder: {url}"));
            }
            if let Some(url) = &row.doc_url {
                lines.push(format!("     Google Doc: {url}"));
            }
        }
        JobStatus::Failed => {
            if let Some(error) = &row.error {
                lines.push(format!("     Error: {error}"));
            }
        }
    }
    lines
}
