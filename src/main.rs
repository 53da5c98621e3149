mod api;
mod models;
mod query;
mod session;
mod state;
mod tui;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use api::{PortalClient, DEFAULT_BASE_URL};
use models::{load_jobs_file, ApplicationForm, Job, JobDraft, APPLICATION_STATUSES};
use query::{filter_jobs, FilterState, Pager};
use session::{Session, SessionStore};
use tui::JobSource;

#[derive(Parser)]
#[command(name = "openings")]
#[command(about = "Job portal client - browse, apply, and manage postings from the terminal")]
struct Cli {
    /// Base URL of the portal API (or set OPENINGS_API)
    #[arg(long, global = true)]
    api: Option<String>,

    /// Load jobs from a local JSON file instead of the API
    #[arg(long, global = true)]
    jobs_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse jobs interactively
    Browse {
        /// Initial search text
        #[arg(short, long, default_value = "")]
        search: String,

        /// Initial category filter
        #[arg(short, long, default_value = "All")]
        category: String,

        /// Initial job type filter
        #[arg(short = 't', long, default_value = "All")]
        job_type: String,

        /// Initial location filter
        #[arg(short, long, default_value = "")]
        location: String,
    },

    /// List jobs
    List {
        /// Search text (matches title or company)
        #[arg(short, long, default_value = "")]
        search: String,

        /// Category filter ("All" = no constraint)
        #[arg(short, long, default_value = "All")]
        category: String,

        /// Job type filter ("All" = no constraint)
        #[arg(short = 't', long, default_value = "All")]
        job_type: String,

        /// Location filter
        #[arg(short, long, default_value = "")]
        location: String,

        /// Page to show
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Push the filters to the API instead of filtering locally
        #[arg(long)]
        remote: bool,
    },

    /// Show job details
    Show {
        /// Job ID
        id: i64,
    },

    /// Post a new job
    Post {
        /// Job title
        title: String,

        /// Company name
        company: String,

        #[arg(short, long, default_value = "")]
        category: String,

        #[arg(short, long, default_value = "")]
        salary: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short = 't', long, default_value = "Full-time")]
        job_type: String,

        #[arg(short, long, default_value = "Remote")]
        location: String,
    },

    /// Apply to a job
    Apply {
        /// Job ID
        job_id: i64,

        /// Applicant name
        #[arg(short, long)]
        name: String,

        /// Applicant email
        #[arg(short, long)]
        email: String,
    },

    /// Log in (unlocks the admin and employer views)
    Login {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored login
    Logout,

    /// List applications (admin)
    Candidates,

    /// Update an application's status (admin)
    SetStatus {
        /// Application ID
        id: i64,

        /// New status (Pending, Accepted, Rejected)
        status: String,
    },

    /// Delete a job posting (admin)
    Delete {
        /// Job ID
        id: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base_url = cli
        .api
        .clone()
        .or_else(|| std::env::var("OPENINGS_API").ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let client = PortalClient::new(base_url);

    match cli.command {
        Commands::Browse {
            search,
            category,
            job_type,
            location,
        } => {
            let filter = FilterState {
                search,
                category,
                job_type,
                location,
            };
            let source = match cli.jobs_file {
                Some(path) => JobSource::File(path),
                None => JobSource::Api(client.clone()),
            };
            tui::run(client, source, filter)?;
        }

        Commands::List {
            search,
            category,
            job_type,
            location,
            page,
            remote,
        } => {
            let filter = FilterState {
                search,
                category,
                job_type,
                location,
            };
            let jobs = if remote {
                let constraints = (!filter.is_unconstrained()).then_some(&filter);
                client.jobs(constraints)?
            } else {
                load_store(&client, cli.jobs_file.as_deref())?
            };
            let filtered: Vec<&Job> = if remote {
                jobs.iter().collect()
            } else {
                filter_jobs(&jobs, &filter)
            };

            if filtered.is_empty() {
                println!("No matches found.");
            } else {
                let mut pager = Pager::default();
                pager.goto(page, filtered.len());
                let visible = pager.slice(&filtered);

                println!(
                    "{:<6} {:<32} {:<20} {:<16} {:<12} {:>14}",
                    "ID", "TITLE", "COMPANY", "LOCATION", "TYPE", "SALARY"
                );
                println!("{}", "-".repeat(104));
                for job in visible {
                    println!(
                        "{:<6} {:<32} {:<20} {:<16} {:<12} {:>14}",
                        job.id,
                        truncate(&job.title, 30),
                        truncate(&job.company, 18),
                        truncate(job.location.as_deref().unwrap_or("Remote"), 14),
                        truncate(job.job_type.as_deref().unwrap_or("Full-time"), 10),
                        truncate(job.salary.as_deref().unwrap_or("Negotiable"), 12),
                    );
                }
                println!(
                    "\npage {}/{} ({} matching)",
                    pager.current(),
                    pager.total_pages(filtered.len()),
                    filtered.len()
                );
            }
        }

        Commands::Show { id } => {
            let job = match cli.jobs_file.as_deref() {
                Some(path) => load_jobs_file(path)?
                    .into_iter()
                    .find(|job| job.id == id)
                    .ok_or_else(|| anyhow!("Job #{} not found", id))?,
                None => client.job(id)?,
            };
            println!("Job #{}", job.id);
            println!("Title: {}", job.title);
            println!("Company: {}", job.company);
            if let Some(location) = &job.location {
                println!("Location: {}", location);
            }
            if let Some(category) = &job.category {
                println!("Category: {}", category);
            }
            if let Some(job_type) = &job.job_type {
                println!("Type: {}", job_type);
            }
            if let Some(salary) = &job.salary {
                println!("Salary: {}", salary);
            }
            if let Some(posted_at) = &job.posted_at {
                println!("Posted: {}", posted_at);
            }
            if let Some(count) = job.application_count {
                println!("Applications: {}", count);
            }
            if let Some(description) = &job.description {
                println!("\n{}", description);
            }
        }

        Commands::Post {
            title,
            company,
            category,
            salary,
            description,
            job_type,
            location,
        } => {
            if title.trim().is_empty() || company.trim().is_empty() {
                return Err(anyhow!("Title and company are required"));
            }
            let draft = JobDraft {
                title,
                company,
                category,
                salary,
                description,
                job_type,
                location,
            };
            let job = client.post_job(&draft)?;
            println!("Posted job #{} - {}", job.id, job.title);
        }

        Commands::Apply { job_id, name, email } => {
            if name.trim().is_empty() || email.trim().is_empty() {
                return Err(anyhow!("Name and email are required"));
            }
            let form = ApplicationForm {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
            };
            client.apply(job_id, &form)?;
            println!("Application submitted for job #{}", job_id);
        }

        Commands::Login { username, password } => {
            // Local stub first; only unknown credentials go to the API.
            let role = match session::check_credentials(&username, &password) {
                Some(role) => role,
                None => client.login(&username, &password)?,
            };
            let store = SessionStore::open()?;
            store.save(&Session {
                role: Some(role),
                username: Some(username.clone()),
            })?;
            println!("Signed in as {} ({})", username, role.label());
        }

        Commands::Logout => {
            let store = SessionStore::open()?;
            store.clear()?;
            println!("Signed out.");
        }

        Commands::Candidates => {
            require_admin()?;
            let candidates = client.candidates()?;
            if candidates.is_empty() {
                println!("No applications yet.");
            } else {
                println!(
                    "{:<6} {:<9} {:<20} {:<26} {:<24} {:<12}",
                    "ID", "STATUS", "NAME", "EMAIL", "JOB", "APPLIED"
                );
                println!("{}", "-".repeat(99));
                for candidate in candidates {
                    println!(
                        "{:<6} {:<9} {:<20} {:<26} {:<24} {:<12}",
                        candidate.id,
                        candidate.status,
                        truncate(&candidate.name, 18),
                        truncate(&candidate.email, 24),
                        truncate(candidate.job_title.as_deref().unwrap_or("-"), 22),
                        truncate(candidate.applied_at.as_deref().unwrap_or("-"), 10),
                    );
                }
            }
        }

        Commands::SetStatus { id, status } => {
            require_admin()?;
            if !APPLICATION_STATUSES.contains(&status.as_str()) {
                return Err(anyhow!(
                    "Unknown status '{}'. Valid: {}",
                    status,
                    APPLICATION_STATUSES.join(", ")
                ));
            }
            client.set_application_status(id, &status)?;
            println!("Application #{} marked {}", id, status);
        }

        Commands::Delete { id } => {
            require_admin()?;
            client.delete_job(id)?;
            println!("Deleted job #{}", id);
        }
    }

    Ok(())
}

fn load_store(client: &PortalClient, jobs_file: Option<&std::path::Path>) -> Result<Vec<Job>> {
    match jobs_file {
        Some(path) => load_jobs_file(path),
        None => client.jobs(None),
    }
}

/// The admin gate is a client-held flag, a UX convenience only; the API
/// itself does not check it.
fn require_admin() -> Result<()> {
    let store = SessionStore::open()?;
    if store.load().is_admin() {
        Ok(())
    } else {
        Err(anyhow!("Admin access required. Run 'openings login' first."))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}
