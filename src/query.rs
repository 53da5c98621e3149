use crate::models::Job;

/// Listings are shown six to a page, matching the portal's web front end.
pub const PAGE_SIZE: usize = 6;

/// Wildcard value for the category and type filters.
pub const ALL: &str = "All";

pub const CATEGORIES: [&str; 5] = ["All", "Tech", "Design", "Marketing", "Finance"];
pub const JOB_TYPES: [&str; 5] = ["All", "Full-time", "Part-time", "Contract", "Internship"];

/// The active set of user-chosen search constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub category: String,
    pub job_type: String,
    pub location: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL.to_string(),
            job_type: ALL.to_string(),
            location: String::new(),
        }
    }
}

impl FilterState {
    pub fn is_unconstrained(&self) -> bool {
        self.search.is_empty()
            && self.category == ALL
            && self.job_type == ALL
            && self.location.is_empty()
    }

    /// Search text matches title or company, case-insensitively. Category and
    /// type are exact matches with an "All" wildcard; a job with no category
    /// or type only passes the wildcard. Location is a substring match when
    /// set, unconstrained when empty.
    pub fn matches(&self, job: &Job) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = term.is_empty()
            || job.title.to_lowercase().contains(&term)
            || job.company.to_lowercase().contains(&term);

        let matches_category =
            self.category == ALL || job.category.as_deref() == Some(self.category.as_str());
        let matches_type =
            self.job_type == ALL || job.job_type.as_deref() == Some(self.job_type.as_str());

        let matches_location = self.location.is_empty()
            || job
                .location
                .as_deref()
                .is_some_and(|loc| loc.to_lowercase().contains(&self.location.to_lowercase()));

        matches_search && matches_category && matches_type && matches_location
    }
}

/// Stable filter over the full collection: keeps source order, no re-sort.
/// Recomputed from scratch on every state change.
pub fn filter_jobs<'a>(jobs: &'a [Job], filter: &FilterState) -> Vec<&'a Job> {
    jobs.iter().filter(|job| filter.matches(job)).collect()
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size)
}

/// One-based pager over a filtered collection. The current page is clamped to
/// the recomputed page count; prev/next are no-ops at the boundaries rather
/// than wrapping. Zero matches means zero pages and the indicator is not
/// rendered, so `current` is held at 1 as a resting value.
#[derive(Debug, Clone, Copy)]
pub struct Pager {
    current: usize,
    page_size: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self { current: 1, page_size }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total_pages(&self, count: usize) -> usize {
        total_pages(count, self.page_size)
    }

    /// Back to page 1. Called whenever any filter field changes.
    pub fn reset(&mut self) {
        self.current = 1;
    }

    pub fn clamp(&mut self, count: usize) {
        let total = self.total_pages(count);
        if self.current > total {
            self.current = total.max(1);
        }
    }

    pub fn next(&mut self, count: usize) -> bool {
        if self.current < self.total_pages(count) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn goto(&mut self, page: usize, count: usize) {
        self.current = page.max(1);
        self.clamp(count);
    }

    /// The visible slice for the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.current - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());
        if start >= items.len() {
            &[]
        } else {
            &items[start..end]
        }
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: i64, title: &str, company: &str, category: &str, job_type: &str) -> Job {
        Job {
            id,
            title: title.to_string(),
            company: company.to_string(),
            description: None,
            location: Some("Remote".to_string()),
            category: Some(category.to_string()),
            job_type: Some(job_type.to_string()),
            salary: None,
            posted_at: None,
            application_count: None,
        }
    }

    fn sample_jobs(n: usize) -> Vec<Job> {
        (0..n)
            .map(|i| job(i as i64, &format!("Role {}", i), "Acme", "Tech", "Full-time"))
            .collect()
    }

    #[test]
    fn test_unconstrained_filter_returns_all_in_order() {
        let jobs = sample_jobs(9);
        let filter = FilterState::default();
        assert!(filter.is_unconstrained());
        let out = filter_jobs(&jobs, &filter);
        assert_eq!(out.len(), 9);
        for (i, j) in out.iter().enumerate() {
            assert_eq!(j.id, i as i64);
        }
    }

    #[test]
    fn test_search_is_case_insensitive_on_title() {
        let jobs = vec![
            job(1, "Senior Engineer", "Acme", "Tech", "Full-time"),
            job(2, "Designer", "Studio", "Design", "Contract"),
        ];
        let filter = FilterState {
            search: "engineer".to_string(),
            ..Default::default()
        };
        let out = filter_jobs(&jobs, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Senior Engineer");
    }

    #[test]
    fn test_search_also_matches_company() {
        let jobs = vec![
            job(1, "Analyst", "DeepMind Explorer", "Finance", "Full-time"),
            job(2, "Analyst", "Acme", "Finance", "Full-time"),
        ];
        let filter = FilterState {
            search: "deepmind".to_string(),
            ..Default::default()
        };
        let out = filter_jobs(&jobs, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
    }

    #[test]
    fn test_category_and_type_are_exact_with_wildcard() {
        let jobs = vec![
            job(1, "A", "X", "Tech", "Full-time"),
            job(2, "B", "X", "Design", "Full-time"),
            job(3, "C", "X", "Tech", "Contract"),
        ];
        let filter = FilterState {
            category: "Tech".to_string(),
            ..Default::default()
        };
        let out = filter_jobs(&jobs, &filter);
        assert_eq!(out.iter().map(|j| j.id).collect::<Vec<_>>(), vec![1, 3]);

        let filter = FilterState {
            category: "Tech".to_string(),
            job_type: "Contract".to_string(),
            ..Default::default()
        };
        let out = filter_jobs(&jobs, &filter);
        assert_eq!(out.iter().map(|j| j.id).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_job_without_category_only_passes_wildcard() {
        let mut uncategorized = job(1, "A", "X", "Tech", "Full-time");
        uncategorized.category = None;
        let jobs = vec![uncategorized];

        let filter = FilterState {
            category: "Tech".to_string(),
            ..Default::default()
        };
        assert!(filter_jobs(&jobs, &filter).is_empty());
        assert_eq!(filter_jobs(&jobs, &FilterState::default()).len(), 1);
    }

    #[test]
    fn test_location_substring_when_set() {
        let mut berlin = job(1, "A", "X", "Tech", "Full-time");
        berlin.location = Some("Berlin, Germany".to_string());
        let jobs = vec![berlin, job(2, "B", "X", "Tech", "Full-time")];

        let filter = FilterState {
            location: "berlin".to_string(),
            ..Default::default()
        };
        let out = filter_jobs(&jobs, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
    }

    #[test]
    fn test_every_match_satisfies_all_predicates() {
        let jobs = vec![
            job(1, "Senior Engineer", "Acme", "Tech", "Full-time"),
            job(2, "Engineer", "Studio", "Design", "Contract"),
            job(3, "Engineering Manager", "Acme", "Tech", "Contract"),
            job(4, "Designer", "Acme", "Design", "Full-time"),
        ];
        let filter = FilterState {
            search: "engineer".to_string(),
            category: "Tech".to_string(),
            ..Default::default()
        };
        let out = filter_jobs(&jobs, &filter);
        for j in &out {
            assert!(filter.matches(j));
        }
        // and nothing satisfying was dropped
        let expected: Vec<i64> = jobs
            .iter()
            .filter(|j| filter.matches(j))
            .map(|j| j.id)
            .collect();
        assert_eq!(out.iter().map(|j| j.id).collect::<Vec<_>>(), expected);
        assert_eq!(expected, vec![1, 3]);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 6), 0);
        assert_eq!(total_pages(1, 6), 1);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(7, 6), 2);
        assert_eq!(total_pages(14, 6), 3);
    }

    #[test]
    fn test_fourteen_jobs_paginate_as_6_6_2() {
        let jobs = sample_jobs(14);
        let filtered = filter_jobs(&jobs, &FilterState::default());
        let mut pager = Pager::new(6);
        assert_eq!(pager.total_pages(filtered.len()), 3);

        assert_eq!(pager.slice(&filtered).len(), 6);
        assert!(pager.next(filtered.len()));
        assert_eq!(pager.slice(&filtered).len(), 6);
        assert!(pager.next(filtered.len()));
        assert_eq!(pager.slice(&filtered).len(), 2);

        // next at the last page is a no-op
        assert!(!pager.next(filtered.len()));
        assert_eq!(pager.current(), 3);

        // requesting page 4 clamps to 3
        pager.goto(4, filtered.len());
        assert_eq!(pager.current(), 3);
    }

    #[test]
    fn test_pages_reconstruct_collection_exactly_once() {
        let jobs = sample_jobs(14);
        let filtered = filter_jobs(&jobs, &FilterState::default());
        let mut pager = Pager::new(6);

        let mut seen: Vec<i64> = Vec::new();
        loop {
            seen.extend(pager.slice(&filtered).iter().map(|j| j.id));
            if !pager.next(filtered.len()) {
                break;
            }
        }
        let expected: Vec<i64> = filtered.iter().map(|j| j.id).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_prev_is_noop_on_first_page() {
        let mut pager = Pager::new(6);
        assert!(!pager.prev());
        assert_eq!(pager.current(), 1);
    }

    #[test]
    fn test_clamp_after_shrinking_results() {
        let mut pager = Pager::new(6);
        pager.goto(3, 14);
        assert_eq!(pager.current(), 3);
        // the filter tightened down to 4 matches
        pager.clamp(4);
        assert_eq!(pager.current(), 1);
        // and to zero: pager rests at 1, zero pages
        pager.clamp(0);
        assert_eq!(pager.current(), 1);
        assert_eq!(pager.total_pages(0), 0);
    }

    #[test]
    fn test_slice_is_empty_beyond_collection() {
        let items: Vec<u8> = (0..4).collect();
        let mut pager = Pager::new(6);
        assert_eq!(pager.slice(&items), &[0, 1, 2, 3]);
        pager.goto(2, items.len());
        // goto clamps back, so force the window manually via a bigger count
        pager.goto(2, 100);
        assert_eq!(pager.slice(&items), &[] as &[u8]);
    }
}
