use std::time::{Duration, Instant};

use crate::models::{ApplicationForm, Candidate, Job, JobDraft, Role};
use crate::query::{filter_jobs, FilterState, Pager, CATEGORIES, JOB_TYPES};

/// How long a closed modal keeps rendering in its fading state. The web
/// front end hid modals 300 ms after removing the active class so the exit
/// transition could play; callers must not assume a modal is gone
/// synchronously after closing it.
pub const MODAL_TEARDOWN: Duration = Duration::from_millis(300);

const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Top-level UI modes. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Seeker,
    Admin,
    Employer,
}

/// Overlay dialogs. At most one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Login,
    Register,
    JobDetail,
    Apply,
}

/// Backing data a view owes a refetch for after being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Jobs,
    Candidates,
}

/// Enforces the one-visible-modal invariant: opening a modal closes every
/// other one first. A closed modal lingers in a closing state until its
/// teardown deadline passes.
#[derive(Debug, Default)]
pub struct ModalController {
    open: Option<Modal>,
    closing: Option<(Modal, Instant)>,
}

impl ModalController {
    pub fn open(&mut self, modal: Modal) {
        self.close_all();
        self.open = Some(modal);
    }

    pub fn close_all(&mut self) {
        if let Some(modal) = self.open.take() {
            self.closing = Some((modal, Instant::now() + MODAL_TEARDOWN));
        }
    }

    /// The modal receiving input, if any.
    pub fn visible(&self) -> Option<Modal> {
        self.open
    }

    /// What should still be drawn: the open modal, or one mid-teardown.
    /// The bool is true while the modal is fading out.
    pub fn rendered(&self) -> Option<(Modal, bool)> {
        if let Some(modal) = self.open {
            return Some((modal, false));
        }
        self.closing.map(|(modal, _)| (modal, true))
    }

    pub fn tick(&mut self) {
        if let Some((_, deadline)) = self.closing {
            if Instant::now() >= deadline {
                self.closing = None;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Transient toast line. Newest wins; expired notices disappear on tick.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    expires_at: Instant,
}

// --- Form buffers ---
//
// Each form keeps its field values and an in-flight flag. A failed
// submission re-enables the control and leaves every field untouched so the
// user can retry manually; only success resets the form.

#[derive(Debug, Default, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: usize,
    pub submitting: bool,
}

impl LoginForm {
    pub const FIELDS: usize = 2;

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err("Please enter credentials");
        }
        Ok(())
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.username,
            _ => &mut self.password,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Default, Clone)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub focus: usize,
}

impl RegisterForm {
    pub const FIELDS: usize = 3;

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            return Err("All fields are required");
        }
        Ok(())
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.name,
            1 => &mut self.email,
            _ => &mut self.password,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Default, Clone)]
pub struct ApplyForm {
    pub name: String,
    pub email: String,
    pub focus: usize,
    pub submitting: bool,
}

impl ApplyForm {
    pub const FIELDS: usize = 2;

    pub fn validate(&self) -> Result<ApplicationForm, &'static str> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err("Name and email are required");
        }
        Ok(ApplicationForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        })
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.name,
            _ => &mut self.email,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Default, Clone)]
pub struct PostJobForm {
    pub title: String,
    pub company: String,
    pub category: String,
    pub salary: String,
    pub description: String,
    pub focus: usize,
    pub submitting: bool,
}

impl PostJobForm {
    pub const FIELDS: usize = 5;

    pub fn validate(&self) -> Result<JobDraft, &'static str> {
        if self.title.trim().is_empty() || self.company.trim().is_empty() {
            return Err("Title and company are required");
        }
        Ok(JobDraft {
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            category: self.category.trim().to_string(),
            salary: self.salary.trim().to_string(),
            description: self.description.trim().to_string(),
            ..JobDraft::default()
        })
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.title,
            1 => &mut self.company,
            2 => &mut self.category,
            3 => &mut self.salary,
            _ => &mut self.description,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The whole client state, owned by the UI loop and passed by reference to
/// the pure filter and pagination helpers. No ambient globals.
pub struct AppState {
    // Seeker-side job store: replaced wholesale on every fetch.
    pub jobs: Vec<Job>,
    pub jobs_error: Option<String>,
    pub jobs_loading: bool,
    pub filter: FilterState,
    pub pager: Pager,
    pub selected: usize,

    // Admin-side candidate store.
    pub candidates: Vec<Candidate>,
    pub candidates_error: Option<String>,
    pub candidates_loading: bool,
    pub candidate_selected: usize,

    pub view: View,
    pub modals: ModalController,
    pub role: Option<Role>,

    pub login: LoginForm,
    pub register: RegisterForm,
    pub apply: ApplyForm,
    pub post: PostJobForm,
    /// Job the apply modal is targeting.
    pub apply_target: Option<i64>,

    /// Search bar has keyboard focus.
    pub searching: bool,

    notice: Option<Notice>,
}

impl AppState {
    pub fn new(role: Option<Role>, filter: FilterState) -> Self {
        Self {
            jobs: Vec::new(),
            jobs_error: None,
            jobs_loading: false,
            filter,
            pager: Pager::default(),
            selected: 0,
            candidates: Vec::new(),
            candidates_error: None,
            candidates_loading: false,
            candidate_selected: 0,
            view: View::Seeker,
            modals: ModalController::default(),
            role,
            login: LoginForm::default(),
            register: RegisterForm::default(),
            apply: ApplyForm::default(),
            post: PostJobForm::default(),
            apply_target: None,
            searching: false,
            notice: None,
        }
    }

    // --- Job store ---

    /// Replace the store wholesale with a fetch result. A late response for
    /// a view the user already left still lands here; last response wins.
    pub fn jobs_loaded(&mut self, result: Result<Vec<Job>, String>) {
        self.jobs_loading = false;
        match result {
            Ok(jobs) => {
                self.jobs = jobs;
                self.jobs_error = None;
            }
            Err(message) => {
                self.jobs_error = Some(message);
            }
        }
        let count = self.filtered().len();
        self.pager.clamp(count);
        self.selected = 0;
    }

    pub fn candidates_loaded(&mut self, result: Result<Vec<Candidate>, String>) {
        self.candidates_loading = false;
        match result {
            Ok(candidates) => {
                self.candidates = candidates;
                self.candidates_error = None;
            }
            Err(message) => {
                self.candidates_error = Some(message);
            }
        }
        self.candidate_selected = 0;
    }

    pub fn filtered(&self) -> Vec<&Job> {
        filter_jobs(&self.jobs, &self.filter)
    }

    pub fn selected_job<'a>(&self, page: &'a [&'a Job]) -> Option<&'a Job> {
        page.get(self.selected).copied()
    }

    pub fn job_by_id(&self, id: i64) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    /// Total postings and total applications across them, for the employer
    /// dashboard header.
    pub fn employer_stats(&self) -> (usize, u32) {
        let applications = self
            .jobs
            .iter()
            .filter_map(|job| job.application_count)
            .sum();
        (self.jobs.len(), applications)
    }

    // --- Filter mutations (each one resets pagination to page 1) ---

    fn filter_changed(&mut self) {
        self.pager.reset();
        self.selected = 0;
    }

    pub fn search_push(&mut self, ch: char) {
        self.filter.search.push(ch);
        self.filter_changed();
    }

    pub fn search_pop(&mut self) {
        self.filter.search.pop();
        self.filter_changed();
    }

    pub fn search_clear(&mut self) {
        if !self.filter.search.is_empty() {
            self.filter.search.clear();
            self.filter_changed();
        }
    }

    pub fn cycle_category(&mut self) {
        self.filter.category = next_choice(&CATEGORIES, &self.filter.category);
        self.filter_changed();
    }

    pub fn cycle_job_type(&mut self) {
        self.filter.job_type = next_choice(&JOB_TYPES, &self.filter.job_type);
        self.filter_changed();
    }

    // --- Pagination and selection ---

    pub fn page_next(&mut self) {
        let count = self.filtered().len();
        if self.pager.next(count) {
            self.selected = 0;
        }
    }

    pub fn page_prev(&mut self) {
        if self.pager.prev() {
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self, page_len: usize) {
        if page_len > 0 && self.selected + 1 < page_len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_candidate_next(&mut self) {
        if !self.candidates.is_empty() && self.candidate_selected + 1 < self.candidates.len() {
            self.candidate_selected += 1;
        }
    }

    pub fn select_candidate_prev(&mut self) {
        self.candidate_selected = self.candidate_selected.saturating_sub(1);
    }

    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.candidates.get(self.candidate_selected)
    }

    // --- View switching ---

    /// Switch the active view. Admin is gated by the client-held role flag
    /// (a UX gate only). Entering admin or employer owes a refresh fetch of
    /// that view's backing data; the caller spawns it.
    pub fn switch_view(&mut self, target: View) -> Option<Refresh> {
        if target == View::Admin && self.role != Some(Role::Admin) {
            self.notify_error("Admin access requires the admin login");
            return None;
        }
        if self.view == target {
            return None;
        }
        self.view = target;
        // the viewport scrolls back to the top of the new view
        self.selected = 0;
        self.candidate_selected = 0;
        match target {
            View::Admin => Some(Refresh::Candidates),
            View::Employer => Some(Refresh::Jobs),
            View::Seeker => None,
        }
    }

    // --- Login / logout ---

    pub fn login_succeeded(&mut self, role: Role) -> Option<Refresh> {
        self.modals.close_all();
        self.login.reset();
        self.role = Some(role);
        self.notify_info(format!("Signed in ({})", role.label()));
        let target = match role {
            Role::Admin => View::Admin,
            Role::Employer => View::Employer,
            Role::Seeker => View::Seeker,
        };
        self.switch_view(target)
    }

    pub fn login_failed(&mut self, message: impl Into<String>) {
        self.login.submitting = false;
        self.notify_error(message);
    }

    pub fn logout(&mut self) {
        self.role = None;
        if self.view != View::Seeker {
            self.switch_view(View::Seeker);
        }
        self.notify_info("Signed out");
    }

    // --- Apply flow ---

    pub fn open_apply(&mut self, job_id: i64) {
        self.apply_target = Some(job_id);
        self.modals.open(Modal::Apply);
    }

    pub fn apply_succeeded(&mut self) {
        self.apply.reset();
        self.apply_target = None;
        self.modals.close_all();
        self.notify_info("Application submitted");
    }

    pub fn apply_failed(&mut self, message: impl Into<String>) {
        self.apply.submitting = false;
        self.notify_error(message);
    }

    // --- Post-job flow ---

    pub fn post_succeeded(&mut self, job: &Job) {
        self.post.reset();
        self.notify_info(format!("Posted \"{}\"", job.title));
    }

    pub fn post_failed(&mut self, message: impl Into<String>) {
        self.post.submitting = false;
        self.notify_error(message);
    }

    // --- Register flow (client-side acknowledgement only, no API call) ---

    pub fn register_submit(&mut self) {
        match self.register.validate() {
            Ok(()) => {
                self.register.reset();
                self.modals.close_all();
                self.notify_info("Registration successful. Please log in.");
            }
            Err(message) => self.notify_error(message),
        }
    }

    // --- Candidate status ---

    pub fn candidate_status_set(&mut self, id: i64, status: &str) {
        if let Some(candidate) = self.candidates.iter_mut().find(|c| c.id == id) {
            candidate.status = status.to_string();
        }
        self.notify_info(format!("Marked as {}", status));
    }

    // --- Notices ---

    pub fn notify_info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            kind: NoticeKind::Info,
            expires_at: Instant::now() + NOTICE_TTL,
        });
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            kind: NoticeKind::Error,
            expires_at: Instant::now() + NOTICE_TTL,
        });
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Expire the notice and finish modal teardowns. Called once per event
    /// loop iteration.
    pub fn tick(&mut self) {
        if let Some(notice) = &self.notice {
            if Instant::now() >= notice.expires_at {
                self.notice = None;
            }
        }
        self.modals.tick();
    }
}

fn next_choice(choices: &[&str], current: &str) -> String {
    let index = choices.iter().position(|c| *c == current).unwrap_or(0);
    choices[(index + 1) % choices.len()].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: i64, title: &str, category: &str) -> Job {
        Job {
            id,
            title: title.to_string(),
            company: "Acme".to_string(),
            description: None,
            location: Some("Remote".to_string()),
            category: Some(category.to_string()),
            job_type: Some("Full-time".to_string()),
            salary: None,
            posted_at: None,
            application_count: Some(1),
        }
    }

    fn state_with_jobs(n: usize) -> AppState {
        let mut state = AppState::new(None, FilterState::default());
        let jobs = (0..n)
            .map(|i| job(i as i64, &format!("Role {}", i), "Tech"))
            .collect();
        state.jobs_loaded(Ok(jobs));
        state
    }

    #[test]
    fn test_initial_view_is_seeker() {
        let state = AppState::new(None, FilterState::default());
        assert_eq!(state.view, View::Seeker);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut state = state_with_jobs(14);
        state.page_next();
        assert_eq!(state.pager.current(), 2);

        state.search_push('r');
        assert_eq!(state.pager.current(), 1);

        state.page_next();
        state.cycle_category();
        assert_eq!(state.pager.current(), 1);

        state.page_next();
        state.cycle_job_type();
        assert_eq!(state.pager.current(), 1);
    }

    #[test]
    fn test_page_never_exceeds_recomputed_count() {
        let mut state = state_with_jobs(14);
        state.page_next();
        state.page_next();
        assert_eq!(state.pager.current(), 3);

        // a refetch shrinks the store; the page clamps
        state.jobs_loaded(Ok((0..4).map(|i| job(i, "Role", "Tech")).collect()));
        let total = state.pager.total_pages(state.filtered().len());
        assert!(state.pager.current() <= total.max(1));
        assert_eq!(state.pager.current(), 1);
    }

    #[test]
    fn test_store_replaced_wholesale() {
        let mut state = state_with_jobs(3);
        state.jobs_loaded(Ok(vec![job(99, "Only", "Tech")]));
        assert_eq!(state.jobs.len(), 1);
        assert_eq!(state.jobs[0].id, 99);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_store_and_records_error() {
        let mut state = state_with_jobs(3);
        state.jobs_loaded(Err("connection refused".to_string()));
        assert_eq!(state.jobs.len(), 3);
        assert!(state.jobs_error.is_some());
    }

    #[test]
    fn test_opening_a_modal_closes_the_other() {
        let mut state = AppState::new(None, FilterState::default());
        state.modals.open(Modal::Login);
        assert_eq!(state.modals.visible(), Some(Modal::Login));

        state.open_apply(7);
        assert_eq!(state.modals.visible(), Some(Modal::Apply));
        assert_eq!(state.apply_target, Some(7));
        // the login modal is at most fading out, never co-visible
        let (rendered, _) = state.modals.rendered().unwrap();
        assert_eq!(rendered, Modal::Apply);
    }

    #[test]
    fn test_close_is_not_synchronous() {
        let mut modals = ModalController::default();
        modals.open(Modal::Login);
        modals.close_all();
        assert_eq!(modals.visible(), None);
        // still rendered while the exit transition plays
        assert_eq!(modals.rendered(), Some((Modal::Login, true)));

        std::thread::sleep(MODAL_TEARDOWN + Duration::from_millis(50));
        modals.tick();
        assert_eq!(modals.rendered(), None);
    }

    #[test]
    fn test_failed_apply_keeps_form_and_reenables_submit() {
        let mut state = AppState::new(None, FilterState::default());
        state.open_apply(1);
        state.apply.name = "Ada".to_string();
        state.apply.email = "ada@example.com".to_string();
        state.apply.submitting = true;

        state.apply_failed("connection error");
        assert!(!state.apply.submitting);
        assert_eq!(state.apply.name, "Ada");
        assert_eq!(state.apply.email, "ada@example.com");
        assert_eq!(state.modals.visible(), Some(Modal::Apply));
        assert_eq!(state.notice().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_successful_apply_resets_form_and_closes_modal() {
        let mut state = AppState::new(None, FilterState::default());
        state.open_apply(1);
        state.apply.name = "Ada".to_string();
        state.apply.email = "ada@example.com".to_string();
        state.apply.submitting = true;

        state.apply_succeeded();
        assert!(state.apply.name.is_empty());
        assert_eq!(state.modals.visible(), None);
        assert_eq!(state.apply_target, None);
        assert_eq!(state.notice().unwrap().kind, NoticeKind::Info);
    }

    #[test]
    fn test_admin_view_is_gated() {
        let mut state = state_with_jobs(1);
        assert_eq!(state.switch_view(View::Admin), None);
        assert_eq!(state.view, View::Seeker);
        assert_eq!(state.notice().unwrap().kind, NoticeKind::Error);

        state.role = Some(Role::Admin);
        assert_eq!(state.switch_view(View::Admin), Some(Refresh::Candidates));
        assert_eq!(state.view, View::Admin);
    }

    #[test]
    fn test_employer_entry_owes_jobs_refresh() {
        let mut state = state_with_jobs(1);
        assert_eq!(state.switch_view(View::Employer), Some(Refresh::Jobs));
        assert_eq!(state.view, View::Employer);
        // re-entering the same view is a no-op
        assert_eq!(state.switch_view(View::Employer), None);
    }

    #[test]
    fn test_login_routes_by_role() {
        let mut state = AppState::new(None, FilterState::default());
        state.modals.open(Modal::Login);
        let refresh = state.login_succeeded(Role::Admin);
        assert_eq!(state.view, View::Admin);
        assert_eq!(refresh, Some(Refresh::Candidates));
        assert_eq!(state.modals.visible(), None);
        assert!(state.login.username.is_empty());

        let mut state = AppState::new(None, FilterState::default());
        state.login_succeeded(Role::Employer);
        assert_eq!(state.view, View::Employer);

        let mut state = AppState::new(None, FilterState::default());
        state.login_succeeded(Role::Seeker);
        assert_eq!(state.view, View::Seeker);
    }

    #[test]
    fn test_failed_login_keeps_credentials() {
        let mut state = AppState::new(None, FilterState::default());
        state.modals.open(Modal::Login);
        state.login.username = "alice".to_string();
        state.login.password = "pw".to_string();
        state.login.submitting = true;

        state.login_failed("Login failed");
        assert!(!state.login.submitting);
        assert_eq!(state.login.username, "alice");
        assert_eq!(state.modals.visible(), Some(Modal::Login));
    }

    #[test]
    fn test_register_is_local_only() {
        let mut state = AppState::new(None, FilterState::default());
        state.modals.open(Modal::Register);
        state.register_submit();
        // invalid: blocked locally, modal stays
        assert_eq!(state.notice().unwrap().kind, NoticeKind::Error);
        assert_eq!(state.modals.visible(), Some(Modal::Register));

        state.register.name = "Ada".to_string();
        state.register.email = "ada@example.com".to_string();
        state.register.password = "pw".to_string();
        state.register_submit();
        assert_eq!(state.modals.visible(), None);
        assert_eq!(state.notice().unwrap().kind, NoticeKind::Info);
        assert!(state.register.name.is_empty());
    }

    #[test]
    fn test_post_form_validation_defaults() {
        let mut form = PostJobForm::default();
        assert!(form.validate().is_err());

        form.title = "Engineer".to_string();
        form.company = "Acme".to_string();
        let draft = form.validate().unwrap();
        assert_eq!(draft.job_type, "Full-time");
        assert_eq!(draft.location, "Remote");
    }

    #[test]
    fn test_candidate_status_updates_local_row() {
        let mut state = AppState::new(Some(Role::Admin), FilterState::default());
        state.candidates_loaded(Ok(vec![Candidate {
            id: 4,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            job_title: Some("Engineer".to_string()),
            status: "Pending".to_string(),
            applied_at: None,
        }]));
        state.candidate_status_set(4, "Accepted");
        assert_eq!(state.candidates[0].status, "Accepted");
    }

    #[test]
    fn test_employer_stats_sum_application_counts() {
        let state = state_with_jobs(3);
        let (postings, applications) = state.employer_stats();
        assert_eq!(postings, 3);
        assert_eq!(applications, 3);
    }

    #[test]
    fn test_selection_stays_within_page() {
        let mut state = state_with_jobs(8);
        let filtered = state.filtered();
        let page_len = state.pager.slice(&filtered).len();
        assert_eq!(page_len, 6);
        for _ in 0..10 {
            state.select_next(page_len);
        }
        assert_eq!(state.selected, 5);
        state.select_prev();
        assert_eq!(state.selected, 4);
    }
}
