use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::api::PortalClient;
use crate::models::{load_jobs_file, ApplicationForm, Candidate, Job, JobDraft, Role};
use crate::query::FilterState;
use crate::session::{self, Session, SessionStore};
use crate::state::{
    AppState, ApplyForm, LoginForm, Modal, NoticeKind, PostJobForm, Refresh, RegisterForm, View,
};

/// Where the job store loads from. A static file only replaces the jobs
/// feed; every other endpoint still goes through the API client.
#[derive(Clone)]
pub enum JobSource {
    Api(PortalClient),
    File(PathBuf),
}

/// Results delivered from detached worker threads. There is no cancellation:
/// a response that arrives after the user switched views is still applied to
/// the view that asked for it, and a newer response simply overwrites an
/// older one.
enum ApiEvent {
    Jobs(Result<Vec<Job>, String>),
    Candidates(Result<Vec<Candidate>, String>),
    LoginDone {
        username: String,
        result: Result<Role, String>,
    },
    Applied(Result<(), String>),
    Posted(Result<Job, String>),
    StatusSet {
        id: i64,
        status: &'static str,
        result: Result<(), String>,
    },
}

pub fn run(client: PortalClient, source: JobSource, filter: FilterState) -> Result<()> {
    let store = SessionStore::open()?;
    let session = store.load();
    let mut state = AppState::new(session.role, filter);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, &client, &source, &store);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    client: &PortalClient,
    source: &JobSource,
    store: &SessionStore,
) -> Result<()> {
    let (tx, rx) = mpsc::channel();

    state.jobs_loading = true;
    spawn_jobs_fetch(source, &tx);

    loop {
        state.tick();
        while let Ok(api_event) = rx.try_recv() {
            handle_api_event(state, client, source, store, &tx, api_event);
        }

        terminal.draw(|frame| draw(frame, state))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if !handle_key(state, client, source, &tx, key) {
                    break;
                }
            }
        }
    }
    Ok(())
}

// --- Worker threads ---

fn spawn_jobs_fetch(source: &JobSource, tx: &mpsc::Sender<ApiEvent>) {
    let source = source.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        let result = match source {
            JobSource::Api(client) => client.jobs(None).map_err(|e| e.to_string()),
            JobSource::File(path) => load_jobs_file(&path).map_err(|e| e.to_string()),
        };
        let _ = tx.send(ApiEvent::Jobs(result));
    });
}

fn spawn_candidates_fetch(client: &PortalClient, tx: &mpsc::Sender<ApiEvent>) {
    let client = client.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        let result = client.candidates().map_err(|e| e.to_string());
        let _ = tx.send(ApiEvent::Candidates(result));
    });
}

fn spawn_login(client: &PortalClient, tx: &mpsc::Sender<ApiEvent>, username: String, password: String) {
    let client = client.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        let result = client.login(&username, &password).map_err(|e| e.to_string());
        let _ = tx.send(ApiEvent::LoginDone { username, result });
    });
}

fn spawn_apply(client: &PortalClient, tx: &mpsc::Sender<ApiEvent>, job_id: i64, form: ApplicationForm) {
    let client = client.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        let result = client.apply(job_id, &form).map_err(|e| e.to_string());
        let _ = tx.send(ApiEvent::Applied(result));
    });
}

fn spawn_post(client: &PortalClient, tx: &mpsc::Sender<ApiEvent>, draft: JobDraft) {
    let client = client.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        let result = client.post_job(&draft).map_err(|e| e.to_string());
        let _ = tx.send(ApiEvent::Posted(result));
    });
}

fn spawn_status_update(
    client: &PortalClient,
    tx: &mpsc::Sender<ApiEvent>,
    id: i64,
    status: &'static str,
) {
    let client = client.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        let result = client.set_application_status(id, status).map_err(|e| e.to_string());
        let _ = tx.send(ApiEvent::StatusSet { id, status, result });
    });
}

fn run_refresh(
    state: &mut AppState,
    client: &PortalClient,
    source: &JobSource,
    tx: &mpsc::Sender<ApiEvent>,
    refresh: Refresh,
) {
    match refresh {
        Refresh::Jobs => {
            state.jobs_loading = true;
            spawn_jobs_fetch(source, tx);
        }
        Refresh::Candidates => {
            state.candidates_loading = true;
            spawn_candidates_fetch(client, tx);
        }
    }
}

// --- Event handling ---

fn handle_api_event(
    state: &mut AppState,
    client: &PortalClient,
    source: &JobSource,
    store: &SessionStore,
    tx: &mpsc::Sender<ApiEvent>,
    api_event: ApiEvent,
) {
    match api_event {
        ApiEvent::Jobs(result) => state.jobs_loaded(result),
        ApiEvent::Candidates(result) => state.candidates_loaded(result),
        ApiEvent::LoginDone { username, result } => match result {
            Ok(role) => {
                let _ = store.save(&Session {
                    role: Some(role),
                    username: Some(username),
                });
                if let Some(refresh) = state.login_succeeded(role) {
                    run_refresh(state, client, source, tx, refresh);
                }
            }
            Err(message) => state.login_failed(message),
        },
        ApiEvent::Applied(result) => match result {
            Ok(()) => state.apply_succeeded(),
            Err(message) => state.apply_failed(message),
        },
        ApiEvent::Posted(result) => match result {
            Ok(job) => {
                state.post_succeeded(&job);
                state.jobs_loading = true;
                spawn_jobs_fetch(source, tx);
            }
            Err(message) => state.post_failed(message),
        },
        ApiEvent::StatusSet { id, status, result } => match result {
            Ok(()) => state.candidate_status_set(id, status),
            Err(message) => state.notify_error(message),
        },
    }
}

fn handle_key(
    state: &mut AppState,
    client: &PortalClient,
    source: &JobSource,
    tx: &mpsc::Sender<ApiEvent>,
    key: KeyEvent,
) -> bool {
    // Modals swallow input while visible
    if let Some(modal) = state.modals.visible() {
        handle_modal_key(state, client, tx, modal, key);
        return true;
    }

    if state.searching {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => state.searching = false,
            KeyCode::Backspace => state.search_pop(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                state.search_push(c)
            }
            _ => {}
        }
        return true;
    }

    match state.view {
        View::Seeker => handle_seeker_key(state, client, source, tx, key),
        View::Admin => handle_admin_key(state, client, source, tx, key),
        View::Employer => handle_employer_key(state, client, source, tx, key),
    }
}

fn switch_view(
    state: &mut AppState,
    client: &PortalClient,
    source: &JobSource,
    tx: &mpsc::Sender<ApiEvent>,
    target: View,
) {
    if let Some(refresh) = state.switch_view(target) {
        run_refresh(state, client, source, tx, refresh);
    }
}

fn handle_seeker_key(
    state: &mut AppState,
    client: &PortalClient,
    source: &JobSource,
    tx: &mpsc::Sender<ApiEvent>,
    key: KeyEvent,
) -> bool {
    let page_len = {
        let filtered = state.filtered();
        state.pager.slice(&filtered).len()
    };
    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Char('/') => state.searching = true,
        KeyCode::Down | KeyCode::Char('j') => state.select_next(page_len),
        KeyCode::Up | KeyCode::Char('k') => state.select_prev(),
        KeyCode::Right | KeyCode::Char('l') => state.page_next(),
        KeyCode::Left | KeyCode::Char('h') => state.page_prev(),
        KeyCode::Char('c') => state.cycle_category(),
        KeyCode::Char('t') => state.cycle_job_type(),
        KeyCode::Char('r') => {
            state.jobs_loading = true;
            spawn_jobs_fetch(source, tx);
        }
        KeyCode::Enter => {
            if page_len > 0 {
                state.modals.open(Modal::JobDetail);
            }
        }
        KeyCode::Char('a') => {
            let target = {
                let filtered = state.filtered();
                let page = state.pager.slice(&filtered);
                state.selected_job(page).map(|job| job.id)
            };
            if let Some(id) = target {
                state.open_apply(id);
            }
        }
        KeyCode::Char('L') => state.modals.open(Modal::Login),
        KeyCode::Char('R') => state.modals.open(Modal::Register),
        KeyCode::Char('2') => switch_view(state, client, source, tx, View::Admin),
        KeyCode::Char('3') => switch_view(state, client, source, tx, View::Employer),
        _ => {}
    }
    true
}

fn handle_admin_key(
    state: &mut AppState,
    client: &PortalClient,
    source: &JobSource,
    tx: &mpsc::Sender<ApiEvent>,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Down | KeyCode::Char('j') => state.select_candidate_next(),
        KeyCode::Up | KeyCode::Char('k') => state.select_candidate_prev(),
        KeyCode::Char('a') => {
            if let Some(candidate) = state.selected_candidate() {
                spawn_status_update(client, tx, candidate.id, "Accepted");
            }
        }
        KeyCode::Char('x') => {
            if let Some(candidate) = state.selected_candidate() {
                spawn_status_update(client, tx, candidate.id, "Rejected");
            }
        }
        KeyCode::Char('r') => {
            state.candidates_loading = true;
            spawn_candidates_fetch(client, tx);
        }
        KeyCode::Char('1') | KeyCode::Esc => switch_view(state, client, source, tx, View::Seeker),
        KeyCode::Char('3') => switch_view(state, client, source, tx, View::Employer),
        _ => {}
    }
    true
}

fn handle_employer_key(
    state: &mut AppState,
    client: &PortalClient,
    source: &JobSource,
    tx: &mpsc::Sender<ApiEvent>,
    key: KeyEvent,
) -> bool {
    // The post form owns plain typing in this view; submit is Ctrl+S.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('s') = key.code {
            submit_post(state, client, tx);
        }
        return true;
    }
    match key.code {
        KeyCode::Esc => switch_view(state, client, source, tx, View::Seeker),
        KeyCode::Tab | KeyCode::Down => {
            state.post.focus = (state.post.focus + 1) % PostJobForm::FIELDS;
        }
        KeyCode::BackTab | KeyCode::Up => {
            state.post.focus =
                (state.post.focus + PostJobForm::FIELDS - 1) % PostJobForm::FIELDS;
        }
        KeyCode::Backspace => {
            state.post.field_mut().pop();
        }
        KeyCode::Enter => submit_post(state, client, tx),
        KeyCode::Char(c) => state.post.field_mut().push(c),
        _ => {}
    }
    true
}

fn submit_post(state: &mut AppState, client: &PortalClient, tx: &mpsc::Sender<ApiEvent>) {
    if state.post.submitting {
        return;
    }
    match state.post.validate() {
        Ok(draft) => {
            state.post.submitting = true;
            spawn_post(client, tx, draft);
        }
        Err(message) => state.notify_error(message),
    }
}

fn handle_modal_key(
    state: &mut AppState,
    client: &PortalClient,
    tx: &mpsc::Sender<ApiEvent>,
    modal: Modal,
    key: KeyEvent,
) {
    if key.code == KeyCode::Esc {
        state.modals.close_all();
        return;
    }
    match modal {
        Modal::Login => match key.code {
            KeyCode::Tab | KeyCode::Down => {
                state.login.focus = (state.login.focus + 1) % LoginForm::FIELDS;
            }
            KeyCode::BackTab | KeyCode::Up => {
                state.login.focus =
                    (state.login.focus + LoginForm::FIELDS - 1) % LoginForm::FIELDS;
            }
            KeyCode::Backspace => {
                state.login.field_mut().pop();
            }
            KeyCode::Enter => submit_login(state, client, tx),
            KeyCode::Char(c) => state.login.field_mut().push(c),
            _ => {}
        },
        Modal::Register => match key.code {
            KeyCode::Tab | KeyCode::Down => {
                state.register.focus = (state.register.focus + 1) % RegisterForm::FIELDS;
            }
            KeyCode::BackTab | KeyCode::Up => {
                state.register.focus =
                    (state.register.focus + RegisterForm::FIELDS - 1)
                        % RegisterForm::FIELDS;
            }
            KeyCode::Backspace => {
                state.register.field_mut().pop();
            }
            KeyCode::Enter => state.register_submit(),
            KeyCode::Char(c) => state.register.field_mut().push(c),
            _ => {}
        },
        Modal::JobDetail => match key.code {
            KeyCode::Char('a') | KeyCode::Enter => {
                let target = {
                    let filtered = state.filtered();
                    let page = state.pager.slice(&filtered);
                    state.selected_job(page).map(|job| job.id)
                };
                if let Some(id) = target {
                    state.open_apply(id);
                }
            }
            _ => {}
        },
        Modal::Apply => match key.code {
            KeyCode::Tab | KeyCode::Down => {
                state.apply.focus = (state.apply.focus + 1) % ApplyForm::FIELDS;
            }
            KeyCode::BackTab | KeyCode::Up => {
                state.apply.focus =
                    (state.apply.focus + ApplyForm::FIELDS - 1) % ApplyForm::FIELDS;
            }
            KeyCode::Backspace => {
                state.apply.field_mut().pop();
            }
            KeyCode::Enter => submit_apply(state, client, tx),
            KeyCode::Char(c) => state.apply.field_mut().push(c),
            _ => {}
        },
    }
}

fn submit_login(state: &mut AppState, client: &PortalClient, tx: &mpsc::Sender<ApiEvent>) {
    if state.login.submitting {
        return;
    }
    if let Err(message) = state.login.validate() {
        state.notify_error(message);
        return;
    }
    state.login.submitting = true;
    let username = state.login.username.clone();
    let password = state.login.password.clone();

    // Local stub first; only unknown credentials go to the API.
    if let Some(role) = session::check_credentials(&username, &password) {
        let _ = tx.send(ApiEvent::LoginDone {
            username,
            result: Ok(role),
        });
    } else {
        spawn_login(client, tx, username, password);
    }
}

fn submit_apply(state: &mut AppState, client: &PortalClient, tx: &mpsc::Sender<ApiEvent>) {
    if state.apply.submitting {
        return;
    }
    let Some(job_id) = state.apply_target else {
        return;
    };
    match state.apply.validate() {
        Ok(form) => {
            state.apply.submitting = true;
            spawn_apply(client, tx, job_id, form);
        }
        Err(message) => state.notify_error(message),
    }
}

// --- Rendering ---

fn draw(frame: &mut Frame, state: &AppState) {
    match state.view {
        View::Seeker => draw_seeker(frame, state),
        View::Admin => draw_admin(frame, state),
        View::Employer => draw_employer(frame, state),
    }

    if let Some((modal, closing)) = state.modals.rendered() {
        draw_modal(frame, state, modal, closing);
    }

    draw_notice(frame, state);
}

fn draw_seeker(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    // Search bar
    let search_text = if state.searching {
        format!("{}_", state.filter.search)
    } else if state.filter.search.is_empty() {
        "press / to search".to_string()
    } else {
        state.filter.search.clone()
    };
    let search_style = if state.searching {
        Style::default().fg(Color::Yellow)
    } else if state.filter.search.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title(" Search "));
    frame.render_widget(search, chunks[0]);

    // Filter line
    let location = if state.filter.location.is_empty() {
        "-"
    } else {
        state.filter.location.as_str()
    };
    let filters = Paragraph::new(format!(
        " category: {}   type: {}   location: {}",
        state.filter.category, state.filter.job_type, location
    ))
    .style(Style::default().fg(Color::Cyan));
    frame.render_widget(filters, chunks[1]);

    // Job list (current page of the filtered collection)
    let filtered = state.filtered();
    let page = state.pager.slice(&filtered);

    if state.jobs_loading && state.jobs.is_empty() {
        let loading = Paragraph::new("Loading opportunities...")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Jobs "));
        frame.render_widget(loading, chunks[2]);
    } else if let Some(error) = &state.jobs_error {
        let message = format!("Unable to load opportunities at this time.\n{}", error);
        let failed = Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Jobs "));
        frame.render_widget(failed, chunks[2]);
    } else if filtered.is_empty() {
        let empty = Paragraph::new("No matches found")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Jobs "));
        frame.render_widget(empty, chunks[2]);
    } else {
        let items: Vec<ListItem> = page
            .iter()
            .map(|job| {
                let salary = job.salary.as_deref().unwrap_or("Negotiable");
                let job_type = job.job_type.as_deref().unwrap_or("Full-time");
                let location = job.location.as_deref().unwrap_or("Remote");
                ListItem::new(format!(
                    "#{:<5} {}  @ {}  [{} | {} | {}]",
                    job.id,
                    truncate(&job.title, 32),
                    truncate(&job.company, 20),
                    job_type,
                    location,
                    salary,
                ))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(format!(
                " Jobs ({} found) ",
                filtered.len()
            )))
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        list_state.select(Some(state.selected.min(page.len().saturating_sub(1))));
        frame.render_stateful_widget(list, chunks[2], &mut list_state);
    }

    // Count and page indicator
    let total = state.pager.total_pages(filtered.len());
    let indicator = if total > 1 {
        format!(
            " {} positions found   page {}/{}",
            filtered.len(),
            state.pager.current(),
            total
        )
    } else {
        format!(" {} positions found", filtered.len())
    };
    frame.render_widget(
        Paragraph::new(indicator).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );

    let help = Paragraph::new(
        " /:search  c:category  t:type  j/k:select  h/l:page  enter:detail  a:apply  L:login  R:register  2:admin  3:employer  r:refresh  q:quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[4]);
}

fn draw_admin(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let title = format!(" Candidates ({}) ", state.candidates.len());
    if state.candidates_loading && state.candidates.is_empty() {
        let loading = Paragraph::new("Loading candidates...")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(loading, chunks[0]);
    } else if let Some(error) = &state.candidates_error {
        let failed = Paragraph::new(format!("Unable to load candidates.\n{}", error))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(failed, chunks[0]);
    } else if state.candidates.is_empty() {
        let empty = Paragraph::new("No applications yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(empty, chunks[0]);
    } else {
        let items: Vec<ListItem> = state
            .candidates
            .iter()
            .map(|candidate| {
                let status_style = match candidate.status.as_str() {
                    "Accepted" => Style::default().fg(Color::Green),
                    "Rejected" => Style::default().fg(Color::Red),
                    _ => Style::default().fg(Color::Yellow),
                };
                let applied = candidate
                    .applied_at
                    .as_deref()
                    .map(short_date)
                    .unwrap_or_else(|| "-".to_string());
                let line = Line::from(vec![
                    Span::styled(format!("{:<9}", candidate.status), status_style),
                    Span::raw(format!(
                        " #{:<5} {}  <{}>  {}  {}",
                        candidate.id,
                        truncate(&candidate.name, 20),
                        truncate(&candidate.email, 24),
                        truncate(candidate.job_title.as_deref().unwrap_or("-"), 24),
                        applied,
                    )),
                ]);
                ListItem::new(line)
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        list_state.select(Some(state.candidate_selected));
        frame.render_stateful_widget(list, chunks[0], &mut list_state);
    }

    let help = Paragraph::new(" j/k:select  a:accept  x:reject  r:refresh  1:seeker  3:employer  q:quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[1]);
}

fn draw_employer(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let (postings, applications) = state.employer_stats();
    let stats = if state.jobs_loading {
        "refreshing...".to_string()
    } else {
        format!("{} postings   {} applications", postings, applications)
    };
    let header = Paragraph::new(stats)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" Dashboard "));
    frame.render_widget(header, chunks[0]);

    let mut lines = vec![Line::from("")];
    let fields = [
        ("Title", state.post.title.as_str(), 0),
        ("Company", state.post.company.as_str(), 1),
        ("Category", state.post.category.as_str(), 2),
        ("Salary", state.post.salary.as_str(), 3),
        ("Description", state.post.description.as_str(), 4),
    ];
    for (label, value, index) in fields {
        lines.push(form_line(label, value, state.post.focus == index, false));
    }
    lines.push(Line::from(""));
    let submit_label = if state.post.submitting {
        "[ Posting... ]"
    } else {
        "[ Submit Job ]"
    };
    lines.push(Line::from(Span::styled(
        format!("  {}", submit_label),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  New postings default to Full-time / Remote.",
        Style::default().fg(Color::DarkGray),
    )));

    let form = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Post an Opening "));
    frame.render_widget(form, chunks[1]);

    let help = Paragraph::new(" tab:next field  enter/ctrl+s:submit  esc:back")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}

fn draw_modal(frame: &mut Frame, state: &AppState, modal: Modal, closing: bool) {
    let area = frame.area();
    let border_style = if closing {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow)
    };

    match modal {
        Modal::Login => {
            let rect = centered_rect(44, 9, area);
            frame.render_widget(Clear, rect);
            let mut lines = vec![Line::from("")];
            lines.push(form_line("Username", &state.login.username, state.login.focus == 0, false));
            lines.push(form_line("Password", &state.login.password, state.login.focus == 1, true));
            lines.push(Line::from(""));
            let submit = if state.login.submitting { "[ Verifying... ]" } else { "[ Sign In ]" };
            lines.push(Line::from(Span::styled(
                format!("  {}", submit),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            let body = Paragraph::new(Text::from(lines))
                .block(Block::default().borders(Borders::ALL).border_style(border_style).title(" Login "));
            frame.render_widget(body, rect);
        }
        Modal::Register => {
            let rect = centered_rect(44, 10, area);
            frame.render_widget(Clear, rect);
            let mut lines = vec![Line::from("")];
            lines.push(form_line("Full name", &state.register.name, state.register.focus == 0, false));
            lines.push(form_line("Email", &state.register.email, state.register.focus == 1, false));
            lines.push(form_line("Password", &state.register.password, state.register.focus == 2, true));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  [ Continue ]",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            let body = Paragraph::new(Text::from(lines))
                .block(Block::default().borders(Borders::ALL).border_style(border_style).title(" Register "));
            frame.render_widget(body, rect);
        }
        Modal::JobDetail => {
            let filtered = state.filtered();
            let page = state.pager.slice(&filtered);
            let Some(job) = state.selected_job(page) else {
                return;
            };
            let rect = centered_rect(area.width.saturating_sub(10).min(76), 18, area);
            frame.render_widget(Clear, rect);
            let mut lines = vec![
                Line::from(Span::styled(
                    job.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!(
                    "{} // {}",
                    job.company,
                    job.location.as_deref().unwrap_or("Remote")
                )),
                Line::from(""),
            ];
            let description = job
                .description
                .as_deref()
                .unwrap_or("(No description provided)");
            let width = rect.width.saturating_sub(4).max(20) as usize;
            for wrapped in textwrap::fill(description, width).lines() {
                lines.push(Line::from(wrapped.to_string()));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(format!(
                "Reward: {}    Type: {}",
                job.salary.as_deref().unwrap_or("Negotiable"),
                job.job_type.as_deref().unwrap_or("Full-time"),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  a:apply   esc:close",
                Style::default().fg(Color::DarkGray),
            )));
            let body = Paragraph::new(Text::from(lines))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).border_style(border_style).title(" Position "));
            frame.render_widget(body, rect);
        }
        Modal::Apply => {
            let rect = centered_rect(48, 10, area);
            frame.render_widget(Clear, rect);
            let target = state
                .apply_target
                .and_then(|id| state.job_by_id(id))
                .map(|job| job.title.clone())
                .unwrap_or_else(|| "this position".to_string());
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("Applying for: {}", truncate(&target, 38)),
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(""),
            ];
            lines.push(form_line("Name", &state.apply.name, state.apply.focus == 0, false));
            lines.push(form_line("Email", &state.apply.email, state.apply.focus == 1, false));
            lines.push(Line::from(""));
            let submit = if state.apply.submitting {
                "[ Submitting... ]"
            } else {
                "[ Submit Application ]"
            };
            lines.push(Line::from(Span::styled(
                format!("  {}", submit),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            let body = Paragraph::new(Text::from(lines))
                .block(Block::default().borders(Borders::ALL).border_style(border_style).title(" Apply "));
            frame.render_widget(body, rect);
        }
    }
}

fn draw_notice(frame: &mut Frame, state: &AppState) {
    let Some(notice) = state.notice() else {
        return;
    };
    let area = frame.area();
    if area.height == 0 {
        return;
    }
    let rect = Rect {
        x: area.x,
        y: area.y + area.height - 1,
        width: area.width,
        height: 1,
    };
    let style = match notice.kind {
        NoticeKind::Info => Style::default().fg(Color::Green),
        NoticeKind::Error => Style::default().fg(Color::Red),
    };
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(format!(" {}", notice.text)).style(style),
        rect,
    );
}

fn form_line(label: &str, value: &str, focused: bool, mask: bool) -> Line<'static> {
    let shown = if mask {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "_" } else { "" };
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Line::from(Span::styled(
        format!("  {:<12} {}{}", format!("{}:", label), shown, cursor),
        style,
    ))
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn short_date(raw: &str) -> String {
    // API timestamps are ISO 8601 without zone, e.g. 2026-01-05T10:12:00
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_date_formats_api_timestamps() {
        assert_eq!(short_date("2026-01-05T10:12:00"), "2026-01-05");
        assert_eq!(short_date("2026-01-05T10:12:00.123456"), "2026-01-05");
        // unparseable input passes through
        assert_eq!(short_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(44, 9, area);
        assert!(rect.width <= area.width && rect.height <= area.height);
        assert_eq!(rect.x, 18);
        // oversized requests clamp to the area
        let rect = centered_rect(200, 100, area);
        assert_eq!((rect.width, rect.height), (80, 24));
    }
}
