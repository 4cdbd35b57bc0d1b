//! Application state management for the Trenditor terminal client.
//!
//! `App` owns the UI state, the per-page data and the background task
//! channel. Session state is never stored here directly: it is mirrored from
//! the `SessionManager`'s watch channel on every tick, and every route is
//! passed through `guard` before it is rendered.

use std::future::Future;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use trenditor_core::api::error::GENERIC_ERROR_MESSAGE;
use trenditor_core::cache::CacheAges;
use trenditor_core::models::forms::validate_toot_content;
use trenditor_core::models::{EditedToot, HistoryItem, SearchResult, Toot, TrendsResponse, UserId};
use trenditor_core::utils::strip_html;
use trenditor_core::{
    guard, ApiClient, ApiError, CacheManager, Config, GuardDecision, Route, Session, SessionManager,
};

use crate::forms::Form;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

// ============================================================================
// UI State Types
// ============================================================================

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Navigation bar: number keys and arrows switch pages
    Nav,
    /// Page content: forms and lists
    Content,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    EditingToot,
    ConfirmingQuit,
    ConfirmingLogout,
    ConfirmingDeleteAccount,
    ConfirmingDeleteToot,
    ConfirmingClearHistory,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A dismissible message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned tasks. Data results carry the user they
/// were fetched for, so a result that lands after a sign-out is dropped.
enum TaskResult {
    LoggedIn(Session),
    LoginFailed(String),
    LoggedOut,
    SignedUp(Result<(), ApiError>),
    PasswordReset(Result<(), ApiError>),
    AccountDeleted(UserId, Result<(), ApiError>),
    Search(UserId, Result<SearchResult, ApiError>),
    Trends(UserId, Result<TrendsResponse, ApiError>),
    TootPosted(UserId, Result<(), ApiError>),
    Toots(UserId, Result<Vec<Toot>, ApiError>),
    TootEdited(UserId, String, Result<EditedToot, ApiError>),
    TootDeleted(UserId, String, Result<(), ApiError>),
    History(UserId, Result<Vec<HistoryItem>, ApiError>),
    HistoryCleared(UserId, Result<(), ApiError>),
}

pub struct App {
    pub config: Config,
    /// Write config changes (last email) back to disk
    persist_config: bool,
    session: SessionManager,
    session_rx: watch::Receiver<Session>,
    /// Last session value observed on the watch channel
    pub session_view: Session,
    api: ApiClient,
    cache: CacheManager,

    // UI state
    pub state: AppState,
    pub focus: Focus,
    pub route: Route,
    pub selection: usize,

    // Forms
    pub sign_in_form: Form,
    pub sign_up_form: Form,
    pub reset_form: Form,
    pub search_form: Form,
    pub trends_form: Form,
    pub toot_form: Form,
    pub edit_buffer: String,

    // Page data
    pub search_result: Option<SearchResult>,
    pub trends: Option<TrendsResponse>,
    pub toots: Vec<Toot>,
    pub history: Vec<HistoryItem>,
    pub toots_loading: bool,
    pub history_loading: bool,
    toots_fresh: bool,
    history_fresh: bool,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,

    pub notice: Option<Notice>,
    pub cache_ages: CacheAges,
}

impl App {
    /// Create the application around already-built services.
    pub fn new(config: Config, session: SessionManager, api: ApiClient, cache: CacheManager) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let session_rx = session.subscribe();
        let session_view = session.snapshot();
        let sign_in_form = Form::sign_in(config.last_email.as_deref());

        Self {
            config,
            persist_config: true,
            session,
            session_rx,
            session_view,
            api,
            cache,

            state: AppState::Normal,
            focus: Focus::Nav,
            route: Route::Home,
            selection: 0,

            sign_in_form,
            sign_up_form: Form::sign_up(),
            reset_form: Form::forgot_password(),
            search_form: Form::search(),
            trends_form: Form::trends(),
            toot_form: Form::post_toot(),
            edit_buffer: String::new(),

            search_result: None,
            trends: None,
            toots: Vec::new(),
            history: Vec::new(),
            toots_loading: false,
            history_loading: false,
            toots_fresh: false,
            history_fresh: false,

            task_rx: rx,
            task_tx: tx,

            notice: None,
            cache_ages: CacheAges::default(),
        }
    }

    /// Kick off the startup verification of any persisted token.
    pub fn start(&mut self) {
        info!("Verifying stored session");
        self.spawn_verify();
    }

    fn spawn_verify(&self) {
        let session = self.session.clone();
        tokio::spawn(async move {
            session.verify().await;
        });
    }

    // =========================================================================
    // Session and Navigation
    // =========================================================================

    /// What the current route resolves to under the current session
    pub fn decision(&self) -> GuardDecision {
        guard(self.route, &self.session_view)
    }

    pub fn api_base_url(&self) -> &str {
        self.api.base_url()
    }

    pub fn current_user_id(&self) -> Option<UserId> {
        self.session_view.user().map(|u| u.id.clone())
    }

    /// Mirror the latest session value and re-apply the guard.
    pub fn sync_session(&mut self) {
        if !self.session_rx.has_changed().unwrap_or(false) {
            return;
        }
        let next = self.session_rx.borrow_and_update().clone();
        self.set_session_view(next);
    }

    fn set_session_view(&mut self, next: Session) {
        let prev_user = self.current_user_id();
        debug!(status = ?next.status(), "Session changed");
        self.session_view = next;
        let next_user = self.current_user_id();

        if prev_user != next_user {
            self.on_user_changed(next_user);
        }
        self.apply_guard();
        self.on_route_entered();
    }

    fn on_user_changed(&mut self, user: Option<UserId>) {
        self.reset_page_data();
        let Some(user_id) = user else {
            return;
        };
        self.load_from_cache(&user_id);
        if let Some(user) = self.session_view.user() {
            if self.config.last_email.as_deref() != Some(user.email.as_str()) {
                self.config.last_email = Some(user.email.clone());
                if self.persist_config {
                    if let Err(e) = self.config.save() {
                        warn!(error = %e, "Failed to save config");
                    }
                }
            }
        }
    }

    /// Follow a redirect decision for the current route, if any.
    pub fn apply_guard(&mut self) {
        if let GuardDecision::Redirect(target) = self.decision() {
            debug!(from = ?self.route, to = ?target, "Route redirected");
            self.route = target;
            self.selection = 0;
            if target == Route::SignIn {
                self.focus = Focus::Content;
            }
        }
    }

    /// Request a route. The guard decides what is actually shown.
    pub fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        debug!(?route, "Navigate");
        self.route = route;
        self.selection = 0;
        self.focus = Focus::Nav;
        self.apply_guard();
        self.on_route_entered();
    }

    /// Load page data the first time a rendered page needs it.
    fn on_route_entered(&mut self) {
        if !matches!(self.decision(), GuardDecision::Render(_)) {
            return;
        }
        match self.route {
            Route::PostedToots if !self.toots_fresh && !self.toots_loading => self.refresh_toots(),
            Route::History if !self.history_fresh && !self.history_loading => self.refresh_history(),
            _ => {}
        }
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    fn load_from_cache(&mut self, user_id: &UserId) {
        if let Ok(Some(cached)) = self.cache.load_toots(user_id) {
            self.toots_fresh = !cached.is_stale();
            self.toots = cached.data;
        }
        if let Ok(Some(cached)) = self.cache.load_history(user_id) {
            self.history_fresh = !cached.is_stale();
            self.history = cached.data;
        }
        if let Ok(Some(cached)) = self.cache.load_trends(user_id) {
            self.trends = Some(cached.data);
        }
        self.cache_ages = self.cache.get_cache_ages(user_id);
        debug!(toots = self.toots.len(), history = self.history.len(), "Loaded from cache");
    }

    fn reset_page_data(&mut self) {
        self.search_result = None;
        self.trends = None;
        self.toots.clear();
        self.history.clear();
        self.toots_loading = false;
        self.history_loading = false;
        self.toots_fresh = false;
        self.history_fresh = false;
        self.selection = 0;
        self.cache_ages = CacheAges::default();
        // Results still in flight belong to the old user and will be dropped
        for form in [&mut self.search_form, &mut self.trends_form, &mut self.toot_form] {
            form.submitting = false;
            form.error = None;
        }
    }

    fn clear_user_cache(&mut self, user_id: &UserId) {
        if let Err(e) = self.cache.clear_user(user_id) {
            warn!(error = %e, "Failed to clear user cache");
        }
    }

    // =========================================================================
    // Background Tasks
    // =========================================================================

    /// Helper to send task results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send task result - channel closed");
        }
    }

    fn spawn_task<F>(&self, task: F)
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = task.await;
            Self::send_result(&tx, result).await;
        });
    }

    /// API client carrying the stored token, plus the signed-in user
    fn authed(&self) -> Option<(ApiClient, UserId)> {
        let user_id = self.current_user_id()?;
        let token = self.session.bearer_token()?;
        Some((self.api.with_token(token), user_id))
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.task_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_task_result(result);
        }
    }

    fn is_current_user(&self, user_id: &UserId) -> bool {
        if self.current_user_id().as_ref() == Some(user_id) {
            true
        } else {
            debug!(%user_id, "Dropping result for a user who is no longer signed in");
            false
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::LoggedIn(session) => {
                self.sign_in_form.submitting = false;
                self.sign_in_form.clear_secrets();
                if session.is_logged_in() {
                    self.sign_in_form.error = None;
                } else {
                    self.sign_in_form.error = session.last_error.clone();
                }
            }
            TaskResult::LoginFailed(message) => {
                self.sign_in_form.submitting = false;
                self.sign_in_form.clear_secrets();
                self.sign_in_form.error = Some(message);
            }
            TaskResult::LoggedOut => {
                self.set_notice(NoticeKind::Info, "Signed out");
                self.navigate(Route::Home);
            }
            TaskResult::SignedUp(result) => {
                self.sign_up_form.submitting = false;
                match result {
                    Ok(()) => {
                        let email = self.sign_up_form.value(1).trim().to_string();
                        self.sign_up_form.reset_values();
                        self.sign_up_form.error = None;
                        self.sign_in_form = Form::sign_in(Some(email.as_str()));
                        self.set_notice(NoticeKind::Success, "Account created. Please sign in.");
                        self.navigate(Route::SignIn);
                        self.focus = Focus::Content;
                    }
                    Err(e) => {
                        self.sign_up_form.clear_secrets();
                        self.sign_up_form.error = Some(e.user_message(GENERIC_ERROR_MESSAGE));
                    }
                }
            }
            TaskResult::PasswordReset(result) => {
                self.reset_form.submitting = false;
                match result {
                    Ok(()) => {
                        let email = self.reset_form.value(0).trim().to_string();
                        self.reset_form.reset_values();
                        self.reset_form.error = None;
                        self.sign_in_form = Form::sign_in(Some(email.as_str()));
                        self.set_notice(NoticeKind::Success, "Password updated. Please sign in.");
                        self.navigate(Route::SignIn);
                        self.focus = Focus::Content;
                    }
                    Err(e) => {
                        self.reset_form.clear_secrets();
                        self.reset_form.error = Some(e.user_message(GENERIC_ERROR_MESSAGE));
                    }
                }
            }
            TaskResult::AccountDeleted(user_id, result) => match result {
                Ok(()) => {
                    info!(%user_id, "Account deleted");
                    self.clear_user_cache(&user_id);
                    self.set_notice(NoticeKind::Info, "Your account has been deleted.");
                    self.navigate(Route::Home);
                }
                Err(e) => self.handle_api_error(&e, "delete account"),
            },
            TaskResult::Search(user_id, result) => {
                if !self.is_current_user(&user_id) {
                    return;
                }
                self.search_form.submitting = false;
                match result {
                    Ok(found) => {
                        info!(keyword = %found.keyword, count = found.data.len(), "Search complete");
                        self.search_form.error = None;
                        self.search_result = Some(found);
                        self.selection = 0;
                        // The backend records every search in the history
                        self.history_fresh = false;
                    }
                    Err(e) => self.handle_form_error(&e, FormId::Search),
                }
            }
            TaskResult::Trends(user_id, result) => {
                if !self.is_current_user(&user_id) {
                    return;
                }
                self.trends_form.submitting = false;
                match result {
                    Ok(trends) => {
                        self.trends_form.error = None;
                        if let Err(e) = self.cache.save_trends(&user_id, &trends) {
                            warn!(error = %e, "Failed to cache trends");
                        }
                        self.trends = Some(trends);
                        self.selection = 0;
                        self.cache_ages = self.cache.get_cache_ages(&user_id);
                    }
                    Err(e) => self.handle_form_error(&e, FormId::Trends),
                }
            }
            TaskResult::TootPosted(user_id, result) => {
                if !self.is_current_user(&user_id) {
                    return;
                }
                self.toot_form.submitting = false;
                match result {
                    Ok(()) => {
                        self.toot_form.reset_values();
                        self.toot_form.error = None;
                        self.toots_fresh = false;
                        self.set_notice(NoticeKind::Success, "Toot posted");
                    }
                    Err(e) => self.handle_form_error(&e, FormId::Toot),
                }
            }
            TaskResult::Toots(user_id, result) => {
                if !self.is_current_user(&user_id) {
                    return;
                }
                self.toots_loading = false;
                match result {
                    Ok(toots) => {
                        self.toots = toots;
                        self.toots_fresh = true;
                        self.clamp_selection();
                        self.save_toots(&user_id);
                    }
                    Err(e) => self.handle_api_error(&e, "load toots"),
                }
            }
            TaskResult::TootEdited(user_id, toot_id, result) => {
                if !self.is_current_user(&user_id) {
                    return;
                }
                match result {
                    Ok(edit) => {
                        if let Some(toot) = self.toots.iter_mut().find(|t| t.id == toot_id) {
                            toot.apply_edit(edit);
                        }
                        self.save_toots(&user_id);
                        self.set_notice(NoticeKind::Success, "Toot updated");
                    }
                    Err(e) => self.handle_api_error(&e, "edit toot"),
                }
            }
            TaskResult::TootDeleted(user_id, toot_id, result) => {
                if !self.is_current_user(&user_id) {
                    return;
                }
                match result {
                    Ok(()) => {
                        self.toots.retain(|t| t.id != toot_id);
                        self.clamp_selection();
                        self.save_toots(&user_id);
                        self.set_notice(NoticeKind::Success, "Toot deleted");
                    }
                    Err(e) => self.handle_api_error(&e, "delete toot"),
                }
            }
            TaskResult::History(user_id, result) => {
                if !self.is_current_user(&user_id) {
                    return;
                }
                self.history_loading = false;
                match result {
                    Ok(history) => {
                        self.history = history;
                        self.history_fresh = true;
                        self.clamp_selection();
                        self.save_history(&user_id);
                    }
                    Err(e) => self.handle_api_error(&e, "load history"),
                }
            }
            TaskResult::HistoryCleared(user_id, result) => {
                if !self.is_current_user(&user_id) {
                    return;
                }
                match result {
                    Ok(()) => {
                        self.history.clear();
                        self.selection = 0;
                        self.save_history(&user_id);
                        self.set_notice(NoticeKind::Success, "History cleared");
                    }
                    Err(e) => self.handle_api_error(&e, "clear history"),
                }
            }
        }
    }

    fn save_toots(&mut self, user_id: &UserId) {
        if let Err(e) = self.cache.save_toots(user_id, &self.toots) {
            warn!(error = %e, "Failed to cache toots");
        }
        self.cache_ages = self.cache.get_cache_ages(user_id);
    }

    fn save_history(&mut self, user_id: &UserId) {
        if let Err(e) = self.cache.save_history(user_id, &self.history) {
            warn!(error = %e, "Failed to cache history");
        }
        self.cache_ages = self.cache.get_cache_ages(user_id);
    }

    /// Surface a failed data call. A rejected token triggers a re-verify,
    /// which is the only path that moves the session to signed-out.
    fn handle_api_error(&mut self, e: &ApiError, action: &str) {
        warn!(error = %e, action, "Request failed");
        if e.is_auth_failure() {
            self.set_notice(NoticeKind::Error, SESSION_EXPIRED_MESSAGE);
            self.spawn_verify();
        } else {
            self.set_notice(NoticeKind::Error, e.user_message(GENERIC_ERROR_MESSAGE));
        }
    }

    fn handle_form_error(&mut self, e: &ApiError, form: FormId) {
        if e.is_auth_failure() {
            self.handle_api_error(e, "submit form");
            return;
        }
        warn!(error = %e, ?form, "Form submission failed");
        let message = e.user_message(GENERIC_ERROR_MESSAGE);
        match form {
            FormId::Search => self.search_form.error = Some(message),
            FormId::Trends => self.trends_form.error = Some(message),
            FormId::Toot => self.toot_form.error = Some(message),
        }
    }

    pub fn set_notice(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice::new(kind, text));
    }

    // =========================================================================
    // Account Actions
    // =========================================================================

    pub fn submit_sign_in(&mut self) {
        if self.sign_in_form.submitting {
            return;
        }
        let form = self.sign_in_form.login_payload();
        if let Err(message) = form.validate() {
            self.sign_in_form.error = Some(message);
            return;
        }
        self.sign_in_form.error = None;
        self.sign_in_form.submitting = true;

        let session = self.session.clone();
        self.spawn_task(async move {
            match session.log_in(&form).await {
                Ok(session) => TaskResult::LoggedIn(session),
                Err(e) => {
                    warn!(error = %e, "Login failed");
                    TaskResult::LoginFailed(e.user_message())
                }
            }
        });
    }

    pub fn submit_sign_up(&mut self) {
        if self.sign_up_form.submitting {
            return;
        }
        let form = self.sign_up_form.sign_up_payload();
        if let Err(message) = form.validate() {
            self.sign_up_form.error = Some(message);
            return;
        }
        self.sign_up_form.error = None;
        self.sign_up_form.submitting = true;

        let api = self.api.clone();
        self.spawn_task(async move { TaskResult::SignedUp(api.sign_up(&form).await) });
    }

    pub fn submit_password_reset(&mut self) {
        if self.reset_form.submitting {
            return;
        }
        let form = self.reset_form.reset_payload();
        if let Err(message) = form.validate() {
            self.reset_form.error = Some(message);
            return;
        }
        self.reset_form.error = None;
        self.reset_form.submitting = true;

        let api = self.api.clone();
        self.spawn_task(async move { TaskResult::PasswordReset(api.reset_password(&form).await) });
    }

    /// Sign out: drop the user's cached data, then clear the session.
    pub fn log_out(&mut self) {
        self.state = AppState::Normal;
        if let Some(user_id) = self.current_user_id() {
            self.clear_user_cache(&user_id);
        }
        let session = self.session.clone();
        self.spawn_task(async move {
            session.log_out().await;
            TaskResult::LoggedOut
        });
    }

    pub fn delete_account(&mut self) {
        self.state = AppState::Normal;
        let Some((api, user_id)) = self.authed() else {
            return;
        };
        let session = self.session.clone();
        self.set_notice(NoticeKind::Info, "Deleting account...");
        self.spawn_task(async move {
            let result = api.delete_account(&user_id).await;
            if result.is_ok() {
                session.log_out().await;
            }
            TaskResult::AccountDeleted(user_id, result)
        });
    }

    // =========================================================================
    // Data Actions
    // =========================================================================

    pub fn submit_search(&mut self) {
        if self.search_form.submitting {
            return;
        }
        let form = self.search_form.search_payload();
        if let Err(message) = form.validate() {
            self.search_form.error = Some(message);
            return;
        }
        let Some((api, user_id)) = self.authed() else {
            return;
        };
        self.search_form.error = None;
        self.search_form.submitting = true;
        self.spawn_task(async move {
            let result = api.search(&form).await;
            TaskResult::Search(user_id, result)
        });
    }

    pub fn submit_trends(&mut self) {
        if self.trends_form.submitting {
            return;
        }
        let form = self.trends_form.trends_payload();
        if let Err(message) = form.validate() {
            self.trends_form.error = Some(message);
            return;
        }
        let Some((api, user_id)) = self.authed() else {
            return;
        };
        self.trends_form.error = None;
        self.trends_form.submitting = true;
        self.spawn_task(async move {
            let result = api.analyze_trends(&form).await;
            TaskResult::Trends(user_id, result)
        });
    }

    pub fn submit_toot(&mut self) {
        if self.toot_form.submitting {
            return;
        }
        let draft = self.toot_form.toot_payload();
        if let Err(message) = draft.validate() {
            self.toot_form.error = Some(message);
            return;
        }
        let Some((api, user_id)) = self.authed() else {
            return;
        };
        self.toot_form.error = None;
        self.toot_form.submitting = true;
        self.spawn_task(async move {
            let result = api.post_toot(&draft).await;
            TaskResult::TootPosted(user_id, result)
        });
    }

    pub fn refresh_toots(&mut self) {
        let Some((api, user_id)) = self.authed() else {
            return;
        };
        self.toots_loading = true;
        self.spawn_task(async move {
            let result = api.fetch_toots(&user_id).await;
            TaskResult::Toots(user_id, result)
        });
    }

    pub fn refresh_history(&mut self) {
        let Some((api, user_id)) = self.authed() else {
            return;
        };
        self.history_loading = true;
        self.spawn_task(async move {
            let result = api.fetch_history(&user_id).await;
            TaskResult::History(user_id, result)
        });
    }

    /// Refresh toots and history together.
    pub fn refresh_activity(&mut self) {
        let Some((api, user_id)) = self.authed() else {
            return;
        };
        self.toots_loading = true;
        self.history_loading = true;
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let (toots, history) =
                futures::join!(api.fetch_toots(&user_id), api.fetch_history(&user_id));
            Self::send_result(&tx, TaskResult::Toots(user_id.clone(), toots)).await;
            Self::send_result(&tx, TaskResult::History(user_id, history)).await;
        });
        self.set_notice(NoticeKind::Info, "Refreshing...");
    }

    pub fn selected_toot(&self) -> Option<&Toot> {
        self.toots.get(self.selection)
    }

    /// Open the inline editor on the selected toot.
    pub fn start_edit_toot(&mut self) {
        let Some(toot) = self.selected_toot() else {
            return;
        };
        self.edit_buffer = strip_html(&toot.content);
        self.state = AppState::EditingToot;
    }

    pub fn submit_edit_toot(&mut self) {
        let content = self.edit_buffer.trim().to_string();
        if let Err(message) = validate_toot_content(&content) {
            self.set_notice(NoticeKind::Error, message);
            return;
        }
        let Some(toot_id) = self.selected_toot().map(|t| t.id.clone()) else {
            self.state = AppState::Normal;
            return;
        };
        let Some((api, user_id)) = self.authed() else {
            return;
        };
        self.state = AppState::Normal;
        self.edit_buffer.clear();
        self.spawn_task(async move {
            let result = api.edit_toot(&toot_id, &content).await;
            TaskResult::TootEdited(user_id, toot_id, result)
        });
    }

    pub fn delete_selected_toot(&mut self) {
        self.state = AppState::Normal;
        let Some(toot_id) = self.selected_toot().map(|t| t.id.clone()) else {
            return;
        };
        let Some((api, user_id)) = self.authed() else {
            return;
        };
        self.spawn_task(async move {
            let result = api.delete_toot(&toot_id).await;
            TaskResult::TootDeleted(user_id, toot_id, result)
        });
    }

    pub fn clear_history(&mut self) {
        self.state = AppState::Normal;
        let Some((api, user_id)) = self.authed() else {
            return;
        };
        self.spawn_task(async move {
            let result = api.clear_history(&user_id).await;
            TaskResult::HistoryCleared(user_id, result)
        });
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Number of selectable rows on the current page
    pub fn list_len(&self) -> usize {
        match self.route {
            Route::PostedToots => self.toots.len(),
            Route::History => self.history.len(),
            Route::Trends => self.trends.as_ref().map(|t| t.trends().len()).unwrap_or(0),
            Route::Search => self.search_result.as_ref().map(|r| r.data.len()).unwrap_or(0),
            _ => 0,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.list_len();
        if len == 0 {
            self.selection = 0;
            return;
        }
        let next = self.selection as isize + delta;
        self.selection = next.clamp(0, len as isize - 1) as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.list_len();
        if self.selection >= len {
            self.selection = len.saturating_sub(1);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FormId {
    Search,
    Trends,
    Toot,
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use trenditor_core::auth::{FileTokenStore, TokenStore};

    use super::*;

    /// App with a file token store in a temp dir and an unreachable backend
    pub fn test_app(dir: &tempfile::TempDir, token: Option<&str>) -> App {
        let store = FileTokenStore::new(dir.path().to_path_buf());
        if let Some(token) = token {
            store.save(token).expect("save token");
        }
        let api = ApiClient::new("http://127.0.0.1:9").expect("client");
        let session = SessionManager::new(
            Box::new(store),
            Arc::new(api.clone()),
            std::time::Duration::from_secs(1),
        );
        let cache = CacheManager::new(dir.path().join("cache")).expect("cache");
        let mut app = App::new(Config::default(), session, api, cache);
        app.persist_config = false;
        app
    }
}

#[cfg(test)]
mod tests {
    use trenditor_core::auth::AuthState;
    use trenditor_core::models::{Sentiment, User};

    use super::test_support::test_app;
    use super::*;

    fn user(id: i64) -> User {
        User {
            id: UserId::from(id),
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
        }
    }

    fn authenticated(id: i64) -> Session {
        Session {
            state: AuthState::Authenticated(user(id)),
            last_error: None,
        }
    }

    fn toot(id: &str) -> Toot {
        Toot {
            id: id.to_string(),
            content: format!("<p>toot {}</p>", id),
            created_at: None,
            sentiment: Some(Sentiment::Neutral),
        }
    }

    #[tokio::test]
    async fn test_protected_route_redirects_when_signed_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);
        assert_eq!(app.session_view.status(), trenditor_core::SessionStatus::Unauthenticated);

        app.navigate(Route::Trends);
        assert_eq!(app.route, Route::SignIn);
        assert_eq!(app.focus, Focus::Content);
    }

    #[tokio::test]
    async fn test_protected_route_waits_while_verifying() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, Some("tok"));
        assert!(app.session_view.is_loading());

        app.navigate(Route::History);
        assert_eq!(app.route, Route::History);
        assert_eq!(app.decision(), GuardDecision::Loading);
        assert!(!app.history_loading);
    }

    #[tokio::test]
    async fn test_pending_route_resolves_on_sign_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, Some("tok"));
        app.navigate(Route::PostToot);

        app.set_session_view(Session {
            state: AuthState::Unauthenticated,
            last_error: Some("expired".to_string()),
        });
        assert_eq!(app.route, Route::SignIn);
    }

    #[tokio::test]
    async fn test_sign_in_page_leaves_once_authenticated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);
        app.navigate(Route::SignIn);
        assert_eq!(app.decision(), GuardDecision::Render(Route::SignIn));

        app.set_session_view(authenticated(1));
        assert_eq!(app.route, Route::Home);
        assert_eq!(app.config.last_email.as_deref(), Some("ann@example.com"));
    }

    #[tokio::test]
    async fn test_results_for_previous_user_are_dropped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);
        app.set_session_view(authenticated(2));

        app.process_task_result(TaskResult::Toots(UserId::from(1), Ok(vec![toot("a")])));
        assert!(app.toots.is_empty());

        app.process_task_result(TaskResult::Toots(UserId::from(2), Ok(vec![toot("b")])));
        assert_eq!(app.toots.len(), 1);
        assert!(app.toots_fresh);
    }

    #[tokio::test]
    async fn test_forms_usable_after_sign_out_mid_request() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);
        app.set_session_view(authenticated(1));
        app.search_form.submitting = true;
        app.trends_form.submitting = true;
        app.toot_form.submitting = true;

        app.set_session_view(Session {
            state: AuthState::Unauthenticated,
            last_error: None,
        });
        app.process_task_result(TaskResult::Search(
            UserId::from(1),
            Err(ApiError::InvalidResponse("late".to_string())),
        ));
        app.set_session_view(authenticated(1));

        assert!(!app.search_form.submitting);
        assert!(!app.trends_form.submitting);
        assert!(!app.toot_form.submitting);
        assert!(app.search_form.error.is_none());
    }

    #[tokio::test]
    async fn test_user_switch_clears_page_data() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);
        app.set_session_view(authenticated(1));
        app.process_task_result(TaskResult::Toots(UserId::from(1), Ok(vec![toot("a")])));
        app.search_result = Some(SearchResult::default());

        app.set_session_view(Session {
            state: AuthState::Unauthenticated,
            last_error: None,
        });
        assert!(app.toots.is_empty());
        assert!(app.search_result.is_none());
    }

    #[tokio::test]
    async fn test_toot_delete_and_selection_clamp() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);
        app.set_session_view(authenticated(1));
        app.route = Route::PostedToots;
        app.process_task_result(TaskResult::Toots(
            UserId::from(1),
            Ok(vec![toot("a"), toot("b")]),
        ));
        app.move_selection(5);
        assert_eq!(app.selection, 1);

        app.process_task_result(TaskResult::TootDeleted(UserId::from(1), "b".to_string(), Ok(())));
        assert_eq!(app.toots.len(), 1);
        assert_eq!(app.selection, 0);
    }

    #[tokio::test]
    async fn test_start_edit_strips_html() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);
        app.set_session_view(authenticated(1));
        app.route = Route::PostedToots;
        app.process_task_result(TaskResult::Toots(UserId::from(1), Ok(vec![toot("a")])));

        app.start_edit_toot();
        assert_eq!(app.state, AppState::EditingToot);
        assert_eq!(app.edit_buffer, "toot a");

        app.edit_buffer = "   ".to_string();
        app.submit_edit_toot();
        assert_eq!(app.state, AppState::EditingToot);
        assert!(matches!(app.notice, Some(Notice { kind: NoticeKind::Error, .. })));
    }

    #[tokio::test]
    async fn test_invalid_forms_never_submit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);

        app.submit_sign_in();
        assert!(!app.sign_in_form.submitting);
        assert!(app.sign_in_form.error.is_some());

        app.submit_sign_up();
        assert!(!app.sign_up_form.submitting);
        assert!(app.sign_up_form.error.is_some());
    }

    #[tokio::test]
    async fn test_login_failure_clears_password() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);
        app.sign_in_form.fields[1].value = "secret".to_string();
        app.sign_in_form.submitting = true;

        app.process_task_result(TaskResult::LoginFailed("Invalid credentials".to_string()));
        assert!(!app.sign_in_form.submitting);
        assert_eq!(app.sign_in_form.value(1), "");
        assert_eq!(app.sign_in_form.error.as_deref(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_sign_up_success_goes_to_sign_in() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(&dir, None);
        app.navigate(Route::SignUp);
        app.sign_up_form.fields[1].value = "new@example.com".to_string();

        app.process_task_result(TaskResult::SignedUp(Ok(())));
        assert_eq!(app.route, Route::SignIn);
        assert_eq!(app.sign_in_form.value(0), "new@example.com");
        assert!(matches!(app.notice, Some(Notice { kind: NoticeKind::Success, .. })));
    }
}
