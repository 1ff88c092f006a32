use crate::command::{Command, Outcome};
use crate::pages::movie_detail::RATING_FAILED;
use crate::pages::{AddMovie, LoginPage, MovieDetail, MovieList, RegisterPage};
use crate::session::SessionStore;
use crate::theme::{Palette, ThemePreference, ThemeStore};
use crate::ui::theme_toggle::{ThemePicker, ThemePickerResult};

/// Addressable screens, named after their paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Movies,
    Login,
    Register,
    MovieDetail(i64),
    AddMovie,
}

impl Route {
    pub fn path(self) -> String {
        match self {
            Self::Movies => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::MovieDetail(id) => format!("/movies/{id}"),
            Self::AddMovie => "/movies/add".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Self::Movies),
            "/login" => Some(Self::Login),
            "/register" => Some(Self::Register),
            "/movies/add" => Some(Self::AddMovie),
            _ => trimmed
                .strip_prefix("/movies/")
                .and_then(|id| id.parse().ok())
                .map(Self::MovieDetail),
        }
    }

    /// Only signed-in users may open this route.
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::AddMovie)
    }
}

/// State of the page mounted for the current route.
#[derive(Debug, Clone)]
pub enum Page {
    Movies(MovieList),
    Login(LoginPage),
    Register(RegisterPage),
    MovieDetail(MovieDetail),
    AddMovie(AddMovie),
}

/// Session and theme, handed to every page through the app.
pub struct AppState {
    pub session: SessionStore,
    pub theme: ThemeStore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Pop-up message acknowledged with any key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Main application state.
pub struct App {
    pub state: AppState,
    pub route: Route,
    pub page: Page,
    history: Vec<Route>,

    // Requests waiting for the event loop
    commands: Vec<Command>,

    pub notice: Option<Notice>,
    pub show_help: bool,
    pub theme_picker: Option<ThemePicker>,
    pub should_quit: bool,
    pub status_msg: String,
}

impl App {
    /// Start on the movie list; its first page is requested right away.
    pub fn new(state: AppState) -> Self {
        let mut app = Self {
            state,
            route: Route::Movies,
            page: Page::Movies(MovieList::new()),
            history: Vec::new(),
            commands: Vec::new(),
            notice: None,
            show_help: false,
            theme_picker: None,
            should_quit: false,
            status_msg: String::new(),
        };
        app.enter(Route::Movies);
        app
    }

    pub fn palette(&self) -> Palette {
        self.state.theme.palette()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.session.is_authenticated()
    }

    /// Requests queued since the last call.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    fn request(&mut self, command: Command) {
        tracing::debug!(command = command.name(), "queued request");
        self.commands.push(command);
    }

    pub fn navigate(&mut self, route: Route) {
        self.history.push(self.route);
        self.enter(route);
    }

    /// Return to the previous route, or the movie list when there is none.
    pub fn back(&mut self) {
        let previous = self.history.pop().unwrap_or(Route::Movies);
        self.enter(previous);
    }

    /// Mount a fresh page for `route`, redirecting guarded routes to login.
    fn enter(&mut self, route: Route) {
        let route = if route.requires_auth() && !self.is_authenticated() {
            tracing::info!(path = %route.path(), "redirecting to login");
            Route::Login
        } else {
            route
        };
        self.route = route;
        self.status_msg.clear();
        self.page = match route {
            Route::Movies => {
                let mut list = MovieList::new();
                let query = list.reload();
                self.request(Command::LoadMovies(query));
                Page::Movies(list)
            }
            Route::Login => Page::Login(LoginPage::new()),
            Route::Register => Page::Register(RegisterPage::new()),
            Route::MovieDetail(id) => {
                self.request(Command::LoadMovie(id));
                Page::MovieDetail(MovieDetail::new(id))
            }
            Route::AddMovie => Page::AddMovie(AddMovie::new()),
        };
    }

    /// Fold a finished request into whichever page it belongs to.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Movies(result) => match &mut self.page {
                Page::Movies(list) => list.apply(result),
                _ => tracing::debug!("dropping movie list response for inactive page"),
            },
            Outcome::Movie { id, result } => match &mut self.page {
                Page::MovieDetail(detail) if detail.id == id => {
                    detail.apply_movie(result, self.state.session.user());
                    // A saved rating is confirmed once the refreshed movie is in.
                    if let Some(message) = detail.pending_notice.take() {
                        self.notice = Some(Notice::success(message));
                    }
                }
                _ => tracing::debug!(id, "dropping movie response for inactive page"),
            },
            Outcome::RatingSubmitted {
                movie_id,
                mode,
                result,
            } => {
                let detail = match &mut self.page {
                    Page::MovieDetail(detail) if detail.id == movie_id => {
                        detail.submitting = false;
                        Some(detail)
                    }
                    _ => None,
                };
                match result {
                    Ok(()) => {
                        tracing::info!(movie_id, ?mode, "rating saved");
                        match detail {
                            Some(detail) => {
                                detail.pending_notice = Some(mode.success_message());
                                self.request(Command::LoadMovie(movie_id));
                            }
                            None => self.notice = Some(Notice::success(mode.success_message())),
                        }
                    }
                    Err(e) => {
                        tracing::warn!(movie_id, error = %e, "rating failed");
                        self.notice = Some(Notice::error(RATING_FAILED));
                    }
                }
            }
            Outcome::MovieCreated(result) => {
                let created = match &mut self.page {
                    Page::AddMovie(page) => page.apply(result),
                    _ => None,
                };
                if let Some(id) = created {
                    self.navigate(Route::MovieDetail(id));
                }
            }
            Outcome::LoggedIn(result) => {
                let auth = match &mut self.page {
                    Page::Login(page) => page.apply(result),
                    _ => None,
                };
                if let Some(auth) = auth {
                    self.sign_in(auth);
                }
            }
            Outcome::Registered(result) => {
                let auth = match &mut self.page {
                    Page::Register(page) => page.apply(result),
                    _ => None,
                };
                if let Some(auth) = auth {
                    self.sign_in(auth);
                }
            }
        }
    }

    fn sign_in(&mut self, auth: crate::api::AuthResponse) {
        if let Err(e) = self.state.session.commit(auth) {
            tracing::error!(error = %e, "failed to persist session");
            self.notice = Some(Notice::error(format!("Could not save session: {e}")));
        }
        self.navigate(Route::Movies);
    }

    /// Forget the session and return to the movie list.
    pub fn logout(&mut self) {
        if let Err(e) = self.state.session.clear() {
            tracing::error!(error = %e, "failed to clear stored session");
            self.notice = Some(Notice::error(format!("Could not clear session: {e}")));
        }
        self.navigate(Route::Movies);
    }

    /// Submit whichever form the current page shows.
    pub fn submit(&mut self) {
        if matches!(self.page, Page::MovieDetail(_)) {
            return self.submit_rating();
        }
        let command = match &mut self.page {
            Page::Login(page) => page.begin_submit().map(Command::Login),
            Page::Register(page) => page.begin_submit().map(Command::Register),
            Page::AddMovie(page) => page.begin_submit().map(Command::CreateMovie),
            Page::Movies(list) => Some(Command::LoadMovies(list.submit_search())),
            Page::MovieDetail(_) => None,
        };
        if let Some(command) = command {
            self.request(command);
        }
    }

    /// Open the rating form, or send anonymous visitors to login.
    pub fn start_rating(&mut self) {
        if !self.is_authenticated() {
            self.navigate(Route::Login);
            return;
        }
        if let Page::MovieDetail(detail) = &mut self.page {
            if detail.movie.is_some() {
                detail.editing = true;
            }
        }
    }

    pub fn submit_rating(&mut self) {
        if !self.is_authenticated() {
            self.navigate(Route::Login);
            return;
        }
        let Page::MovieDetail(detail) = &mut self.page else {
            return;
        };
        let movie_id = detail.id;
        if let Some((input, mode)) = detail.begin_submit() {
            self.request(Command::SubmitRating {
                movie_id,
                input,
                mode,
            });
        }
    }

    pub fn next_page(&mut self) {
        if let Page::Movies(list) = &mut self.page {
            if let Some(query) = list.next_page() {
                self.request(Command::LoadMovies(query));
            }
        }
    }

    pub fn previous_page(&mut self) {
        if let Page::Movies(list) = &mut self.page {
            if let Some(query) = list.previous_page() {
                self.request(Command::LoadMovies(query));
            }
        }
    }

    /// Open the detail page of the highlighted movie.
    pub fn open_selected(&mut self) {
        let id = match &self.page {
            Page::Movies(list) => list.selected_movie().map(|m| m.id),
            _ => None,
        };
        if let Some(id) = id {
            self.navigate(Route::MovieDetail(id));
        }
    }

    pub fn open_theme_picker(&mut self) {
        self.theme_picker = Some(ThemePicker::new(self.state.theme.preference()));
    }

    pub fn handle_theme_picker(&mut self, result: ThemePickerResult) {
        if let ThemePickerResult::Select(preference) = result {
            self.set_theme(preference);
        }
        self.theme_picker = None;
    }

    pub fn set_theme(&mut self, preference: ThemePreference) {
        self.state.theme.set(preference);
    }

    /// Whether a text input currently owns the keyboard.
    pub fn is_editing(&self) -> bool {
        match &self.page {
            Page::Movies(list) => list.editing_search,
            Page::MovieDetail(detail) => detail.editing,
            Page::Login(_) | Page::Register(_) | Page::AddMovie(_) => true,
        }
    }
}
