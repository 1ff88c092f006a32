mod api;
mod app;
mod command;
mod config;
mod pages;
mod session;
mod storage;
mod theme;
mod ui;

use api::{ApiClient, Credentials, NewMovie, Rating};
use app::{App, AppState, Page, Route};
use clap::{Parser, Subcommand};
use command::Outcome;
use config::{Config, Overrides};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use indicatif::{ProgressBar, ProgressStyle};
use pages::FormInput;
use pages::movie_detail::RatingKey;
use session::SessionStore;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use storage::FileStorage;
use theme::{ThemePreference, ThemeStore};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Terminal client for browsing, adding and rating movies
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base address of the API (overrides CINERATE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory for the session file and log (overrides CINERATE_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Colour theme for the TUI
    #[arg(long, value_enum, global = true)]
    theme: Option<ThemePreference>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI (default)
    Run {
        /// Page to open first, e.g. `/movies/3` or `/login`
        route: Option<String>,
    },
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        username: Option<String>,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List ratings for a user (default: yourself) or a movie
    Ratings {
        #[arg(long, conflicts_with = "movie")]
        user: Option<i64>,
        #[arg(long)]
        movie: Option<i64>,
    },
    /// Change details of a movie you created
    EditMovie {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        director: Option<String>,
    },
    /// Delete a movie you created
    DeleteMovie {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(Overrides {
        api_url: cli.api_url,
        data_dir: cli.data_dir,
        theme: cli.theme,
    })?;
    init_logging(&config)?;

    let storage = FileStorage::open(config.storage_path())?;
    let mut session = SessionStore::restore(Box::new(storage));
    let api = ApiClient::new(&config.api_url);
    tracing::info!(
        api_url = %api.base_url(),
        authenticated = session.is_authenticated(),
        "starting"
    );

    match cli.command.unwrap_or(Commands::Run { route: None }) {
        Commands::Run { route } => {
            let start = match route.as_deref() {
                Some(path) => match Route::parse(path) {
                    Some(start) => start,
                    None => {
                        eprintln!("Unknown page: {path}");
                        std::process::exit(2);
                    }
                },
                None => Route::Movies,
            };
            let mut app = App::new(AppState {
                session,
                theme: ThemeStore::new(config.theme),
            });
            if start != Route::Movies {
                app.navigate(start);
            }

            // Init terminal
            let mut terminal = ratatui::init();

            // Main loop
            let result = run_app(&mut terminal, &mut app, &api).await;

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                tracing::error!(error = %e, "TUI exited with error");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Login { username, password } => {
            let username = match username {
                Some(u) => u,
                None => prompt("Username: ")?,
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };
            let pb = spinner("Logging in...")?;
            let result = api
                .auth()
                .login(&Credentials { username, password })
                .await;
            pb.finish_and_clear();
            match result {
                Ok(auth) => {
                    let name = auth.user.username.clone();
                    session.commit(auth)?;
                    eprintln!("Logged in as {name}.");
                }
                Err(e) => {
                    let message = e
                        .field_message("error")
                        .unwrap_or_else(|| "Login failed".to_string());
                    eprintln!("Error: {message}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Logout => {
            session.clear()?;
            eprintln!("Logged out.");
        }
        Commands::Whoami => match session.current() {
            Some(current) => match &current.user.email {
                Some(email) => println!("{} <{email}> (id {})", current.user.username, current.user.id),
                None => println!("{} (id {})", current.user.username, current.user.id),
            },
            None => {
                eprintln!("Not logged in.");
                std::process::exit(1);
            }
        },
        Commands::Ratings { user, movie } => {
            let api = api.with_token(session.access_token());
            let pb = spinner("Fetching ratings...")?;
            let result = match (movie, user.or_else(|| session.user().map(|u| u.id))) {
                (Some(movie_id), _) => api.ratings().for_movie(movie_id).await,
                (None, Some(user_id)) => api.ratings().for_user(user_id).await,
                (None, None) => {
                    pb.finish_and_clear();
                    eprintln!("Not logged in; pass --user or --movie.");
                    std::process::exit(1);
                }
            };
            pb.finish_and_clear();
            let ratings = result?;
            if ratings.is_empty() {
                println!("No ratings yet.");
            }
            for rating in &ratings {
                println!("{}", rating_row(rating));
            }
        }
        Commands::EditMovie {
            id,
            title,
            description,
            year,
            genre,
            director,
        } => {
            if !session.is_authenticated() {
                eprintln!("Log in first with `cinerate login`.");
                std::process::exit(1);
            }
            let api = api.with_token(session.access_token());
            let pb = spinner(&format!("Updating movie {id}..."))?;
            let result = async {
                let current = api.movies().get(id).await?;
                let mut edit = NewMovie::from(&current);
                if let Some(title) = title {
                    edit.title = title;
                }
                if let Some(description) = description {
                    edit.description = description;
                }
                if let Some(year) = year {
                    edit.release_year = year;
                }
                if let Some(genre) = genre {
                    edit.genre = genre;
                }
                if let Some(director) = director {
                    edit.director = director;
                }
                api.movies().update(id, &edit).await
            }
            .await;
            pb.finish_and_clear();
            match result {
                Ok(movie) => eprintln!("Updated \"{}\" ({}).", movie.title, movie.release_year),
                Err(api::ApiError::NotFound) => {
                    eprintln!("Movie {id} not found.");
                    std::process::exit(1);
                }
                Err(e) => {
                    let message = e
                        .validation_summary()
                        .unwrap_or_else(|| e.to_string());
                    eprintln!("Error: {message}");
                    std::process::exit(1);
                }
            }
        }
        Commands::DeleteMovie { id } => {
            if !session.is_authenticated() {
                eprintln!("Log in first with `cinerate login`.");
                std::process::exit(1);
            }
            let api = api.with_token(session.access_token());
            let pb = spinner(&format!("Deleting movie {id}..."))?;
            let result = api.movies().delete(id).await;
            pb.finish_and_clear();
            match result {
                Ok(()) => eprintln!("Deleted movie {id}."),
                Err(api::ApiError::NotFound) => {
                    eprintln!("Movie {id} not found.");
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

/// Log to a file in the data directory; the terminal belongs to the TUI.
fn init_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&config.data_dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

fn spinner(message: &str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn prompt(label: &str) -> Result<String, Box<dyn std::error::Error>> {
    eprint!("{label}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn rating_row(rating: &Rating) -> String {
    let mut row = format!(
        "{:<16} {}  {}",
        rating.author(),
        "★".repeat(rating.score as usize),
        rating.created_at.with_timezone(&chrono::Local).format("%Y-%m-%d")
    );
    if let Some(movie) = rating.movie {
        row.push_str(&format!("  movie {movie}"));
    }
    if let Some(comment) = rating.comment_text() {
        row.push_str(&format!("  {comment}"));
    }
    row
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    api: &ApiClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();

    loop {
        // Run queued requests in the background
        for command in app.take_commands() {
            let api = api.with_token(app.state.session.access_token());
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = command.run(&api).await;
                let _ = tx.send(outcome);
            });
        }

        while let Ok(outcome) = rx.try_recv() {
            app.apply(outcome);
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Short poll so responses show up promptly
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Any key dismisses a notice
    if app.notice.is_some() {
        app.notice = None;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if let Some(picker) = app.theme_picker.as_mut() {
        if let Some(result) = picker.handle_key(key) {
            app.handle_theme_picker(result);
        }
        return;
    }

    if !app.is_editing() && handle_global_key(app, key) {
        return;
    }

    match app.route {
        Route::Movies => handle_list_key(app, key),
        Route::MovieDetail(_) => handle_detail_key(app, key),
        Route::Login | Route::Register | Route::AddMovie => handle_form_key(app, key),
    }
}

/// Navbar shortcuts. Returns whether the key was used.
fn handle_global_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('t') => app.open_theme_picker(),
        KeyCode::Char('m') => app.navigate(Route::Movies),
        KeyCode::Char('a') => app.navigate(Route::AddMovie),
        KeyCode::Char('l') if app.is_authenticated() => app.logout(),
        KeyCode::Char('l') => app.navigate(Route::Login),
        KeyCode::Char('n') if !app.is_authenticated() => app.navigate(Route::Register),
        _ => return false,
    }
    true
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    let Page::Movies(list) = &mut app.page else {
        return;
    };

    if list.editing_search {
        match key.code {
            KeyCode::Enter => app.submit(),
            KeyCode::Esc => list.editing_search = false,
            KeyCode::Backspace => {
                list.search.pop();
            }
            KeyCode::Char(c) => list.search.push(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('/') => list.editing_search = true,
        KeyCode::Down | KeyCode::Char('j') => list.select_next(),
        KeyCode::Up | KeyCode::Char('k') => list.select_prev(),
        KeyCode::Left | KeyCode::Char('[') => app.previous_page(),
        KeyCode::Right | KeyCode::Char(']') => app.next_page(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Esc => {
            // Clear search
            if !list.search.is_empty() {
                list.search.clear();
                app.submit();
            }
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    let Page::MovieDetail(detail) = &mut app.page else {
        return;
    };

    if detail.editing {
        match detail.handle_form_key(key) {
            RatingKey::Submit => app.submit_rating(),
            RatingKey::Leave => detail.editing = false,
            RatingKey::Handled => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.back(),
        KeyCode::Down | KeyCode::Char('j') => detail.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => detail.scroll_up(),
        KeyCode::PageDown => detail.scroll_page_down(),
        KeyCode::PageUp => detail.scroll_page_up(),
        KeyCode::Char('r') | KeyCode::Enter => app.start_rating(),
        KeyCode::Char('o') => {
            let url = detail.movie.as_ref().and_then(|m| m.imdb_url.clone());
            if let Some(url) = url {
                match std::process::Command::new("xdg-open").arg(&url).spawn() {
                    Ok(_) => app.status_msg = format!("Opening: {url}"),
                    Err(e) => {
                        tracing::warn!(error = %e, "could not launch browser");
                        app.status_msg = format!("IMDB: {url} (could not open browser)");
                    }
                }
            }
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    let input = match &mut app.page {
        Page::Login(page) => page.form.handle_key(key),
        Page::Register(page) => page.form.handle_key(key),
        Page::AddMovie(page) => page.handle_key(key),
        _ => FormInput::Ignored,
    };
    match input {
        FormInput::Submit => app.submit(),
        FormInput::Cancel => app.back(),
        FormInput::Edited | FormInput::Moved | FormInput::Ignored => {}
    }
}
