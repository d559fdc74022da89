use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use rickmorty_api::Character;
use rickmorty_app::{
    auth::guards::{guard, GuardOutcome},
    global_state::{FileStorage, SessionState},
    routes::{
        characters_page::LoadStatus, CharacterDetailsPage, CharactersPage, Header, LoginPage,
        RegisterPage, Route,
    },
    translate::{format_episode_code, gender_translate, status_translate},
    AppConfig, AppError, AuthMode,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Browse Rick and Morty characters from the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Character API base URL
    #[arg(long, env = "RICKMORTY_API_URL", default_value = "https://rickandmortyapi.com/api")]
    api_url: String,

    /// Credential store used by login and register
    #[arg(long, env = "RICKMORTY_AUTH_MODE", default_value_t = AuthMode::Mock)]
    auth_mode: AuthMode,

    /// User API base URL, used with `--auth-mode remote`
    #[arg(long, env = "RICKMORTY_AUTH_URL", default_value = "http://api-auth.academy.mobydigital.com/api")]
    auth_url: String,

    /// Where the signed in session is kept between runs
    #[arg(long, env = "RICKMORTY_SESSION_FILE", default_value = ".rickmorty-session.json")]
    session_file: PathBuf,

    /// Simulated latency of the mock credential store
    #[arg(long, env = "RICKMORTY_MOCK_LATENCY_MS", default_value_t = 1000)]
    mock_latency_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a page of characters
    Characters {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Only characters whose name contains this
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one character and the episodes they appear in
    Character { id: u32 },
    /// Open an app path such as `/characters/2` or `/auth/login`
    Open { path: String },
    Login {
        #[arg(short, long)]
        mail: String,
        #[arg(short, long, env = "RICKMORTY_PASSWORD")]
        password: String,
    },
    Register {
        /// First and last name
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        mail: String,
        #[arg(short, long)]
        password: String,
        /// Password confirmation, defaults to `--password`
        #[arg(long)]
        password2: Option<String>,
        #[arg(long, default_value = "")]
        street: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        region: String,
        #[arg(long, default_value = "")]
        postal_code: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        birthday: String,
    },
    Logout,
    Whoami,
}

impl Args {
    fn config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_url.clone(),
            auth_mode: self.auth_mode,
            auth_base_url: self.auth_url.clone(),
            session_file: self.session_file.clone(),
            mock_latency_ms: self.mock_latency_ms,
            ..Default::default()
        }
    }
}

fn print_character_line(character: &Character) {
    println!(
        "#{:<4} {} - {} · {} · {}",
        character.id,
        character.name,
        status_translate(&character.status),
        character.species,
        gender_translate(&character.gender)
    );
}

async fn list_characters(config: &AppConfig, page: u32, search: Option<&str>) -> Result<()> {
    let characters = CharactersPage::new(Arc::new(config.character_client()?))
        .with_debounce(config.search_debounce())
        .with_page_size(config.page_size);
    if let Some(term) = search {
        characters.set_search(term);
    }
    characters.load_page(page).await;
    let state = characters.state();
    if state.status == LoadStatus::Error {
        bail!(state.error.unwrap_or_default());
    }
    for character in &state.characters {
        print_character_line(character);
    }
    let window: Vec<String> = characters
        .pages()
        .iter()
        .map(|p| {
            if *p == state.page {
                format!("[{p}]")
            } else {
                p.to_string()
            }
        })
        .collect();
    println!();
    println!(
        "{} {} {}   ({} de {})",
        if characters.can_go_back() { "<" } else { " " },
        window.join(" "),
        if characters.can_go_forward() { ">" } else { " " },
        state.page,
        state.total_pages
    );
    Ok(())
}

async fn show_character(config: &AppConfig, id: u32) -> Result<()> {
    let details = CharacterDetailsPage::new(Arc::new(config.character_client()?));
    details.load(id).await;
    let state = details.state();
    if let Some(error) = state.error {
        bail!(error);
    }
    let Some(character) = state.character else {
        bail!("Character {id} not found");
    };
    print_character_line(&character);
    if !character.kind.is_empty() {
        println!("  Tipo: {}", character.kind);
    }
    if let Some(origin) = &character.origin {
        println!("  Origen: {}", origin.name);
    }
    if let Some(location) = &character.location {
        println!("  Ubicación: {}", location.name);
    }
    println!("  Episodios ({}):", state.episode_ids.len());
    if state.episodes.is_empty() {
        println!("    {}", state.episode_ids.join(", "));
    }
    for episode in &state.episodes {
        println!(
            "    {} {} ({})",
            format_episode_code(&episode.episode),
            episode.name,
            episode.air_date
        );
    }
    Ok(())
}

async fn login(config: &AppConfig, session: SessionState, mail: &str, password: &str) -> Result<()> {
    let mut page = match LoginPage::open(config.auth_backend(), session) {
        Ok(page) => page,
        Err(AppError::Redirected(route)) => {
            println!("Ya has iniciado sesión ({route})");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    page.form.mail.set_value(mail);
    page.form.password.set_value(password);
    match page.submit().await {
        Ok(route) => {
            info!("login redirect to {route}");
            println!("Sesión iniciada como {mail}");
            Ok(())
        }
        Err(AppError::InvalidForm) => {
            for (field, control) in [("mail", &page.form.mail), ("password", &page.form.password)] {
                if let Some(text) = control.error_text() {
                    println!("{field}: {text}");
                }
            }
            bail!(AppError::InvalidForm)
        }
        Err(e) => {
            debug!("login failed {e}");
            bail!(page.login_error().unwrap_or_default().to_string())
        }
    }
}

struct Registration {
    name: String,
    mail: String,
    password: String,
    password2: Option<String>,
    street: String,
    city: String,
    region: String,
    postal_code: String,
    phone: String,
    birthday: String,
}

async fn register(config: &AppConfig, session: &SessionState, data: Registration) -> Result<()> {
    let mut page = match RegisterPage::open(config.auth_backend(), session) {
        Ok(page) => page,
        Err(AppError::Redirected(route)) => {
            println!("Ya has iniciado sesión ({route})");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let form = &mut page.form;
    form.name.set_value(data.name);
    form.mail.set_value(data.mail);
    form.password2
        .set_value(data.password2.unwrap_or_else(|| data.password.clone()));
    form.password.set_value(data.password);
    form.street.set_value(data.street);
    form.city.set_value(data.city);
    form.region.set_value(data.region);
    form.postal_code.set_value(data.postal_code);
    form.phone.set_value(data.phone);
    form.birthday.set_value(data.birthday);

    match page.submit().await {
        Ok(route) => {
            if let Some(ack) = page.registered() {
                println!("{} ({})", ack.message, ack.mail);
            }
            println!("Ahora puedes iniciar sesión en {route}");
            Ok(())
        }
        Err(AppError::InvalidForm) => {
            let form = &page.form;
            for (field, control) in [
                ("name", &form.name),
                ("mail", &form.mail),
                ("password", &form.password),
                ("password2", &form.password2),
            ] {
                if let Some(text) = control.error_text() {
                    println!("{field}: {text}");
                }
            }
            if let Some(text) = form.group_error_text() {
                println!("{text}");
            }
            bail!(AppError::InvalidForm)
        }
        Err(e) => {
            debug!("register failed {e}");
            bail!(page.register_error().unwrap_or_default().to_string())
        }
    }
}

fn whoami(session: &SessionState) {
    let header = Header::new(session.clone());
    match session.current_user() {
        Some(user) if header.is_logged_in() => println!("{} <{}>", user.name, user.mail),
        _ if header.is_logged_in() => println!("Sesión iniciada"),
        _ => println!("Invitado"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is the program's output, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = args.config();
    let session = SessionState::new(Arc::new(FileStorage::new(&config.session_file)));
    debug!("using {config:?}");

    match args.command {
        Command::Characters { page, search } => {
            list_characters(&config, page, search.as_deref()).await?
        }
        Command::Character { id } => show_character(&config, id).await?,
        Command::Open { path } => {
            let route = match guard(Route::resolve(&path), &session) {
                GuardOutcome::Allow => Route::resolve(&path),
                GuardOutcome::Redirect(route) => route,
            };
            println!("{route}");
            match route {
                Route::Characters => list_characters(&config, 1, None).await?,
                Route::CharacterDetails(id) => show_character(&config, id).await?,
                Route::Login | Route::Register => {
                    println!("Usa `rickmorty login` o `rickmorty register`")
                }
            }
        }
        Command::Login { mail, password } => login(&config, session, &mail, &password).await?,
        Command::Register {
            name,
            mail,
            password,
            password2,
            street,
            city,
            region,
            postal_code,
            phone,
            birthday,
        } => {
            let data = Registration {
                name,
                mail,
                password,
                password2,
                street,
                city,
                region,
                postal_code,
                phone,
                birthday,
            };
            register(&config, &session, data).await?
        }
        Command::Logout => {
            let route = Header::new(session).logout()?;
            println!("Sesión cerrada ({route})");
        }
        Command::Whoami => whoami(&session),
    }
    Ok(())
}
