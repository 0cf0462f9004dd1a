use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use quizmaster_client::config::{ClientConfig, ConfigError};
use quizmaster_client::net::types::RegisterRequest;
use quizmaster_client::net::{ApiClient, ApiError, AuthFailure, AuthFailureHook, api};
use quizmaster_client::router::{RouteError, RouteTarget, Router};
use quizmaster_client::session::{FileStorage, Session, StorageError};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("login rejected: {0}")]
    LoginRejected(String),
}

#[derive(Parser, Debug)]
#[command(name = "quizmaster", about = "Quizmaster API client and route checker")]
struct Cli {
    #[arg(long, global = true, env = "QUIZMASTER_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, global = true, env = "QUIZMASTER_SESSION_FILE", default_value = ".quizmaster-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend is up.
    Ping,
    /// Log in and record the session flags.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "QUIZMASTER_PASSWORD")]
        password: String,
    },
    /// Log out and clear the session flags.
    Logout,
    /// Create a user account.
    Register(RegisterArgs),
    /// Print the cached session flags.
    Status,
    /// List the route table.
    Routes,
    /// Show where a navigation to PATH lands for the current session.
    Navigate { path: String },
    /// GET an API path and print the JSON body.
    Get { path: String },
    /// POST a JSON body to an API path and print the JSON response.
    Post {
        path: String,
        #[arg(long, default_value = "{}")]
        data: String,
    },
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "QUIZMASTER_PASSWORD")]
    password: String,
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    qualification: String,
    #[arg(long, help = "Date of birth, YYYY-MM-DD")]
    dob: String,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }
    let session = Session::new(FileStorage::open(&cli.session_file)?);

    match cli.command {
        Command::Ping => {
            let client = api_client(&config, &session, true)?;
            println!("{}", api::ping(&client).await?.message);
        }
        Command::Login { email, password } => {
            let client = api_client(&config, &session, false)?;
            api::fetch_csrf_token(&client).await?;
            let body = match api::login(&client, &email, &password).await {
                Ok(body) => body,
                Err(e @ ApiError::Unauthorized { .. }) => {
                    return Err(CliError::LoginRejected(e.server_message().unwrap_or_else(|| e.to_string())));
                }
                Err(e) => return Err(e.into()),
            };
            save_cookies(&client, &session);

            let landing = Router::new(session.clone()).navigate("/dashboard")?;
            let role = if body.is_admin { "admin" } else { "user" };
            println!("{} ({role}); landing on {}", body.message, landing.path);
        }
        Command::Logout => {
            let client = api_client(&config, &session, false)?;
            match api::end_session(&client).await {
                Ok(body) => println!("{}", body.message),
                Err(ApiError::Unauthorized { .. }) => println!("server session already ended; local session cleared"),
                Err(e) => return Err(e.into()),
            }
        }
        Command::Register(args) => {
            let client = api_client(&config, &session, true)?;
            if session.csrf_token().is_none() {
                api::fetch_csrf_token(&client).await?;
            }
            let request = RegisterRequest {
                email: args.email,
                password: args.password,
                full_name: args.full_name,
                qualification: args.qualification,
                dob: args.dob,
            };
            println!("{}", api::register(&client, &request).await?.message);
        }
        Command::Status => print_json(&serde_json::to_value(session.flags())?)?,
        Command::Routes => print_routes(&Router::new(session.clone())),
        Command::Navigate { path } => {
            let nav = Router::new(session.clone()).navigate(&path)?;
            print_json(&serde_json::to_value(nav)?)?;
        }
        Command::Get { path } => {
            let client = api_client(&config, &session, true)?;
            let body: Value = client.get_json(&path).await?;
            save_cookies(&client, &session);
            print_json(&body)?;
        }
        Command::Post { path, data } => {
            let payload = serde_json::from_str::<Value>(&data)?;
            let client = api_client(&config, &session, true)?;
            let body: Value = client.post_json(&path, &payload).await?;
            save_cookies(&client, &session);
            print_json(&body)?;
        }
    }
    Ok(())
}

/// Shared client for one invocation, seeded with the saved cookie header.
///
/// With `notify`, a 401 prints a notice pointing at the login screen.
fn api_client(config: &ClientConfig, session: &Session, notify: bool) -> Result<ApiClient, CliError> {
    let mut client = ApiClient::new(config, session.clone())?;
    if notify {
        let hook: AuthFailureHook = Arc::new(|failure: &AuthFailure| {
            eprintln!("{failure}; run `quizmaster login` to continue");
        });
        client = client.with_auth_failure_hook(hook);
    }
    if let Some(cookies) = session.saved_cookies() {
        client.restore_cookies(&cookies)?;
    }
    Ok(client)
}

fn save_cookies(client: &ApiClient, session: &Session) {
    let Some(header) = client.cookie_header() else {
        return;
    };
    if let Err(e) = session.save_cookies(&header) {
        tracing::warn!(error = %e, "failed to save session cookie");
    }
}

fn print_routes(router: &Router) {
    for route in router.table().routes() {
        let target = match route.target {
            RouteTarget::View { view, binding } => format!("{view:?} ({binding:?})"),
            RouteTarget::Redirect(to) => format!("-> {to}"),
        };
        let mut flags = Vec::new();
        if route.meta.requires_auth {
            flags.push("requiresAuth");
        }
        if route.meta.admin_only {
            flags.push("adminOnly");
        }
        if route.meta.user_only {
            flags.push("userOnly");
        }
        if route.meta.requires_admin {
            flags.push("requiresAdmin*");
        }
        println!("{:<34} {:<28} {:<44} {}", route.path, route.name.unwrap_or("-"), target, flags.join(","));
    }

    let dead = router.table().dead_metadata().count();
    if dead > 0 {
        println!();
        println!("* requiresAdmin is not checked by the navigation guard ({dead} routes rely on it)");
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
