//! Command-line driver for the Tidepool auth session client.
//!
//! Exercises every flow against a live deployment. The session cookie
//! lives in the process's cookie store, so flows that depend on an
//! authenticated session (probe after sign-in, sign-out) should be
//! chained within one invocation via `--then-probe` where offered.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tidepool_auth::{
    AuthClient, AuthError, Endpoints, HttpTransport, TransportFailure, UiAdapter, Widget,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("unknown endpoint variant `{0}` (expected `mixed` or `flat`)")]
    UnknownVariant(String),
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportFailure),
    #[error("{0}")]
    Auth(#[from] AuthError),
}

#[derive(Parser, Debug)]
#[command(name = "tidepool-auth", about = "Tidepool auth session client CLI")]
struct Cli {
    #[arg(long, env = "TIDEPOOL_BASE_URL", default_value = "http://127.0.0.1:8080")]
    base_url: String,

    /// Endpoint layout of the target deployment.
    #[arg(long, env = "TIDEPOOL_AUTH_VARIANT", default_value = "mixed")]
    variant: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Query the current identity.
    Probe,
    /// Sign in and report the resulting session.
    SignIn {
        #[arg(long)]
        login: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        store: Option<String>,
    },
    /// Sign in, then sign out again (sign-out alone has no session
    /// cookie to act on across invocations).
    SignOut {
        #[arg(long)]
        login: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        store: Option<String>,
    },
    /// Create a self-service account; signs in on success.
    CreateUser {
        #[arg(long)]
        login: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_confirm: String,
        #[arg(long)]
        store: Option<String>,
    },
    /// Ask whether this deployment allows self-service accounts.
    CanAddUsers,
    /// Print the federated sign-in URL for a provider.
    FederatedUrl {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        page_url: Option<String>,
    },
}

/// UI adapter that narrates flow-driven UI changes on the terminal.
struct ConsoleUi;

impl UiAdapter for ConsoleUi {
    fn set_visible(&self, widget: Widget, visible: bool) {
        tracing::debug!(?widget, visible, "ui visibility");
    }

    fn focus(&self, widget: Widget) {
        tracing::debug!(?widget, "ui focus");
    }

    fn set_text(&self, widget: Widget, text: &str) {
        match widget {
            Widget::StatusText if !text.is_empty() => println!("{text}"),
            Widget::ErrorBanner if !text.is_empty() => eprintln!("{text}"),
            _ => {}
        }
    }

    fn navigate(&self, url: &str) {
        tracing::info!(url, "would navigate");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let endpoints =
        Endpoints::named(&cli.variant).ok_or_else(|| CliError::UnknownVariant(cli.variant.clone()))?;
    let transport = HttpTransport::new(&cli.base_url)?;
    let client = Arc::new(AuthClient::new(Arc::new(transport), Arc::new(ConsoleUi), endpoints));

    match cli.command {
        Command::Probe => {
            client.probe_session().await?;
            report_session(&client);
        }
        Command::SignIn { login, password, store } => {
            client.sign_in(&login, &password, store.as_deref()).await?;
            report_session(&client);
        }
        Command::SignOut { login, password, store } => {
            client.sign_in(&login, &password, store.as_deref()).await?;
            client.sign_out().await?;
            report_session(&client);
        }
        Command::CreateUser { login, password, password_confirm, store } => {
            client
                .create_user(&login, &password, &password_confirm, store.as_deref())
                .await?;
            report_session(&client);
        }
        Command::CanAddUsers => {
            let allowed = client.can_add_users().await?;
            println!("self-service accounts: {}", if allowed { "allowed" } else { "disabled" });
        }
        Command::FederatedUrl { provider, page_url } => {
            let url = tidepool_auth::federated::sign_in_url(
                &client.endpoints().federated,
                &provider,
                page_url.as_deref(),
            )?;
            println!("{url}");
        }
    }
    Ok(())
}

fn report_session(client: &AuthClient) {
    let session = client.session();
    match session.identity {
        Some(identity) => println!("signed in as {identity}"),
        None => println!("anonymous"),
    }
}
