//! Operator CLI for the user info core.
//!
//! Every account and profile operation can be driven from the terminal,
//! which makes it the quickest way to exercise a deployment end to end.
//!
//! # Usage
//!
//! ```bash
//! userinfo migrate
//! userinfo register --email a@x.com            # prompts for the password
//! userinfo login --email a@x.com --password p1
//! userinfo authenticate <token>
//! userinfo profile create --user-id 1 --username alice --birthday 1990-05-17
//! userinfo profile update 1 --username bob
//! userinfo profile get 1
//! userinfo profile delete 1 --yes
//! userinfo db check
//! userinfo cache check
//! ```
//!
//! # Environment Variables
//!
//! See [`userinfo::config`]. `.env` is loaded when present.

use userinfo::bootstrap;
use userinfo::config::{self, Config};
use userinfo::domain::entities::Profile;
use userinfo::dto::{LoginRequest, RegisterRequest};
use userinfo::error::AppError;
use userinfo::infrastructure::cache::{CacheService, RedisCache};
use userinfo::state::AppState;
use userinfo::telemetry;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Password};

/// CLI tool for the user info core.
#[derive(Parser)]
#[command(name = "userinfo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations to the primary
    Migrate,

    /// Register a new account
    Register(Credentials),

    /// Log in and print a session token
    Login(Credentials),

    /// Resolve a session token to its user
    Authenticate {
        /// Session token printed by `login`
        token: String,
    },

    /// Log out (sessions are stateless; the token is simply discarded)
    Logout,

    /// Manage profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Cache operations
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Args)]
struct Credentials {
    #[arg(short, long)]
    email: String,

    /// Prompted for when omitted
    #[arg(short, long)]
    password: Option<String>,
}

/// Profile fields; omitted fields are left unchanged on update.
#[derive(Args)]
struct ProfileFields {
    #[arg(long)]
    username: Option<String>,

    /// Date in YYYY-MM-DD format
    #[arg(long)]
    birthday: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    avatar_url: Option<String>,
}

impl ProfileFields {
    fn into_profile(self, user_id: i64) -> Profile {
        Profile {
            user_id,
            username: self.username.unwrap_or_default(),
            birthday: self.birthday.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            avatar_url: self.avatar_url.unwrap_or_default(),
            ..Profile::default()
        }
    }
}

/// Profile subcommands.
#[derive(Subcommand)]
enum ProfileAction {
    /// Show a profile
    Get { user_id: i64 },

    /// Create a profile
    Create {
        #[arg(long)]
        user_id: i64,

        #[command(flatten)]
        fields: ProfileFields,
    },

    /// Update the given fields of a profile
    Update {
        user_id: i64,

        #[command(flatten)]
        fields: ProfileFields,
    },

    /// Delete a profile
    Delete {
        user_id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check primary and replica connections
    Check,
}

/// Cache subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// Check the configured cache backend
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    telemetry::init(&config.log_level, &config.log_format);
    config.print_summary();

    match cli.command {
        Commands::Migrate => handle_migrate(&config).await?,
        Commands::Db { action } => handle_db_action(action, &config).await?,
        Commands::Cache { action } => handle_cache_action(action, &config).await?,
        command => {
            let state = bootstrap::build_state(&config).await?;
            handle_core_command(command, &state).await?;
        }
    }

    Ok(())
}

async fn handle_migrate(config: &Config) -> Result<()> {
    println!("{}", "Applying migrations...".bright_blue());

    let pool = bootstrap::connect_pool(&config.database_url, config).await?;
    bootstrap::migrate(&pool).await?;

    println!("{}", "Migrations applied".green().bold());
    Ok(())
}

/// Dispatches commands that go through the services.
async fn handle_core_command(command: Commands, state: &AppState) -> Result<()> {
    match command {
        Commands::Register(creds) => register(state, creds).await,
        Commands::Login(creds) => login(state, creds).await,
        Commands::Authenticate { token } => authenticate(state, &token).await,
        Commands::Logout => {
            state.accounts.logout(&state.context()).await;
            println!("{}", "Logged out. Discard your token.".green());
            Ok(())
        }
        Commands::Profile { action } => handle_profile_action(state, action).await,
        Commands::Migrate | Commands::Db { .. } | Commands::Cache { .. } => Ok(()),
    }
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => Ok(Password::new().with_prompt("Password").interact()?),
    }
}

/// Prints a service error and converts it for the process exit status.
fn report(err: AppError) -> anyhow::Error {
    let body = err.body();
    eprintln!(
        "{} {} ({})",
        "Error:".red().bold(),
        body.message.red(),
        body.code.to_string().bright_black()
    );
    if !body.details.is_null() && body.details != serde_json::json!({}) {
        eprintln!("  {}", body.details.to_string().bright_black());
    }
    err.into()
}

async fn register(state: &AppState, creds: Credentials) -> Result<()> {
    let request = RegisterRequest {
        email: creds.email,
        password: password_or_prompt(creds.password)?,
    };
    request.check().map_err(report)?;

    let account = state
        .accounts
        .register(&state.context(), &request.email, &request.password)
        .await
        .map_err(report)?;

    println!("{}", "Account registered".green().bold());
    println!("  ID:    {}", account.id.to_string().bright_white());
    println!("  Email: {}", account.email.cyan());
    Ok(())
}

async fn login(state: &AppState, creds: Credentials) -> Result<()> {
    let request = LoginRequest {
        email: creds.email,
        password: password_or_prompt(creds.password)?,
    };
    request.check().map_err(report)?;

    let token = state
        .accounts
        .login(&state.context(), &request.email, &request.password)
        .await
        .map_err(report)?;

    println!("{}", "Login succeeded".green().bold());
    println!("  Token: {}", token.bright_yellow());
    Ok(())
}

async fn authenticate(state: &AppState, token: &str) -> Result<()> {
    let identity = state
        .accounts
        .authenticate(&state.context(), token)
        .await
        .map_err(report)?;

    println!("{}", "Token valid".green().bold());
    println!("  User ID: {}", identity.user_id.to_string().bright_white());
    println!("  Email:   {}", identity.email.cyan());
    Ok(())
}

/// Dispatches profile commands.
async fn handle_profile_action(state: &AppState, action: ProfileAction) -> Result<()> {
    match action {
        ProfileAction::Get { user_id } => {
            let ctx = state.context().with_user(user_id);
            let profile = state
                .profiles
                .get_profile(&ctx, user_id)
                .await
                .map_err(report)?;

            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Create { user_id, fields } => {
            let ctx = state.context().with_user(user_id);
            state
                .profiles
                .create_profile(&ctx, fields.into_profile(user_id))
                .await
                .map_err(report)?;

            println!("{}", "Profile created".green().bold());
        }
        ProfileAction::Update { user_id, fields } => {
            let ctx = state.context().with_user(user_id);
            state
                .profiles
                .update_profile(&ctx, user_id, fields.into_profile(0))
                .await
                .map_err(report)?;

            println!("{}", "Profile updated".green().bold());
        }
        ProfileAction::Delete { user_id, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete profile of user {user_id}?"))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "Cancelled".red());
                    return Ok(());
                }
            }

            let ctx = state.context().with_user(user_id);
            state
                .profiles
                .delete_profile(&ctx, user_id)
                .await
                .map_err(report)?;

            println!("{}", "Profile deleted".green().bold());
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connections...".bright_blue());

            let primary = bootstrap::connect_pool(&config.database_url, config).await?;
            sqlx::query("SELECT 1").fetch_one(&primary).await?;
            println!("{}", "Primary connection OK".green().bold());

            if config.has_replica() {
                let replica =
                    bootstrap::connect_pool(&config.replica_database_url, config).await?;
                sqlx::query("SELECT 1").fetch_one(&replica).await?;
                println!("{}", "Replica connection OK".green().bold());
            } else {
                println!("{}", "No replica configured, reads use the primary".yellow());
            }
        }
    }

    Ok(())
}

/// Handles cache diagnostic commands.
async fn handle_cache_action(action: CacheAction, config: &Config) -> Result<()> {
    match action {
        CacheAction::Check => {
            let Some(redis_url) = &config.redis_url else {
                println!("{}", "Cache disabled: no Redis configured".yellow());
                return Ok(());
            };

            println!("{}", "Checking cache connection...".bright_blue());
            let cache = RedisCache::connect(redis_url, config.cache_op_timeout())
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?;

            if cache.health_check().await {
                println!("{}", "Cache connection OK".green().bold());
            } else {
                anyhow::bail!("cache is configured but not reachable");
            }
        }
    }

    Ok(())
}
