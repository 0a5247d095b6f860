//! # Backoffice Admin Tool
//!
//! ```text
//! backoffice migrate
//! backoffice create-user --email <email> --name <name> --password <password> [--admin]
//! backoffice purge-sessions
//! backoffice summary
//! ```
//!
//! Reads the same `SHOPFRONT_*` environment as the services.

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use shopfront_backoffice::{init_tracing, start_of_today, AppConfig, Backoffice};
use shopfront_core::Role;

const USAGE: &str = "usage: backoffice <migrate | create-user --email E --name N --password P [--admin] | purge-sessions | summary>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Migrate,
    CreateUser {
        email: String,
        name: String,
        password: String,
        role: Role,
    },
    PurgeSessions,
    Summary,
}

fn parse_args(args: &[String]) -> Result<Command> {
    let (command, rest) = args.split_first().ok_or_else(|| anyhow!(USAGE))?;

    match command.as_str() {
        "migrate" => Ok(Command::Migrate),
        "purge-sessions" => Ok(Command::PurgeSessions),
        "summary" => Ok(Command::Summary),
        "create-user" => {
            let mut email = None;
            let mut name = None;
            let mut password = None;
            let mut role = Role::User;

            let mut iter = rest.iter();
            while let Some(flag) = iter.next() {
                match flag.as_str() {
                    "--admin" => role = Role::Admin,
                    "--email" | "--name" | "--password" => {
                        let value = iter
                            .next()
                            .cloned()
                            .ok_or_else(|| anyhow!("{} needs a value", flag))?;
                        match flag.as_str() {
                            "--email" => email = Some(value),
                            "--name" => name = Some(value),
                            _ => password = Some(value),
                        }
                    }
                    other => bail!("unknown option {}\n{}", other, USAGE),
                }
            }

            Ok(Command::CreateUser {
                email: email.context("--email is required")?,
                name: name.context("--name is required")?,
                password: password.context("--password is required")?,
                role,
            })
        }
        other => bail!("unknown command {}\n{}", other, USAGE),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    let config = AppConfig::from_env()?;
    info!(path = %config.database_path.display(), "Opening database");
    let backoffice = Backoffice::connect(config).await?;

    match command {
        Command::Migrate => {
            backoffice.db().run_migrations().await?;
            let (total, applied) = backoffice.db().migration_status().await?;
            println!("migrations applied: {}/{}", applied, total);
        }
        Command::CreateUser {
            email,
            name,
            password,
            role,
        } => {
            shopfront_core::validation::validate_email(&email)?;
            shopfront_core::validation::validate_password(&password)?;
            let user = backoffice
                .auth()
                .create_user(&email, &password, &name, role)
                .await?;
            println!("created user {} ({:?})", user.email, user.role);
        }
        Command::PurgeSessions => {
            let removed = backoffice.auth().purge_expired_sessions().await?;
            println!("removed {} expired sessions", removed);
        }
        Command::Summary => {
            let summary = backoffice.dashboard().summary(start_of_today()).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    backoffice.db().close().await;
    Ok(())
}
