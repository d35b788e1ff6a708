//! `DataElf` Authorization - command-line entry point
//!
//! Inspects the catalog and resolves permissions for stored user records.

use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use dataelf_authz::permissions::{Permission, PermissionKind, PermissionResolver};
use dataelf_authz::{config, observability, User};

#[derive(Parser)]
#[clap(version, about = "Resolve DataElf admin permissions")]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every catalog permission
    Catalog,
    /// Print the effective permission set of a user record
    List {
        /// JSON user record, or `-` for stdin
        #[clap(short, long)]
        user: PathBuf,
    },
    /// Check a single permission; exits non-zero on deny
    Check {
        /// JSON user record, or `-` for stdin
        #[clap(short, long)]
        user: PathBuf,
        /// Permission code, e.g. `content_review`
        permission: String,
    },
}

fn read_user(path: &Path) -> Result<User> {
    let json = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read user record from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    User::from_json(&json).context("failed to parse user record")
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;
    observability::init(&config.observability)?;

    let cli = Cli::parse();
    let resolver = PermissionResolver::new();

    match cli.command {
        Command::Catalog => {
            for perm in Permission::all() {
                let kind = match perm.kind() {
                    PermissionKind::Action => "action",
                    PermissionKind::Menu => "menu",
                };
                println!("{:<24}{:<8}{}", perm.code(), kind, perm.description());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::List { user } => {
            let user = read_user(&user)?;
            let perms = resolver.get_permissions(&user);
            println!("{}", serde_json::to_string(&perms)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { user, permission } => {
            let user = read_user(&user)?;
            let allowed = resolver.has_permission(Some(&user), &permission);
            info!(user_id = user.id, permission = %permission, allowed, "Permission checked");

            if allowed {
                println!("allow");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("deny");
                Ok(ExitCode::from(1))
            }
        }
    }
}
