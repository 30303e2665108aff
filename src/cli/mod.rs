mod admin;
mod contact;
pub mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{
    ClientConfig, DEFAULT_ADMIN_API_BASE_URL, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
use crate::services::fallback::COMPANY;
use crate::services::{AdminService, CatalogService, SessionManager, TokenStore};
use crate::types::Outcome;

pub use admin::{AdminArgs, AdminCommand};
pub use contact::ContactArgs;

/// Go Cab ride catalog and admin console
#[derive(Parser)]
#[command(name = "gocab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Public catalog backend
    #[arg(long, global = true, env = "GOCAB_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Admin backend
    #[arg(long, global = true, env = "GOCAB_ADMIN_API_URL", default_value = DEFAULT_ADMIN_API_BASE_URL)]
    admin_api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "GOCAB_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, value_name = "SECS")]
    timeout: u64,

    /// Where the admin token is kept (default ~/.gocab/session.json)
    #[arg(long, global = true, env = "GOCAB_SESSION_FILE", value_name = "PATH")]
    session_file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the company profile (offline)
    Company,

    /// Check that the catalog backend is up
    Health,

    /// List active categories
    Categories,

    /// List services in a category
    Services {
        /// Category slug, e.g. airport_transfer
        slug: String,
    },

    /// Categories with all their services
    Catalog,

    /// Submit a callback request
    Contact(ContactArgs),

    /// Admin console (requires login)
    Admin(AdminArgs),
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.global.verbose
    }

    pub fn run(self) -> anyhow::Result<ExitCode> {
        let json = self.global.json;
        if let Commands::Company = self.command {
            return output::emit(&Outcome::Live(COMPANY), json, output::company);
        }

        let config = ClientConfig::new(
            &self.global.api_url,
            &self.global.admin_api_url,
            self.global.timeout,
            self.global.session_file,
        )?;

        match self.command {
            Commands::Admin(args) => {
                let admin = AdminService::new(Box::new(config.admin_transport()?));
                let sessions = SessionManager::new(TokenStore::new(config.session_path.clone()));
                args.run(&admin, &sessions, json)
            }
            command => {
                let catalog = CatalogService::new(Box::new(config.catalog_transport()?));
                run_public(command, &catalog, json)
            }
        }
    }
}

fn run_public(
    command: Commands,
    catalog: &CatalogService,
    json: bool,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Company => output::emit(&Outcome::Live(COMPANY), json, output::company),
        Commands::Health => output::emit(&catalog.health(), json, |_| {
            "Backend is reachable.\n".to_string()
        }),
        Commands::Categories => {
            output::emit(&catalog.categories(), json, |cats| output::categories(cats))
        }
        Commands::Services { slug } => output::emit(
            &catalog.services_by_category(&slug),
            json,
            output::category_services,
        ),
        Commands::Catalog => output::emit(&catalog.load_catalog(), json, output::catalog),
        Commands::Contact(args) => output::emit(
            &catalog.submit_contact(&args.into_submission()),
            json,
            output::done("Thank you! We will call you back shortly."),
        ),
        Commands::Admin(_) => anyhow::bail!("admin commands need the admin backend"),
    }
}
