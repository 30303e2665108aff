//! `gocab admin` subcommands

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;

use super::output;
use crate::services::{
    AdminService, CategoryDraft, Credentials, ImageUpload, ServiceDraft, Session, SessionManager,
    SessionState,
};
use crate::types::{ContactFilters, ContactStatus, Outcome, RecordStatus};

const NOT_LOGGED_IN: &str = "Not logged in. Run `gocab admin login` first.";

#[derive(Args, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Log in and store the session token
    Login {
        #[arg(long, env = "GOCAB_ADMIN_EMAIL")]
        email: String,

        #[arg(long, env = "GOCAB_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out and forget the stored token
    Logout,

    /// Show whether a session is stored
    Status,

    /// Category, service and contact counts
    Dashboard,

    /// Manage categories
    #[command(subcommand)]
    Categories(CategoryCommand),

    /// Manage services
    #[command(subcommand)]
    Services(ServiceCommand),

    /// Manage contact leads
    #[command(subcommand)]
    Contacts(ContactCommand),
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    List,
    Create(CategoryFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: CategoryFields,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct CategoryFields {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: String,

    /// Hide from the public catalog
    #[arg(long)]
    pub inactive: bool,
}

impl CategoryFields {
    fn into_draft(self) -> CategoryDraft {
        CategoryDraft {
            name: self.name,
            description: self.description,
            status: status_for(self.inactive),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ServiceCommand {
    List,
    /// Services under one category id
    ByCategory {
        category_id: String,
    },
    Create(ServiceFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: ServiceFields,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct ServiceFields {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: String,

    /// Owning category id
    #[arg(long)]
    pub category: String,

    #[arg(long)]
    pub price: f64,

    /// Unit label, e.g. "Per KM" or "One Way"
    #[arg(long, default_value = "")]
    pub duration: String,

    /// Comma-separated, e.g. "AC Vehicle, GPS Tracking"
    #[arg(long, default_value = "")]
    pub features: String,

    /// Image to upload (max 5MB)
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    #[arg(long)]
    pub inactive: bool,
}

impl ServiceFields {
    fn into_draft(self) -> Outcome<ServiceDraft> {
        let image = match self.image.as_deref().map(ImageUpload::from_path).transpose() {
            Ok(image) => image,
            Err(e) => return Outcome::failed(e.to_string()),
        };
        let draft = ServiceDraft {
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            duration: self.duration,
            features: Vec::new(),
            status: status_for(self.inactive),
            image,
        };
        Outcome::Live(draft.with_feature_text(&self.features))
    }
}

#[derive(Subcommand, Debug)]
pub enum ContactCommand {
    List {
        /// unread, read or responded
        #[arg(long)]
        status: Option<ContactStatus>,

        #[arg(long)]
        service_type: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    SetStatus {
        id: String,
        status: ContactStatus,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    state: SessionState,
    session_file: PathBuf,
}

fn status_for(inactive: bool) -> RecordStatus {
    if inactive {
        RecordStatus::Inactive
    } else {
        RecordStatus::Active
    }
}

/// Carry a hard failure over to another payload type
fn forward<T, U>(outcome: Outcome<T>) -> Result<T, Outcome<U>> {
    match outcome {
        Outcome::Live(data) | Outcome::Degraded { data, .. } => Ok(data),
        Outcome::Failed { message, error } => Err(Outcome::Failed { message, error }),
    }
}

impl AdminArgs {
    pub fn run(
        self,
        admin: &AdminService,
        sessions: &SessionManager,
        json: bool,
    ) -> anyhow::Result<ExitCode> {
        match self.command {
            AdminCommand::Login { email, password } => {
                let outcome = sessions
                    .login(admin, &Credentials { email, password })
                    .map(|_| Value::Null);
                output::emit(&outcome, json, output::done("Logged in."))
            }
            AdminCommand::Logout => {
                let outcome = sessions.logout(admin).map(|_| Value::Null);
                output::emit(&outcome, json, output::done("Logged out."))
            }
            AdminCommand::Status => {
                let report = StatusReport {
                    state: sessions.state(),
                    session_file: sessions.store().path().to_path_buf(),
                };
                output::emit(&Outcome::Live(report), json, |r| match r.state {
                    SessionState::Authenticated => {
                        format!("Logged in (token in {})\n", r.session_file.display())
                    }
                    SessionState::Anonymous => "Not logged in.\n".to_string(),
                })
            }
            command => {
                let Some(session) = sessions.current() else {
                    return output::emit(&Outcome::<Value>::failed(NOT_LOGGED_IN), json, |_| {
                        String::new()
                    });
                };
                run_authenticated(command, admin, &session, json)
            }
        }
    }
}

fn run_authenticated(
    command: AdminCommand,
    admin: &AdminService,
    session: &Session,
    json: bool,
) -> anyhow::Result<ExitCode> {
    match command {
        AdminCommand::Dashboard => {
            output::emit(&admin.dashboard(session), json, output::dashboard)
        }
        AdminCommand::Categories(command) => run_categories(command, admin, session, json),
        AdminCommand::Services(command) => run_services(command, admin, session, json),
        AdminCommand::Contacts(command) => run_contacts(command, admin, session, json),
        AdminCommand::Login { .. } | AdminCommand::Logout | AdminCommand::Status => {
            anyhow::bail!("session commands do not need a stored session")
        }
    }
}

fn run_categories(
    command: CategoryCommand,
    admin: &AdminService,
    session: &Session,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let outcome = match command {
        CategoryCommand::List => {
            return output::emit(&admin.list_categories(session), json, |cats| {
                output::categories(cats)
            })
        }
        CategoryCommand::Create(fields) => match forward(admin.list_categories(session)) {
            Ok(existing) => admin.create_category(session, &fields.into_draft(), &existing),
            Err(failed) => failed,
        },
        CategoryCommand::Update { id, fields } => {
            admin.update_category(session, &id, &fields.into_draft())
        }
        CategoryCommand::Delete { id } => admin.delete_category(session, &id),
    };
    output::emit(&outcome, json, output::done("Done."))
}

fn run_services(
    command: ServiceCommand,
    admin: &AdminService,
    session: &Session,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let outcome = match command {
        ServiceCommand::List => {
            return output::emit(&admin.list_services(session), json, |svcs| {
                output::services(svcs)
            })
        }
        ServiceCommand::ByCategory { category_id } => {
            return output::emit(
                &admin.services_by_category(session, &category_id),
                json,
                |svcs| output::services(svcs),
            )
        }
        ServiceCommand::Create(fields) => create_service(admin, session, fields),
        ServiceCommand::Update { id, fields } => {
            let categories = forward(admin.list_categories(session));
            match (categories, forward(fields.into_draft())) {
                (Ok(categories), Ok(draft)) => {
                    admin.update_service(session, &id, &draft, &categories)
                }
                (Err(failed), _) | (_, Err(failed)) => failed,
            }
        }
        ServiceCommand::Delete { id } => admin.delete_service(session, &id),
    };
    output::emit(&outcome, json, output::done("Done."))
}

fn create_service(
    admin: &AdminService,
    session: &Session,
    fields: ServiceFields,
) -> Outcome<Value> {
    let draft = match forward(fields.into_draft()) {
        Ok(draft) => draft,
        Err(failed) => return failed,
    };
    let (services, categories) = admin.load_service_editor(session);
    match (forward(services), forward(categories)) {
        (Ok(existing), Ok(categories)) => {
            admin.create_service(session, &draft, &categories, &existing)
        }
        (Err(failed), _) | (_, Err(failed)) => failed,
    }
}

fn run_contacts(
    command: ContactCommand,
    admin: &AdminService,
    session: &Session,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let outcome = match command {
        ContactCommand::List {
            status,
            service_type,
            page,
            limit,
        } => {
            let filters = ContactFilters {
                status,
                service_type,
                page,
                limit,
            };
            return output::emit(&admin.list_contacts(session, &filters), json, |list| {
                output::contacts(list)
            });
        }
        ContactCommand::SetStatus { id, status } => {
            admin.update_contact_status(session, &id, status)
        }
        ContactCommand::Delete { id } => admin.delete_contact(session, &id),
    };
    output::emit(&outcome, json, output::done("Done."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::api::HttpMethod;
    use crate::services::TokenStore;
    use clap::Parser;
    use serde_json::json;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct Harness {
        #[command(subcommand)]
        command: AdminCommand,
    }

    fn parse(args: &[&str]) -> AdminCommand {
        let argv = std::iter::once("admin").chain(args.iter().copied());
        Harness::try_parse_from(argv).unwrap().command
    }

    fn is_failure(code: ExitCode) -> bool {
        format!("{:?}", code) == format!("{:?}", ExitCode::FAILURE)
    }

    #[test]
    fn test_parse_contact_set_status() {
        let command = parse(&["contacts", "set-status", "k1", "responded"]);
        assert!(matches!(
            command,
            AdminCommand::Contacts(ContactCommand::SetStatus { ref id, status: ContactStatus::Responded })
                if id == "k1"
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_contact_status() {
        let argv = ["admin", "contacts", "set-status", "k1", "archived"];
        assert!(Harness::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_parse_contact_list_defaults() {
        let command = parse(&["contacts", "list"]);
        let AdminCommand::Contacts(ContactCommand::List { status, page, limit, .. }) = command
        else {
            panic!("expected contacts list");
        };
        assert_eq!(status, None);
        assert_eq!((page, limit), (1, 20));
    }

    #[test]
    fn test_parse_service_create() {
        let command = parse(&[
            "services",
            "create",
            "--name",
            "Airport Drop",
            "--description",
            "To the airport",
            "--category",
            "c1",
            "--price",
            "450",
            "--features",
            "AC, Meet & Greet",
        ]);
        let AdminCommand::Services(ServiceCommand::Create(fields)) = command else {
            panic!("expected services create");
        };
        let draft = fields.into_draft().into_data().unwrap();
        assert_eq!(draft.features, vec!["AC", "Meet & Greet"]);
        assert_eq!(draft.status, RecordStatus::Active);
        assert!(draft.image.is_none());
    }

    #[test]
    fn test_missing_image_file_fails_draft() {
        let fields = ServiceFields {
            name: "n".into(),
            description: "d".into(),
            category: "c1".into(),
            price: 1.0,
            duration: String::new(),
            features: String::new(),
            image: Some(PathBuf::from("/nonexistent/car.png")),
            inactive: false,
        };
        assert!(!fields.into_draft().is_success());
    }

    #[test]
    fn test_category_fields_inactive() {
        let command = parse(&[
            "categories",
            "update",
            "c1",
            "--name",
            "Night Rides",
            "--description",
            "After 10pm",
            "--inactive",
        ]);
        let AdminCommand::Categories(CategoryCommand::Update { id, fields }) = command else {
            panic!("expected categories update");
        };
        assert_eq!(id, "c1");
        assert_eq!(fields.into_draft().status, RecordStatus::Inactive);
    }

    #[test]
    fn test_protected_command_without_session_fails_offline() {
        let dir = TempDir::new().unwrap();
        let sessions = SessionManager::new(TokenStore::new(dir.path().join("session.json")));
        let transport = ScriptedTransport::offline();
        let log = transport.requests();
        let admin = AdminService::new(Box::new(transport));

        let args = AdminArgs {
            command: AdminCommand::Dashboard,
        };
        let code = args.run(&admin, &sessions, true).unwrap();

        assert!(is_failure(code));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_login_then_status() {
        let dir = TempDir::new().unwrap();
        let sessions = SessionManager::new(TokenStore::new(dir.path().join("session.json")));
        let admin = AdminService::new(Box::new(ScriptedTransport::new().on(
            HttpMethod::Post,
            "/api/admin/login",
            200,
            json!({ "success": true, "token": "jwt" }),
        )));

        let login = AdminArgs {
            command: parse(&["login", "--email", "a@b.c", "--password", "pw"]),
        };
        assert!(!is_failure(login.run(&admin, &sessions, true).unwrap()));
        assert_eq!(sessions.state(), SessionState::Authenticated);
    }

    #[test]
    fn test_create_category_aborts_when_list_fails() {
        let dir = TempDir::new().unwrap();
        let sessions = SessionManager::new(TokenStore::new(dir.path().join("session.json")));
        sessions.store().save("tok").unwrap();
        let transport = ScriptedTransport::new().on(
            HttpMethod::Post,
            "/api/categories",
            201,
            json!({ "success": true }),
        );
        let log = transport.requests();
        let admin = AdminService::new(Box::new(transport));

        let args = AdminArgs {
            command: parse(&["categories", "create", "--name", "X", "--description", "Y"]),
        };
        let code = args.run(&admin, &sessions, true).unwrap();

        assert!(is_failure(code));
        let requests = log.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
    }
}
