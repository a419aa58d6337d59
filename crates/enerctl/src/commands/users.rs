//! User command handlers.

use enerctl_core::{Console, User, UserField};
use tabled::Tabled;

use crate::cli::{GlobalOpts, UserFieldArgs, UsersArgs, UsersCommand};
use crate::error::CliError;

use super::crud::{self, View};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Account")]
    account: String,
}

impl UserRow {
    fn new(u: &User) -> Self {
        Self {
            id: u.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            name: u.name.clone(),
            email: u.email.clone(),
            account: u.account_type.map(|t| t.label()).unwrap_or("-").into(),
        }
    }
}

fn detail(u: &User) -> String {
    [
        format!(
            "ID:      {}",
            u.id.as_ref().map_or_else(|| "-".into(), ToString::to_string)
        ),
        format!("Name:    {}", u.name),
        format!("Email:   {}", u.email),
        format!(
            "Account: {}",
            u.account_type.map_or("-", |t| t.label())
        ),
    ]
    .join("\n")
}

const VIEW: View<User, UserRow> = View {
    row: UserRow::new,
    detail,
};

fn field_values(fields: UserFieldArgs) -> Vec<(UserField, Option<String>)> {
    vec![
        (UserField::Name, fields.name),
        (UserField::Email, fields.email),
        (UserField::AccountType, fields.account_type),
    ]
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let ctrl = console.users();
    let config = console.config();

    match args.command {
        UsersCommand::List => crud::list(ctrl, config, &VIEW, global).await,
        UsersCommand::Get { id } => crud::get(ctrl, config, &VIEW, &id, global).await,
        UsersCommand::Create { fields, from_file } => {
            crud::create(ctrl, config, field_values(fields), from_file.as_deref(), global).await
        }
        UsersCommand::Update { id, fields } => {
            crud::update(ctrl, config, &id, field_values(fields), global).await
        }
        UsersCommand::Delete { id } => crud::delete(ctrl, config, &id, global).await,
    }
}
