use chrono::DateTime;

use super::{escape, field_errors, layout, notice, sign_out_form};
use crate::models::{AccountType, SessionPayload, User};
use crate::utils::ActionResult;

/// Placeholder tiles on the app dashboard. Tasks are not implemented yet.
const DASHBOARD_TILES: [(&str, &str); 3] = [
    ("Tasks", "Manage your tasks and projects"),
    ("Projects", "View all your projects"),
    ("Completed", "Tasks you have completed"),
];

/// Profile fields after falling back from the stored record to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub account_type: AccountType,
}

impl ProfileView {
    pub fn resolve(session: &SessionPayload, user: Option<&User>) -> Self {
        Self {
            name: user
                .and_then(|u| u.name.clone())
                .or_else(|| session.name.clone())
                .unwrap_or_else(|| "Not provided".to_string()),
            email: user.map(|u| u.email.clone()).unwrap_or_else(|| session.email.clone()),
            account_type: user.map(|u| u.account_type).unwrap_or_default(),
        }
    }
}

/// `2026-01-05T10:00:00.000Z` → `January 5, 2026`; unparseable input is shown as is.
pub fn format_date(iso: &str) -> String {
    DateTime::parse_from_rfc3339(iso)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| iso.to_string())
}

fn header(title: &str, nav: &str) -> String {
    format!(
        "<header><div class=\"wrap\"><h1>{}</h1><nav>{}</nav></div></header>",
        escape(title),
        nav
    )
}

pub fn home_page(session: Option<&SessionPayload>) -> String {
    let actions = match session {
        Some(session) => format!(
            "<p>Signed in as {}.</p><p><a href=\"/app\">Go to your dashboard</a></p>",
            escape(&session.email)
        ),
        None => "<p><a href=\"/auth/signin\">Sign in</a> or <a href=\"/auth/signup\">create an account</a> to get started.</p>"
            .to_string(),
    };

    layout(
        "Welcome",
        &format!(
            "{}<main class=\"wrap\"><div class=\"card\"><h2>Organize your work</h2>\
<p>Task Manager Pro keeps tasks and projects in one place for individuals, teams and enterprises.</p>{}</div></main>",
            header("Task Manager Pro", ""),
            actions
        ),
    )
}

pub fn dashboard_page(session: &SessionPayload) -> String {
    layout(
        "Dashboard",
        &format!(
            "{header}<main class=\"wrap\"><div class=\"card\"><h2>Welcome, {name}!</h2>\
<p><strong>Email:</strong> {email}</p><p><strong>User ID:</strong> {user_id}</p></div>\
<div class=\"card\"><h3>Authentication Status</h3><p>&#x1F7E2; Authenticated</p></div></main>",
            header = header("Dashboard", sign_out_form()),
            name = escape(session.display_name()),
            email = escape(&session.email),
            user_id = escape(&session.user_id),
        ),
    )
}

pub fn app_page(display_name: &str) -> String {
    let tiles = DASHBOARD_TILES
        .iter()
        .map(|(title, description)| {
            format!(
                "<div class=\"tile\"><h3>{}</h3><p>{}</p><p class=\"count\">0</p></div>",
                title, description
            )
        })
        .collect::<String>();

    layout(
        "Dashboard",
        &format!(
            "{header}<main class=\"wrap\"><div class=\"card\"><h2>Welcome, {name}</h2>\
<p>You are successfully logged in to Task Manager Pro.</p><div class=\"grid\">{tiles}</div></div></main>",
            header = header(
                "Dashboard",
                &format!("<a href=\"/app/profile\">Profile</a>{}", sign_out_form())
            ),
            name = escape(display_name),
            tiles = tiles,
        ),
    )
}

pub fn profile_page(profile: &ProfileView, user: Option<&User>, result: Option<&ActionResult>) -> String {
    let details = user
        .map(|user| {
            format!(
                "<div class=\"card\"><h3>Account Details</h3><dl>\
<dt>User ID</dt><dd><code>{}</code></dd>\
<dt>Created</dt><dd>{}</dd>\
<dt>Last Updated</dt><dd>{}</dd></dl></div>",
                escape(&user.user_id),
                escape(&format_date(&user.created_at)),
                escape(&format_date(&user.updated_at))
            )
        })
        .unwrap_or_default();

    let options = AccountType::ALL
        .iter()
        .map(|t| {
            let selected = if *t == profile.account_type { " selected" } else { "" };
            format!("<option value=\"{0}\"{1}>{0}</option>", t.as_str(), selected)
        })
        .collect::<String>();

    let form_name = user.and_then(|u| u.name.as_deref()).unwrap_or("");

    layout(
        "Profile",
        &format!(
            "{header}<main class=\"wrap\"><div class=\"card\"><h2>User Information</h2>\
<dl><dt>Name</dt><dd>{name}</dd><dt>Email</dt><dd>{email}</dd><dt>Account Type</dt><dd>{account_type}</dd></dl></div>\
{details}<div class=\"card\"><h3>Edit Profile</h3>{notice}<form method=\"post\" action=\"/app/profile\">\
<label for=\"name\">Name</label><input id=\"name\" name=\"name\" type=\"text\" value=\"{form_name}\">{name_errors}\
<label for=\"accountType\">Account Type</label><select id=\"accountType\" name=\"accountType\">{options}</select>{type_errors}\
<button type=\"submit\">Save</button></form></div></main>",
            header = header("Profile", "<a href=\"/app\">Back to Dashboard</a>"),
            name = escape(&profile.name),
            email = escape(&profile.email),
            account_type = profile.account_type,
            details = details,
            notice = notice(result),
            form_name = escape(form_name),
            name_errors = field_errors(result, "name"),
            options = options,
            type_errors = field_errors(result, "accountType"),
        ),
    )
}
