use super::{escape, field_errors, layout, notice};
use crate::utils::ActionResult;

fn auth_card(title: &str, inner: &str) -> String {
    layout(
        title,
        &format!(
            "<main class=\"wrap\"><div class=\"card\"><h1>{}</h1>{}</div></main>",
            escape(title),
            inner
        ),
    )
}

pub fn sign_in_page(result: Option<&ActionResult>, email: &str, redirect: Option<&str>) -> String {
    let redirect_field = redirect
        .map(|r| format!("<input type=\"hidden\" name=\"redirect\" value=\"{}\">", escape(r)))
        .unwrap_or_default();

    auth_card(
        "Sign in",
        &format!(
            "{notice}<form method=\"post\" action=\"/auth/signin\">{redirect}\
<label for=\"email\">Email</label><input id=\"email\" name=\"email\" type=\"email\" value=\"{email}\" required>{email_errors}\
<label for=\"password\">Password</label><input id=\"password\" name=\"password\" type=\"password\" required>{password_errors}\
<button type=\"submit\">Sign in</button></form>\
<p><a href=\"/auth/forgot-password\">Forgot your password?</a></p>\
<p>No account yet? <a href=\"/auth/signup\">Sign up</a></p>",
            notice = notice(result),
            redirect = redirect_field,
            email = escape(email),
            email_errors = field_errors(result, "email"),
            password_errors = field_errors(result, "password"),
        ),
    )
}

pub fn sign_up_page(result: Option<&ActionResult>, email: &str, name: &str) -> String {
    auth_card(
        "Create your account",
        &format!(
            "{notice}<form method=\"post\" action=\"/auth/signup\">\
<label for=\"name\">Name</label><input id=\"name\" name=\"name\" type=\"text\" value=\"{name}\">\
<label for=\"email\">Email</label><input id=\"email\" name=\"email\" type=\"email\" value=\"{email}\" required>{email_errors}\
<label for=\"password\">Password</label><input id=\"password\" name=\"password\" type=\"password\" minlength=\"8\" required>{password_errors}\
<button type=\"submit\">Sign up</button></form>\
<p>Already registered? <a href=\"/auth/signin\">Sign in</a></p>",
            notice = notice(result),
            name = escape(name),
            email = escape(email),
            email_errors = field_errors(result, "email"),
            password_errors = field_errors(result, "password"),
        ),
    )
}

/// Request-a-code form followed by the confirm-with-code form.
pub fn forgot_password_page(
    request_result: Option<&ActionResult>,
    confirm_result: Option<&ActionResult>,
    email: &str,
) -> String {
    auth_card(
        "Reset your password",
        &format!(
            "{request_notice}<form method=\"post\" action=\"/auth/forgot-password\">\
<label for=\"email\">Email</label><input id=\"email\" name=\"email\" type=\"email\" value=\"{email}\" required>{request_email_errors}\
<button type=\"submit\">Send reset code</button></form>\
<h2>Have a code?</h2>{confirm_notice}<form method=\"post\" action=\"/auth/reset-password\">\
<label for=\"reset-email\">Email</label><input id=\"reset-email\" name=\"email\" type=\"email\" value=\"{email}\" required>{confirm_email_errors}\
<label for=\"code\">Verification code</label><input id=\"code\" name=\"code\" type=\"text\" required>{code_errors}\
<label for=\"newPassword\">New password</label><input id=\"newPassword\" name=\"newPassword\" type=\"password\" minlength=\"8\" required>{password_errors}\
<button type=\"submit\">Reset password</button></form>\
<p><a href=\"/auth/signin\">Back to sign in</a></p>",
            request_notice = notice(request_result),
            email = escape(email),
            request_email_errors = field_errors(request_result, "email"),
            confirm_notice = notice(confirm_result),
            confirm_email_errors = field_errors(confirm_result, "email"),
            code_errors = field_errors(confirm_result, "code"),
            password_errors = field_errors(confirm_result, "newPassword"),
        ),
    )
}
