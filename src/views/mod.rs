//! Server-rendered HTML.
//!
//! Every value interpolated into markup goes through [`escape`].

pub mod app;
pub mod auth;

use actix_web::http::StatusCode;

use crate::utils::ActionResult;

pub use app::*;
pub use auth::*;

const STYLE: &str = "body{font-family:system-ui,sans-serif;background:#f9fafb;color:#111827;margin:0}\
header{background:#fff;box-shadow:0 1px 2px rgba(0,0,0,.08)}\
.wrap{max-width:72rem;margin:0 auto;padding:1.5rem}\
.card{background:#fff;border-radius:.5rem;box-shadow:0 1px 3px rgba(0,0,0,.1);padding:1.5rem;margin-top:1.5rem}\
.grid{display:grid;gap:1rem;grid-template-columns:repeat(auto-fit,minmax(14rem,1fr))}\
.tile{border:1px solid #e5e7eb;border-radius:.5rem;padding:1rem}\
.count{font-size:1.5rem;font-weight:700}\
.error{color:#b91c1c;font-size:.875rem}\
.notice{padding:.75rem;border-radius:.375rem;margin-bottom:1rem}\
.notice.ok{background:#ecfdf5;color:#065f46}.notice.fail{background:#fef2f2;color:#991b1b}\
label{display:block;font-weight:500;margin-top:1rem}\
input,select{display:block;width:100%;max-width:24rem;padding:.5rem;margin-top:.25rem}\
button{margin-top:1rem;padding:.5rem 1rem;background:#2563eb;color:#fff;border:0;border-radius:.375rem}\
nav a,nav form{margin-left:1rem;display:inline}";

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{} | Task Manager Pro</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    )
}

fn notice(result: Option<&ActionResult>) -> String {
    match result {
        Some(result) if !result.message.is_empty() => {
            let class = if result.success { "ok" } else { "fail" };
            format!("<div class=\"notice {}\" role=\"status\">{}</div>", class, escape(&result.message))
        }
        _ => String::new(),
    }
}

fn field_errors(result: Option<&ActionResult>, field: &str) -> String {
    result
        .map(|r| {
            r.field_errors(field)
                .iter()
                .map(|msg| format!("<p class=\"error\">{}</p>", escape(msg)))
                .collect::<String>()
        })
        .unwrap_or_default()
}

pub fn sign_out_form() -> &'static str {
    "<form method=\"post\" action=\"/auth/signout\"><button type=\"submit\">Sign out</button></form>"
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let heading = status.canonical_reason().unwrap_or("Error");
    layout(
        heading,
        &format!(
            "<main class=\"wrap\"><div class=\"card\"><h1>{} {}</h1><p>{}</p><p><a href=\"/\">Back to home</a></p></div></main>",
            status.as_u16(),
            escape(heading),
            escape(message)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{validate_sign_up, ActionResult};

    #[test]
    fn escape_neutralises_markup() {
        assert_eq!(
            escape("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn notice_reflects_outcome() {
        assert!(notice(Some(&ActionResult::ok("Done"))).contains("notice ok"));
        assert!(notice(Some(&ActionResult::failed("Nope"))).contains("notice fail"));
        assert!(notice(None).is_empty());
    }

    #[test]
    fn field_errors_render_each_message() {
        let result = validate_sign_up("bad", "short").unwrap_err();
        let html = field_errors(Some(&result), "password");
        assert!(html.contains("Password must be at least 8 characters long"));
        assert!(field_errors(Some(&result), "name").is_empty());
    }

    #[test]
    fn error_page_shows_status() {
        let html = error_page(StatusCode::NOT_FOUND, "Not found: <user>");
        assert!(html.contains("404 Not Found"));
        assert!(html.contains("Not found: &lt;user&gt;"));
    }
}
