//! Digest message formatting.
//!
//! One digest lists every matching row with its exam name, publish date
//! and PDF link. Rows without a link get no link control.

use std::fmt::Write;

use crate::models::NotificationRow;

const PORTAL_HOME: &str = "https://exams.keralauniversity.ac.in/";

const STYLE: &str = "\
body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 20px; background-color: #f4f4f4; }
.container { max-width: 600px; margin: 0 auto; background: white; border-radius: 8px; }
.header { background: #1e3a8a; color: white; padding: 30px; text-align: center; border-radius: 8px 8px 0 0; }
.content { padding: 30px; }
.notification-count { background: #eff6ff; border: 1px solid #dbeafe; border-radius: 6px; padding: 15px; margin-bottom: 25px; }
.notification-item { background: #f8fafc; border-left: 4px solid #3b82f6; margin: 15px 0; padding: 20px; }
.notification-title { font-weight: 600; color: #1e40af; margin-bottom: 8px; }
.notification-date { color: #64748b; font-size: 14px; margin-bottom: 12px; }
.pdf-link { display: inline-block; background: #3b82f6; color: white; padding: 8px 16px; text-decoration: none; border-radius: 4px; }
.footer { background: #f8fafc; padding: 20px; text-align: center; border-top: 1px solid #e2e8f0; color: #64748b; font-size: 14px; }";

/// Headline such as "3 New Notifications Available".
pub fn headline(count: usize) -> String {
    let plural = if count > 1 { "s" } else { "" };
    format!("{count} New Notification{plural} Available")
}

/// Render the HTML email body.
pub fn render_html(matches: &[NotificationRow]) -> String {
    let mut body = String::with_capacity(2048 + matches.len() * 256);

    let _ = write!(
        body,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n\
         <div class=\"container\">\n\
         <div class=\"header\"><h1>Kerala University</h1><p>Examination Notification Alert</p></div>\n\
         <div class=\"content\">\n\
         <div class=\"notification-count\"><strong>{}</strong></div>\n\
         <p>New examination notifications matching your criteria have been published on the portal.</p>\n",
        headline(matches.len())
    );

    for row in matches {
        let _ = write!(
            body,
            "<div class=\"notification-item\">\n\
             <div class=\"notification-title\">{}</div>\n\
             <div class=\"notification-date\">Published: {}</div>\n",
            escape_html(&row.exam_name),
            escape_html(&row.published_date)
        );
        if row.has_link() {
            let _ = writeln!(
                body,
                "<a href=\"{}\" class=\"pdf-link\">View PDF Document</a>",
                escape_html(&row.pdf_link)
            );
        }
        body.push_str("</div>\n");
    }

    let _ = write!(
        body,
        "<p>Please verify all details on the official university website.</p>\n\
         </div>\n\
         <div class=\"footer\">Automated notification from ku-notify. \
         Portal: <a href=\"{PORTAL_HOME}\">exams.keralauniversity.ac.in</a></div>\n\
         </div>\n</body>\n</html>\n"
    );

    body
}

/// Render a plain-text digest.
pub fn render_text(matches: &[NotificationRow]) -> String {
    let mut out = headline(matches.len());
    out.push('\n');

    for row in matches {
        let _ = write!(out, "\n- {}\n  Published: {}\n", row.exam_name, row.published_date);
        if row.has_link() {
            let _ = writeln!(out, "  PDF: {}", row.pdf_link);
        }
    }

    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
