//! Bodies for the emails the service sends.

pub struct EmailContent {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

const FOOTER_TEXT: &str = "100builds • Where builders showcase what they're building";

/// Escape text for embedding inside HTML element content or attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn wrap_html(inner: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
  </head>
  <body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
{inner}
    <div style="text-align: center; color: #9ca3af; font-size: 12px;">
      <p>{FOOTER_TEXT}</p>
    </div>
  </body>
</html>"#
    )
}

pub fn claim_verification(verification_url: &str, ttl_hours: i64) -> EmailContent {
    let url = escape_html(verification_url);
    let html_body = wrap_html(&format!(
        r#"    <div style="background: #f9fafb; border-radius: 12px; padding: 30px; margin-bottom: 20px;">
      <p style="margin: 0 0 20px 0; font-size: 16px;">Thanks for sharing your project on <strong>100builds</strong>!</p>
      <p style="margin: 0 0 20px 0; font-size: 16px;">Click the button below to claim your build and unlock editing abilities:</p>
      <div style="text-align: center; margin: 30px 0;">
        <a href="{url}" style="display: inline-block; background: #667eea; color: white; text-decoration: none; padding: 14px 32px; border-radius: 8px; font-weight: 600;">Claim Your Build</a>
      </div>
      <p style="margin: 20px 0 0 0; font-size: 14px; color: #6b7280;">This link expires in {ttl_hours} hours. If you didn't create a build on 100builds, you can safely ignore this email.</p>
    </div>"#
    ));

    let text_body = format!(
        "Your build is ready!\n\n\
         Thanks for sharing your project on 100builds!\n\n\
         Click the link below to claim your build and unlock editing abilities:\n\
         {verification_url}\n\n\
         This link expires in {ttl_hours} hours. If you didn't create a build on 100builds, you can safely ignore this email.\n\n\
         ---\n{FOOTER_TEXT}\n"
    );

    EmailContent {
        subject: "Claim your build on 100builds".to_string(),
        html_body,
        text_body,
    }
}

pub fn contact_message(sender_name: &str, project_name: &str, message: &str) -> EmailContent {
    let html_body = wrap_html(&format!(
        r#"    <div style="background: #f9fafb; border-radius: 12px; padding: 30px; margin-bottom: 20px;">
      <p style="margin: 0 0 20px 0; color: #111827; font-size: 16px;">{name} messaged you regarding your <strong>{project}</strong> build:</p>
      <div style="background: white; border-radius: 8px; padding: 20px; margin: 20px 0;">
        <p style="margin: 0; white-space: pre-wrap; color: #111827;">{message}</p>
      </div>
      <p style="margin: 20px 0 0 0; font-size: 14px; color: #6b7280;">Reply to this email to respond directly to {name}</p>
    </div>"#,
        name = escape_html(sender_name),
        project = escape_html(project_name),
        message = escape_html(message),
    ));

    let text_body = format!(
        "{sender_name} messaged you regarding your {project_name} build:\n\n\
         {message}\n\n\
         Reply to this email to respond directly to {sender_name}\n\n\
         {FOOTER_TEXT}\n"
    );

    EmailContent {
        subject: format!("New message regarding {}", project_name),
        html_body,
        text_body,
    }
}

pub fn claim_notice(project_name: &str, owner_email: &str, build_url: &str) -> EmailContent {
    let html_body = wrap_html(&format!(
        r#"    <div style="background: #f9fafb; border-radius: 12px; padding: 30px; margin-bottom: 20px;">
      <p style="margin: 0 0 20px 0; font-size: 16px;"><strong>{project}</strong> was just claimed by {owner}.</p>
      <p style="margin: 0; font-size: 14px;"><a href="{url}">{url}</a></p>
    </div>"#,
        project = escape_html(project_name),
        owner = escape_html(owner_email),
        url = escape_html(build_url),
    ));

    let text_body = format!(
        "{project_name} was just claimed by {owner_email}.\n\n{build_url}\n\n{FOOTER_TEXT}\n"
    );

    EmailContent {
        subject: format!("Build claimed: {}", project_name),
        html_body,
        text_body,
    }
}
