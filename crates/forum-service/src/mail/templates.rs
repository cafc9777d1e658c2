//! Plain email bodies for account flows

use super::EmailMessage;

/// The one-time code sent after sign-up or on request
pub fn verification_email(to: &str, otp: &str, valid_for_hours: i64) -> EmailMessage {
    let text = format!(
        "Your verification code is {otp}.\n\n\
         It expires in {valid_for_hours} hours. If you did not create an account, ignore this email."
    );
    let html = format!(
        "<p>Your verification code is:</p>\
         <p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{otp}</p>\
         <p>It expires in {valid_for_hours} hours. If you did not create an account, ignore this email.</p>"
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Verify your email address".to_string(),
        html,
        text,
    }
}

/// The reset link sent from the forgot-password flow
pub fn password_reset_email(
    to: &str,
    name: Option<&str>,
    reset_url: &str,
    valid_for_minutes: i64,
) -> EmailMessage {
    let greeting = match name {
        Some(name) => format!("Hello {name},"),
        None => "Hello,".to_string(),
    };
    let text = format!(
        "{greeting}\n\nUse this link to choose a new password:\n{reset_url}\n\n\
         The link expires in {valid_for_minutes} minutes. If you did not ask for a reset, ignore this email."
    );
    let html = format!(
        "<p>{greeting}</p>\
         <p><a href=\"{reset_url}\">Choose a new password</a></p>\
         <p>The link expires in {valid_for_minutes} minutes. If you did not ask for a reset, ignore this email.</p>"
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Reset your password".to_string(),
        html,
        text,
    }
}
