use super::providers::EmailMessage;

/// Welcome message sent to a new newsletter subscriber.
pub fn welcome_email(to: &str, subject: &str) -> EmailMessage {
    let body_text = "Thanks for subscribing!\n\n\
You'll get occasional updates with new calculators, market notes and guides \
on budgeting, investing and taxes.\n\n\
If you didn't sign up, you can ignore this email."
        .to_string();

    let body_html = "<h1>Thanks for subscribing!</h1>\
<p>You'll get occasional updates with new calculators, market notes and guides \
on budgeting, investing and taxes.</p>\
<p>If you didn't sign up, you can ignore this email.</p>"
        .to_string();

    EmailMessage {
        to: to.to_string(),
        subject: subject.to_string(),
        body_text,
        body_html,
    }
}
