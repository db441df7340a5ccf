//! Email bodies sent on behalf of the contact form.

use showreel_core::contact::ContactForm;

/// A plain-text email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Notification to the site owner about a new contact-form message.
///
/// Replies go straight to the visitor.
pub fn contact_notification(recipient: &str, form: &ContactForm) -> OutgoingEmail {
    let subject = match &form.subject {
        Some(subject) => format!("[Portfolio] {subject}"),
        None => format!("[Portfolio] New message from {}", form.name),
    };
    let body = format!(
        "Name: {}\nEmail: {}\nSubject: {}\n\n{}\n",
        form.name,
        form.email,
        form.subject.as_deref().unwrap_or("(none)"),
        form.message
    );
    OutgoingEmail {
        to: recipient.to_string(),
        reply_to: Some(form.email.clone()),
        subject,
        body,
    }
}

/// Acknowledgement sent back to the visitor when auto-reply is enabled.
pub fn auto_reply(owner_name: &str, form: &ContactForm) -> OutgoingEmail {
    OutgoingEmail {
        to: form.email.clone(),
        reply_to: None,
        subject: "Thanks for getting in touch".to_string(),
        body: format!(
            "Hi {},\n\nThanks for your message. {owner_name} will get back to you soon.\n",
            form.name
        ),
    }
}
