//! Outbound messages to principals.

use blocklock_policy::Principal;

/// Delivers a text message to a principal.
///
/// How the text reaches the recipient is the host's business.
pub trait MessageSink: Send + Sync {
    /// Deliver `message` to `recipient`.
    fn deliver(&self, recipient: &Principal, message: &str);
}

impl<F> MessageSink for F
where
    F: Fn(&Principal, &str) + Send + Sync,
{
    fn deliver(&self, recipient: &Principal, message: &str) {
        self(recipient, message)
    }
}
