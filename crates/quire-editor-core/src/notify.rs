//! Blocking, user-facing notifications.

/// Shows a message to the user and returns once it has been acknowledged.
///
/// Implemented for any `Fn(&str)`, so a closure is enough for most surfaces.
pub trait UserNotifier {
    fn alert(&self, message: &str);
}

impl<F: Fn(&str)> UserNotifier for F {
    fn alert(&self, message: &str) {
        self(message)
    }
}
