/// Transient operator feedback channel (toasts).
pub trait Notifier: Send + Sync {
    /// Reports a completed operation.
    fn success(&self, message: &str);

    /// Reports a failed operation.
    fn error(&self, message: &str);
}
