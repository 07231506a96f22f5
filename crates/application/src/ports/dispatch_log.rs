/// Levelled diagnostic sink handed to the dispatcher at construction.
pub trait DispatchLog: Send + Sync {
    fn debug(&self, _message: &str) {}

    fn info(&self, message: &str);

    fn warn(&self, message: &str);
}
