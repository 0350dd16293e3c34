use tokio::task::JoinHandle;

/// Handle to a spawned timer task, aborted on drop.
///
/// Every timer a playback session arms is held through one of these so that
/// teardown (or dropping the session) leaves no callback able to fire.
#[derive(Debug)]
pub(crate) struct TaskHandle(JoinHandle<()>);

impl TaskHandle {
    pub(crate) fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self(tokio::spawn(future))
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}
