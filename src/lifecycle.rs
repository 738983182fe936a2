use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use tokio::task::JoinSet;
use tracing::debug;

/// Tasks tied to the lifetime of a UI context.
///
/// Dropping the scope, or calling [`LifecycleScope::cancel_all`], aborts
/// every task still running.
#[derive(Debug, Default)]
pub struct LifecycleScope {
    tasks: Mutex<JoinSet<()>>,
}

impl LifecycleScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launch<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.lock();
        reap(&mut tasks);
        tasks.spawn(task);
    }

    /// Number of tasks that have not finished yet.
    pub fn active(&self) -> usize {
        let mut tasks = self.lock();
        reap(&mut tasks);
        tasks.len()
    }

    pub fn cancel_all(&self) {
        let mut tasks = self.lock();
        debug!(tasks = tasks.len(), "Cancelling lifecycle scope");
        tasks.abort_all();
        reap(&mut tasks);
    }

    fn lock(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn reap(tasks: &mut JoinSet<()>) {
    while tasks.try_join_next().is_some() {}
}
