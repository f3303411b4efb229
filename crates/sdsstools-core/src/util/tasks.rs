//! Small async helpers on top of tokio.

use futures::future::try_join_all;
use sdsstools_types::{Result, ToolsError};
use std::future::Future;
use tokio::task::JoinHandle;

/// Run a blocking closure on tokio's blocking thread pool.
pub async fn run_in_executor<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ToolsError::Task(e.to_string()))
}

/// Cancel a task if it is still running and wait for it to wind down.
///
/// Cancellation itself is not an error; a panic inside the task is.
pub async fn cancel_task<T>(task: Option<JoinHandle<T>>) -> Result<()> {
    let Some(task) = task else {
        return Ok(());
    };

    if !task.is_finished() {
        task.abort();
    }

    match task.await {
        Ok(_) => Ok(()),
        Err(e) if e.is_cancelled() => Ok(()),
        Err(e) => Err(ToolsError::Task(e.to_string())),
    }
}

/// A group of tasks whose results are returned in creation order.
///
/// ```no_run
/// # async fn demo() -> sdsstools_types::Result<()> {
/// use sdsstools_core::util::GatheringTaskGroup;
///
/// let mut group = GatheringTaskGroup::new();
/// group.spawn(async { 1 });
/// group.spawn(async { 2 });
/// group.join().await?;
/// assert_eq!(group.results()?, &[1, 2]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GatheringTaskGroup<T> {
    tasks: Vec<JoinHandle<T>>,
    results: Option<Vec<T>>,
}

impl<T> Default for GatheringTaskGroup<T> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            results: None,
        }
    }
}

impl<T: Send + 'static> GatheringTaskGroup<T> {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task into the group.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.results = None;
        self.tasks.push(tokio::spawn(future));
    }

    /// Number of tasks spawned since the last join.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for all tasks. If one fails, the remaining ones are aborted.
    pub async fn join(&mut self) -> Result<()> {
        let tasks = std::mem::take(&mut self.tasks);
        let aborts: Vec<_> = tasks.iter().map(|t| t.abort_handle()).collect();

        match try_join_all(tasks).await {
            Ok(results) => {
                self.results = Some(results);
                Ok(())
            }
            Err(e) => {
                aborts.iter().for_each(|a| a.abort());
                Err(ToolsError::Task(e.to_string()))
            }
        }
    }

    /// Results of the last join, in the order the tasks were spawned.
    pub fn results(&self) -> Result<&[T]> {
        self.results
            .as_deref()
            .ok_or_else(|| ToolsError::Task("Tasks have not been gathered yet".to_string()))
    }

    /// Take ownership of the results of the last join.
    pub fn into_results(mut self) -> Result<Vec<T>> {
        self.results
            .take()
            .ok_or_else(|| ToolsError::Task("Tasks have not been gathered yet".to_string()))
    }
}

impl<T> Drop for GatheringTaskGroup<T> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_in_executor() {
        let value = run_in_executor(|| (1..=10).sum::<u32>()).await.unwrap();
        assert_eq!(value, 55);
    }

    #[tokio::test]
    async fn test_cancel_task() {
        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        cancel_task(Some(task)).await.unwrap();
        cancel_task::<()>(None).await.unwrap();

        let done = tokio::spawn(async { 5 });
        tokio::time::sleep(Duration::from_millis(10)).await;
        cancel_task(Some(done)).await.unwrap();
    }

    #[tokio::test]
    async fn test_gathering_group_keeps_order() {
        let mut group = GatheringTaskGroup::new();
        assert!(group.results().is_err());

        for (i, delay) in [30u64, 10, 20].into_iter().enumerate() {
            group.spawn(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                i
            });
        }
        assert_eq!(group.len(), 3);

        group.join().await.unwrap();
        assert_eq!(group.results().unwrap(), &[0, 1, 2]);
        assert_eq!(group.into_results().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_gathering_group_failure() {
        let mut group = GatheringTaskGroup::new();
        group.spawn(async { 1 });
        group.spawn(async { panic!("boom") });

        assert!(matches!(group.join().await, Err(ToolsError::Task(_))));
        assert!(group.results().is_err());
    }
}
