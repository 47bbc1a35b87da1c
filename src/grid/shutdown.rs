//! Graceful shutdown hooks

use std::sync::Mutex;

use futures_util::future::BoxFuture;
use log::info;

/// A cleanup task run once at shutdown
pub type ShutdownHook = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Port through which components register cleanup work
pub trait ShutdownRegistrar: Send + Sync {
    fn on_shutdown(&self, hook: ShutdownHook);
}

/// Collects shutdown hooks and runs them in registration order
#[derive(Default)]
pub struct GracefulShutdown {
    hooks: Mutex<Vec<ShutdownHook>>,
}

impl GracefulShutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of hooks waiting to run
    pub fn pending(&self) -> usize {
        self.hooks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Run and drain every registered hook
    ///
    /// Hooks registered while shutting down are picked up too.
    pub async fn shutdown(&self) {
        loop {
            let hooks: Vec<ShutdownHook> =
                std::mem::take(&mut *self.hooks.lock().unwrap_or_else(|e| e.into_inner()));
            if hooks.is_empty() {
                break;
            }

            info!("Running {} shutdown hook(s)", hooks.len());
            for hook in hooks {
                hook().await;
            }
        }
    }
}

impl ShutdownRegistrar for GracefulShutdown {
    fn on_shutdown(&self, hook: ShutdownHook) {
        self.hooks.lock().unwrap_or_else(|e| e.into_inner()).push(hook);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_hooks_run_in_order_once() {
        let shutdown = GracefulShutdown::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let calls = calls.clone();
            shutdown.on_shutdown(Box::new(move || {
                async move {
                    calls.lock().unwrap().push(i);
                }
                .boxed()
            }));
        }
        assert_eq!(shutdown.pending(), 3);

        shutdown.shutdown().await;
        assert_eq!(*calls.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(shutdown.pending(), 0);

        shutdown.shutdown().await;
        assert_eq!(calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_hook_registered_during_shutdown_runs() {
        let shutdown = Arc::new(GracefulShutdown::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let inner = shutdown.clone();
        let outer_counter = counter.clone();
        shutdown.on_shutdown(Box::new(move || {
            async move {
                outer_counter.fetch_add(1, Ordering::SeqCst);
                let late_counter = outer_counter.clone();
                inner.on_shutdown(Box::new(move || {
                    async move {
                        late_counter.fetch_add(1, Ordering::SeqCst);
                    }
                    .boxed()
                }));
            }
            .boxed()
        }));

        shutdown.shutdown().await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
