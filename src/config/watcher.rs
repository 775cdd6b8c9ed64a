//! Configuration file watcher for hot reload.

use std::any::Any;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::routing::registrar::ConfigSource;

/// Callback fired whenever a watched source changes.
pub type ChangeCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// Keeps a change listener alive. Dropping it stops notifications.
pub struct Subscription {
    _guard: Option<Box<dyn Any + Send>>,
}

impl Subscription {
    pub fn new<T: Send + 'static>(guard: T) -> Self {
        Self {
            _guard: Some(Box::new(guard)),
        }
    }

    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self { _guard: None }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self._guard.is_some())
            .finish()
    }
}

/// Source of change notifications for configuration sources.
pub trait ChangeNotifier: Send + Sync {
    /// Call `on_change` every time `source` changes.
    fn listen(&self, source: &ConfigSource, on_change: ChangeCallback) -> Result<Subscription, notify::Error>;
}

/// Watches configuration files on disk.
///
/// The parent directory is watched rather than the file itself, so editors
/// that replace the file on save keep triggering reloads. Bursts of events
/// (a save is a truncate followed by a write) are coalesced: the callback
/// fires once the file has been quiet for `quiet_period`.
#[derive(Debug, Clone)]
pub struct FileChangeNotifier {
    quiet_period: Duration,
}

impl FileChangeNotifier {
    pub fn new(quiet_period: Duration) -> Self {
        Self { quiet_period }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }
}

impl Default for FileChangeNotifier {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl ChangeNotifier for FileChangeNotifier {
    fn listen(&self, source: &ConfigSource, on_change: ChangeCallback) -> Result<Subscription, notify::Error> {
        let path = source.path().to_path_buf();
        let file_name = path.file_name().map(OsString::from);
        let watch_dir = watch_dir(&path);
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if is_relevant(&event.kind) && touches(&event, file_name.as_deref()) {
                        let _ = tx.send(());
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default(),
        )?;

        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

        let quiet_period = self.quiet_period;
        thread::Builder::new()
            .name("route-config-watch".into())
            .spawn(move || {
                while wait_for_quiet(&rx, quiet_period) {
                    tracing::info!(path = ?path, "Route configuration change detected, reloading...");
                    on_change();
                }
                tracing::debug!(path = ?path, "Route configuration watcher stopped");
            })
            .map_err(notify::Error::io)?;

        tracing::info!(path = %source, "Route configuration watcher started");
        Ok(Subscription::new(watcher))
    }
}

/// Block until at least one change arrived and no further change followed
/// within `quiet_period`. Returns `false` once the watcher is gone.
fn wait_for_quiet(rx: &Receiver<()>, quiet_period: Duration) -> bool {
    if rx.recv().is_err() {
        return false;
    }
    loop {
        match rx.recv_timeout(quiet_period) {
            Ok(()) => continue,
            Err(RecvTimeoutError::Timeout) => return true,
            Err(RecvTimeoutError::Disconnected) => return false,
        }
    }
}

/// Modifications, creations and removals all change what the source compiles to.
fn is_relevant(kind: &EventKind) -> bool {
    kind.is_modify() || kind.is_create() || kind.is_remove()
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn touches(event: &Event, file_name: Option<&std::ffi::OsStr>) -> bool {
    match file_name {
        Some(name) => event.paths.iter().any(|p| p.file_name() == Some(name)),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_watch_dir() {
        assert_eq!(watch_dir(Path::new("conf/routes.toml")), PathBuf::from("conf"));
        assert_eq!(watch_dir(Path::new("routes.toml")), PathBuf::from("."));
    }

    #[test]
    fn test_touches_filters_by_file_name() {
        let event = Event::new(EventKind::Create(CreateKind::File)).add_path(PathBuf::from("/etc/app/routes.toml"));
        assert!(touches(&event, Some(std::ffi::OsStr::new("routes.toml"))));
        assert!(!touches(&event, Some(std::ffi::OsStr::new("other.toml"))));
        assert!(touches(&event, None));
    }

    #[test]
    fn test_removal_is_relevant() {
        assert!(is_relevant(&EventKind::Remove(RemoveKind::File)));
        assert!(is_relevant(&EventKind::Modify(ModifyKind::Any)));
        assert!(is_relevant(&EventKind::Create(CreateKind::File)));
        assert!(!is_relevant(&EventKind::Access(notify::event::AccessKind::Any)));
    }

    #[test]
    fn test_wait_for_quiet_coalesces_burst() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..5 {
            tx.send(()).unwrap();
        }

        assert!(wait_for_quiet(&rx, Duration::from_millis(20)));
        assert!(rx.try_recv().is_err());

        drop(tx);
        assert!(!wait_for_quiet(&rx, Duration::from_millis(20)));
    }

    #[test]
    fn test_rewrites_never_observed_half_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        let content = "[[routes]]\nname = \"item\"\npattern = \"/items/{id}\"\n";
        std::fs::write(&path, content).unwrap();

        let callbacks = Arc::new(AtomicUsize::new(0));
        let empty_reads = Arc::new(AtomicUsize::new(0));
        let (seen, empty, read_path) = (callbacks.clone(), empty_reads.clone(), path.clone());

        let notifier = FileChangeNotifier::new(Duration::from_millis(150));
        let _subscription = notifier
            .listen(
                &ConfigSource::new(&path),
                Box::new(move || {
                    seen.fetch_add(1, Ordering::SeqCst);
                    if std::fs::read_to_string(&read_path).map_or(true, |s| s.is_empty()) {
                        empty.fetch_add(1, Ordering::SeqCst);
                    }
                }),
            )
            .unwrap();

        for _ in 0..30 {
            std::fs::write(&path, content).unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }
        std::thread::sleep(Duration::from_millis(1500));

        let fired = callbacks.load(Ordering::SeqCst);
        assert!(fired >= 1, "no change reported");
        assert!(fired < 30, "burst was not coalesced: {fired} callbacks");
        assert_eq!(empty_reads.load(Ordering::SeqCst), 0);
    }
}
