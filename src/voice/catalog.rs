//! Lazily loaded, append-only cache of the platform's synthesis voices.

use crate::platform::VoiceSource;
use crate::voice::{Voice, VoiceId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use tracing::debug;

type Listener = Arc<dyn Fn(&[Voice]) + Send + Sync>;

#[derive(Default)]
struct CatalogState {
    voices: Arc<[Voice]>,
    ids: HashSet<VoiceId>,
}

/// Voices known to the synthesizer.
///
/// Empty until the platform reports its voices, which may happen some time
/// after start-up and more than once. Voices are added, never removed, and
/// readers always see a complete snapshot.
pub struct VoiceCatalog {
    source: Arc<dyn VoiceSource>,
    state: RwLock<CatalogState>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener: AtomicU64,
}

/// Handle returned by [`VoiceCatalog::subscribe`].
#[must_use = "dropping the handle keeps the listener registered"]
pub struct Unsubscribe {
    catalog: Weak<VoiceCatalog>,
    id: u64,
}

impl Unsubscribe {
    /// Remove the listener. Does nothing if the catalog is gone.
    pub fn unsubscribe(self) {
        if let Some(catalog) = self.catalog.upgrade() {
            catalog.listeners().retain(|(id, _)| *id != self.id);
        }
    }
}

impl VoiceCatalog {
    /// Creates an empty catalog backed by `source`. Nothing is read until
    /// [`load`](Self::load) is called.
    pub fn new(source: Arc<dyn VoiceSource>) -> Arc<Self> {
        Arc::new(Self {
            source,
            state: RwLock::new(CatalogState::default()),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        })
    }

    /// Re-read the platform voice list and merge new voices.
    ///
    /// Returns the number of voices added. Listeners are notified once when
    /// the number is non-zero.
    pub fn load(&self) -> usize {
        let fetched = self.source.voices();

        let (added, snapshot) = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let mut voices: Vec<Voice> = state.voices.to_vec();
            let before = voices.len();
            for voice in fetched {
                if state.ids.insert(voice.id.clone()) {
                    voices.push(voice);
                }
            }
            let added = voices.len() - before;
            if added > 0 {
                state.voices = Arc::from(voices);
            }
            (added, Arc::clone(&state.voices))
        };

        if added > 0 {
            debug!(
                added,
                total = snapshot.len(),
                voices = ?snapshot.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "voice catalog updated"
            );
            self.notify(&snapshot);
        }
        added
    }

    /// Platform hook for "voices changed" notifications.
    pub fn on_voices_changed(&self) {
        self.load();
    }

    /// Register `on_change`, called with the full snapshot after every change.
    ///
    /// Called immediately if the catalog already holds voices.
    pub fn subscribe<F>(self: &Arc<Self>, on_change: F) -> Unsubscribe
    where
        F: Fn(&[Voice]) + Send + Sync + 'static,
    {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        let listener: Listener = Arc::new(on_change);
        self.listeners().push((id, Arc::clone(&listener)));

        let snapshot = self.current();
        if !snapshot.is_empty() {
            listener(&snapshot);
        }

        Unsubscribe {
            catalog: Arc::downgrade(self),
            id,
        }
    }

    /// Current snapshot of the catalog.
    pub fn current(&self) -> Arc<[Voice]> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&state.voices)
    }

    pub fn len(&self) -> usize {
        self.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    /// Look a voice up by id.
    pub fn get(&self, id: &VoiceId) -> Option<Voice> {
        self.current().iter().find(|voice| &voice.id == id).cloned()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(u64, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Listeners run without any catalog lock held so they may call back in.
    fn notify(&self, snapshot: &[Voice]) {
        let listeners: Vec<Listener> = self
            .listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockSynthesizer;
    use std::sync::atomic::AtomicUsize;

    fn samantha() -> Voice {
        Voice::new("v1", "Samantha", "en-US")
    }

    fn david() -> Voice {
        Voice::new("v2", "David", "en-US")
    }

    fn counting_listener(catalog: &Arc<VoiceCatalog>) -> (Arc<AtomicUsize>, Unsubscribe) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = catalog.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (calls, handle)
    }

    #[test]
    fn test_catalog_starts_empty_until_loaded() {
        let platform = MockSynthesizer::new().with_voices(vec![samantha()]);
        let catalog = VoiceCatalog::new(Arc::new(platform));

        assert!(catalog.is_empty());
        assert_eq!(catalog.load(), 1);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_load_is_idempotent() {
        let platform = MockSynthesizer::new().with_voices(vec![samantha(), david()]);
        let catalog = VoiceCatalog::new(Arc::new(platform));
        let (calls, _handle) = counting_listener(&catalog);

        assert_eq!(catalog.load(), 2);
        assert_eq!(catalog.load(), 0);
        assert_eq!(catalog.load(), 0);

        assert_eq!(catalog.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1, "one notification per change");
    }

    #[test]
    fn test_voices_changed_requeries_platform() {
        let platform = MockSynthesizer::new();
        let catalog = VoiceCatalog::new(Arc::new(platform.clone()));
        let (calls, _handle) = counting_listener(&catalog);

        catalog.load();
        assert!(catalog.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        platform.install_voices(vec![samantha()]);
        catalog.on_voices_changed();

        assert_eq!(catalog.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    struct ShrinkingSource {
        reads: Mutex<Vec<Vec<Voice>>>,
    }

    impl VoiceSource for ShrinkingSource {
        fn voices(&self) -> Vec<Voice> {
            self.reads.lock().unwrap().pop().unwrap_or_default()
        }
    }

    #[test]
    fn test_catalog_never_shrinks() {
        // Reads are popped from the back: first both voices, then only David
        let source = ShrinkingSource {
            reads: Mutex::new(vec![vec![david()], vec![samantha(), david()]]),
        };
        let catalog = VoiceCatalog::new(Arc::new(source));

        assert_eq!(catalog.load(), 2);
        assert_eq!(catalog.load(), 0);

        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(&VoiceId::new("v1")).is_some());
    }

    #[test]
    fn test_subscribe_receives_current_state_when_non_empty() {
        let platform = MockSynthesizer::new().with_voices(vec![samantha()]);
        let catalog = VoiceCatalog::new(Arc::new(platform));
        catalog.load();

        let (calls, _handle) = counting_listener(&catalog);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscribe_on_empty_catalog_waits() {
        let catalog = VoiceCatalog::new(Arc::new(MockSynthesizer::new()));
        let (calls, _handle) = counting_listener(&catalog);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let platform = MockSynthesizer::new();
        let catalog = VoiceCatalog::new(Arc::new(platform.clone()));
        let (calls, handle) = counting_listener(&catalog);

        handle.unsubscribe();
        assert_eq!(catalog.listener_count(), 0);

        platform.install_voices(vec![samantha()]);
        catalog.load();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_may_read_catalog() {
        let platform = MockSynthesizer::new();
        let catalog = VoiceCatalog::new(Arc::new(platform.clone()));
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_listener = Arc::clone(&seen);
        let weak = Arc::downgrade(&catalog);
        let _handle = catalog.subscribe(move |_| {
            if let Some(catalog) = weak.upgrade() {
                seen_in_listener.store(catalog.len(), Ordering::SeqCst);
            }
        });

        platform.install_voices(vec![samantha(), david()]);
        catalog.load();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_snapshot_is_stable_across_loads() {
        let platform = MockSynthesizer::new().with_voices(vec![samantha()]);
        let catalog = VoiceCatalog::new(Arc::new(platform.clone()));
        catalog.load();

        let snapshot = catalog.current();
        platform.install_voices(vec![david()]);
        catalog.load();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(catalog.current().len(), 2);
    }
}
