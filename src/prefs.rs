//! Theme and accessibility preferences.
//!
//! A [`PreferencesStore`] owns the user's choices, persists them through a
//! [`KeyValueStore`] and follows the system color-scheme and reduced-motion
//! queries through a [`MediaQuerySource`] for as long as it lives.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const THEME_KEY: &str = "theme";
pub const A11Y_KEY: &str = "a11y";

pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSetting {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    #[default]
    Normal,
    Large,
}

impl TextSize {
    pub fn as_str(self) -> &'static str {
        match self {
            TextSize::Normal => "normal",
            TextSize::Large => "large",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A11ySettings {
    pub text_size: TextSize,
    pub high_contrast: bool,
    pub reduce_motion: bool,
}

/// A partial change to [`A11ySettings`]; `None` leaves a setting as it is.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct A11yUpdate {
    pub text_size: Option<TextSize>,
    pub high_contrast: Option<bool>,
    pub reduce_motion: Option<bool>,
}

impl A11ySettings {
    fn apply(&mut self, update: A11yUpdate) {
        if let Some(v) = update.text_size {
            self.text_size = v;
        }
        if let Some(v) = update.high_contrast {
            self.high_contrast = v;
        }
        if let Some(v) = update.reduce_motion {
            self.reduce_motion = v;
        }
    }
}

/// String-valued persistent storage, one JSON document per key.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keeps every key in a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PersistenceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        Ok(serde_json::from_str(&text)?)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                warn!("ignoring unreadable preferences file: {e}");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        let text = serde_json::to_string_pretty(&entries)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, text).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct SubscriptionId(u64);

pub type MediaCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Answers media queries and reports when their answer changes.
pub trait MediaQuerySource: Send + Sync {
    fn matches(&self, query: &str) -> bool;
    fn subscribe(&self, query: &str, callback: MediaCallback) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fixed answers that never change. Used when rendering on the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMedia {
    pub prefers_dark: bool,
    pub prefers_reduced_motion: bool,
}

impl MediaQuerySource for StaticMedia {
    fn matches(&self, query: &str) -> bool {
        match query {
            DARK_SCHEME_QUERY => self.prefers_dark,
            REDUCED_MOTION_QUERY => self.prefers_reduced_motion,
            _ => false,
        }
    }

    fn subscribe(&self, _query: &str, _callback: MediaCallback) -> SubscriptionId {
        SubscriptionId(0)
    }

    fn unsubscribe(&self, _id: SubscriptionId) {}
}

#[derive(Default)]
struct ManualState {
    answers: BTreeMap<String, bool>,
    subscribers: BTreeMap<SubscriptionId, (String, MediaCallback)>,
    next_id: u64,
}

/// Media source whose answers are changed by hand, notifying subscribers.
#[derive(Default)]
pub struct ManualMedia {
    state: Mutex<ManualState>,
}

impl ManualMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, query: &str, matches: bool) {
        let callbacks: Vec<MediaCallback> = {
            let mut state = lock(&self.state);
            state.answers.insert(query.to_string(), matches);
            state
                .subscribers
                .values()
                .filter(|(q, _)| q == query)
                .map(|(_, callback)| Arc::clone(callback))
                .collect()
        };
        for callback in callbacks {
            callback(matches);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).subscribers.len()
    }
}

impl MediaQuerySource for ManualMedia {
    fn matches(&self, query: &str) -> bool {
        lock(&self.state).answers.get(query).copied().unwrap_or(false)
    }

    fn subscribe(&self, query: &str, callback: MediaCallback) -> SubscriptionId {
        let mut state = lock(&self.state);
        state.next_id += 1;
        let id = SubscriptionId(state.next_id);
        state.subscribers.insert(id, (query.to_string(), callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        lock(&self.state).subscribers.remove(&id);
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SystemState {
    prefers_dark: bool,
    prefers_reduced_motion: bool,
}

pub struct PreferencesStore {
    storage: Box<dyn KeyValueStore>,
    media: Arc<dyn MediaQuerySource>,
    subscriptions: Vec<SubscriptionId>,
    system: Arc<Mutex<SystemState>>,
    theme_setting: ThemeSetting,
    a11y: A11ySettings,
}

impl PreferencesStore {
    pub fn new(storage: Box<dyn KeyValueStore>, media: Arc<dyn MediaQuerySource>) -> Self {
        let theme_setting = load(&*storage, THEME_KEY);
        let a11y = load(&*storage, A11Y_KEY);
        let system = Arc::new(Mutex::new(SystemState {
            prefers_dark: media.matches(DARK_SCHEME_QUERY),
            prefers_reduced_motion: media.matches(REDUCED_MOTION_QUERY),
        }));

        let dark = Arc::clone(&system);
        let motion = Arc::clone(&system);
        let subscriptions = vec![
            media.subscribe(
                DARK_SCHEME_QUERY,
                Arc::new(move |matches| lock(&dark).prefers_dark = matches),
            ),
            media.subscribe(
                REDUCED_MOTION_QUERY,
                Arc::new(move |matches| lock(&motion).prefers_reduced_motion = matches),
            ),
        ];

        Self {
            storage,
            media,
            subscriptions,
            system,
            theme_setting,
            a11y,
        }
    }

    /// Defaults with no persistence and no system preferences.
    pub fn ephemeral() -> Self {
        Self::new(Box::new(MemoryStore::new()), Arc::new(StaticMedia::default()))
    }

    pub fn theme_setting(&self) -> ThemeSetting {
        self.theme_setting
    }

    pub fn theme(&self) -> Theme {
        match self.theme_setting {
            ThemeSetting::Light => Theme::Light,
            ThemeSetting::Dark => Theme::Dark,
            ThemeSetting::System if lock(&self.system).prefers_dark => Theme::Dark,
            ThemeSetting::System => Theme::Light,
        }
    }

    pub fn set_theme_setting(&mut self, setting: ThemeSetting) {
        self.theme_setting = setting;
        self.persist(THEME_KEY, &setting);
    }

    /// Dark goes to light; light and system both go to dark.
    pub fn toggle_theme(&mut self) {
        let next = match self.theme_setting {
            ThemeSetting::Dark => ThemeSetting::Light,
            ThemeSetting::Light | ThemeSetting::System => ThemeSetting::Dark,
        };
        self.set_theme_setting(next);
    }

    pub fn a11y(&self) -> A11ySettings {
        self.a11y
    }

    pub fn update_a11y(&mut self, update: A11yUpdate) {
        self.a11y.apply(update);
        let a11y = self.a11y;
        self.persist(A11Y_KEY, &a11y);
    }

    pub fn reduce_motion(&self) -> bool {
        self.a11y.reduce_motion || lock(&self.system).prefers_reduced_motion
    }

    /// Attributes for the document's `<html>` element.
    pub fn html_attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            ("lang", "en".to_string()),
            ("data-theme", self.theme().as_str().to_string()),
            ("data-text-size", self.a11y.text_size.as_str().to_string()),
            ("data-high-contrast", self.a11y.high_contrast.to_string()),
            ("data-reduce-motion", self.reduce_motion().to_string()),
        ]
    }

    fn persist<T: Serialize>(&mut self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(PersistenceError::from)
            .and_then(|text| self.storage.set(key, &text));
        if let Err(e) = result {
            warn!("could not save preference {key}: {e}");
        }
    }
}

impl Drop for PreferencesStore {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.media.unsubscribe(id);
        }
    }
}

fn load<T: Default + DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> T {
    let Some(text) = storage.get(key) else {
        return T::default();
    };
    serde_json::from_str(&text).unwrap_or_else(|e| {
        debug!("discarding stored {key}: {e}");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io {
                path: PathBuf::from(key),
                source: std::io::Error::other("read-only"),
            })
        }
    }

    fn attribute(store: &PreferencesStore, name: &str) -> String {
        store
            .html_attributes()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
            .unwrap_or_default()
    }

    #[test]
    fn defaults_follow_system_light_scheme() {
        let store = PreferencesStore::ephemeral();
        assert_eq!(store.theme_setting(), ThemeSetting::System);
        assert_eq!(store.theme(), Theme::Light);
        assert_eq!(store.a11y(), A11ySettings::default());
        assert!(!store.reduce_motion());
        assert_eq!(
            store.html_attributes(),
            vec![
                ("lang", "en".to_string()),
                ("data-theme", "light".to_string()),
                ("data-text-size", "normal".to_string()),
                ("data-high-contrast", "false".to_string()),
                ("data-reduce-motion", "false".to_string()),
            ]
        );
    }

    #[test]
    fn system_theme_tracks_media_changes_until_dropped() {
        let media = Arc::new(ManualMedia::new());
        let store = PreferencesStore::new(Box::new(MemoryStore::new()), media.clone());
        assert_eq!(media.subscriber_count(), 2);
        assert_eq!(store.theme(), Theme::Light);

        media.set(DARK_SCHEME_QUERY, true);
        assert_eq!(store.theme(), Theme::Dark);
        media.set(REDUCED_MOTION_QUERY, true);
        assert!(store.reduce_motion());

        drop(store);
        assert_eq!(media.subscriber_count(), 0);
    }

    #[test]
    fn explicit_theme_ignores_system_scheme() {
        let media = Arc::new(ManualMedia::new());
        media.set(DARK_SCHEME_QUERY, true);
        let mut store = PreferencesStore::new(Box::new(MemoryStore::new()), media);
        store.set_theme_setting(ThemeSetting::Light);
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn toggle_from_system_goes_dark_then_light() {
        let media = Arc::new(StaticMedia {
            prefers_dark: true,
            prefers_reduced_motion: false,
        });
        let mut store = PreferencesStore::new(Box::new(MemoryStore::new()), media);
        assert_eq!(store.theme(), Theme::Dark);

        store.toggle_theme();
        assert_eq!(store.theme_setting(), ThemeSetting::Dark);
        store.toggle_theme();
        assert_eq!(store.theme_setting(), ThemeSetting::Light);
        store.toggle_theme();
        assert_eq!(store.theme_setting(), ThemeSetting::Dark);
    }

    #[test]
    fn reduce_motion_is_user_or_system() {
        let media = Arc::new(ManualMedia::new());
        let mut store = PreferencesStore::new(Box::new(MemoryStore::new()), media.clone());
        store.update_a11y(A11yUpdate {
            reduce_motion: Some(true),
            ..A11yUpdate::default()
        });
        assert!(store.reduce_motion());

        store.update_a11y(A11yUpdate {
            reduce_motion: Some(false),
            ..A11yUpdate::default()
        });
        assert!(!store.reduce_motion());
        media.set(REDUCED_MOTION_QUERY, true);
        assert!(store.reduce_motion());
        assert!(!store.a11y().reduce_motion);
    }

    #[test]
    fn partial_update_keeps_other_settings() {
        let mut store = PreferencesStore::ephemeral();
        store.update_a11y(A11yUpdate {
            high_contrast: Some(true),
            ..A11yUpdate::default()
        });
        store.update_a11y(A11yUpdate {
            text_size: Some(TextSize::Large),
            ..A11yUpdate::default()
        });
        assert_eq!(
            store.a11y(),
            A11ySettings {
                text_size: TextSize::Large,
                high_contrast: true,
                reduce_motion: false,
            }
        );
        assert_eq!(attribute(&store, "data-text-size"), "large");
        assert_eq!(attribute(&store, "data-high-contrast"), "true");
    }

    #[test]
    fn stored_values_are_loaded_and_corrupt_ones_ignored() {
        let storage = MemoryStore::new()
            .with_entry(THEME_KEY, "\"dark\"")
            .with_entry(A11Y_KEY, "{not json");
        let store = PreferencesStore::new(Box::new(storage), Arc::new(StaticMedia::default()));
        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.a11y(), A11ySettings::default());
    }

    #[test]
    fn persistence_failures_do_not_block_updates() {
        let mut store =
            PreferencesStore::new(Box::new(FailingStore), Arc::new(StaticMedia::default()));
        store.toggle_theme();
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn json_file_store_round_trips_between_sessions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("prefs.json");

        {
            let mut store = PreferencesStore::new(
                Box::new(JsonFileStore::new(&path)),
                Arc::new(StaticMedia::default()),
            );
            store.set_theme_setting(ThemeSetting::Dark);
            store.update_a11y(A11yUpdate {
                text_size: Some(TextSize::Large),
                ..A11yUpdate::default()
            });
        }

        let store = PreferencesStore::new(
            Box::new(JsonFileStore::new(&path)),
            Arc::new(StaticMedia::default()),
        );
        assert_eq!(store.theme_setting(), ThemeSetting::Dark);
        assert_eq!(store.a11y().text_size, TextSize::Large);

        let raw = fs::read_to_string(&path).expect("prefs file");
        let entries: BTreeMap<String, String> = serde_json::from_str(&raw).expect("json");
        assert_eq!(entries.get(THEME_KEY).map(String::as_str), Some("\"dark\""));
    }

    #[test]
    fn json_file_store_treats_corrupt_file_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, "[1, 2").expect("write");

        let mut storage = JsonFileStore::new(&path);
        assert_eq!(storage.get(THEME_KEY), None);
        storage.set(THEME_KEY, "\"light\"").expect("overwrite");
        assert_eq!(storage.get(THEME_KEY).as_deref(), Some("\"light\""));
    }
}
