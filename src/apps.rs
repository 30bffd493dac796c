//! Installed applications.
//!
//! [`AppRegistry`] is built once at startup from an [`AppSource`] and
//! handed by reference to the launcher grid and the panel favorites.

use log::{debug, info, warn};
use std::collections::HashMap;

/// One launchable application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Desktop file id, e.g. `firefox.desktop`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Icon theme name or path.
    pub icon: Option<String>,
}

impl AppInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Enumerates applications that should be shown to the user.
pub trait AppSource {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    fn apps(&self) -> Result<Vec<AppInfo>, Self::Error>;
}

/// Applications by id.
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    apps: HashMap<String, AppInfo>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents.  With duplicate ids the last entry wins.
    pub fn replace_all(&mut self, apps: impl IntoIterator<Item = AppInfo>) {
        self.apps = apps.into_iter().map(|a| (a.id.clone(), a)).collect();
    }

    /// Re-read `source`.  On error the current contents are kept.
    pub fn reload<S: AppSource>(&mut self, source: &S) {
        match source.apps() {
            Ok(apps) => {
                self.replace_all(apps);
                info!("{} applications installed", self.apps.len());
            }
            Err(e) => warn!("listing applications failed: {}", e),
        }
    }

    pub fn get(&self, id: &str) -> Option<&AppInfo> {
        self.apps.get(id)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Every application, ordered by display name ignoring case.  Ties are
    /// broken by id so the order is stable.
    pub fn sorted(&self) -> Vec<&AppInfo> {
        let mut apps: Vec<&AppInfo> = self.apps.values().collect();
        apps.sort_by_cached_key(|a| (a.name.to_lowercase(), a.id.clone()));
        apps
    }

    /// Resolve favorite ids in order, skipping ones that are not installed.
    pub fn favorites<'a>(&'a self, ids: &[String]) -> Vec<&'a AppInfo> {
        ids.iter()
            .filter_map(|id| {
                let app = self.apps.get(id);
                if app.is_none() {
                    debug!("favorite {} is not installed", id);
                }
                app
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("no app dirs")]
    struct NoDirs;

    struct FixedSource(Result<Vec<AppInfo>, ()>);

    impl AppSource for FixedSource {
        type Error = NoDirs;

        fn apps(&self) -> Result<Vec<AppInfo>, NoDirs> {
            self.0.clone().map_err(|_| NoDirs)
        }
    }

    fn registry() -> AppRegistry {
        let mut r = AppRegistry::new();
        r.replace_all(vec![
            AppInfo::new("zed.desktop", "zed"),
            AppInfo::new("firefox.desktop", "Firefox").with_icon("firefox"),
            AppInfo::new("alacritty.desktop", "Alacritty"),
            AppInfo::new("baobab.desktop", "baobab"),
        ]);
        r
    }

    #[test]
    fn sorted_ignores_case() {
        let r = registry();
        let names: Vec<&str> = r.sorted().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Alacritty", "baobab", "Firefox", "zed"]);
    }

    #[test]
    fn favorites_keep_order_and_skip_unknown() {
        let r = registry();
        let favs = r.favorites(&[
            "zed.desktop".to_string(),
            "missing.desktop".to_string(),
            "firefox.desktop".to_string(),
        ]);
        let ids: Vec<&str> = favs.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["zed.desktop", "firefox.desktop"]);
        assert_eq!(favs[1].icon.as_deref(), Some("firefox"));
    }

    #[test]
    fn reload_replaces_contents() {
        let mut r = registry();
        r.reload(&FixedSource(Ok(vec![AppInfo::new("gedit.desktop", "Text Editor")])));
        assert_eq!(r.len(), 1);
        assert!(r.get("gedit.desktop").is_some());
        assert!(r.get("zed.desktop").is_none());
    }

    #[test]
    fn failed_reload_keeps_contents() {
        let mut r = registry();
        r.reload(&FixedSource(Err(())));
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn duplicate_ids_last_wins() {
        let mut r = AppRegistry::new();
        r.replace_all(vec![AppInfo::new("a", "Old"), AppInfo::new("a", "New")]);
        assert_eq!(r.len(), 1);
        assert_eq!(r.get("a").unwrap().name, "New");
    }
}
