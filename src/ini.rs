//! Reader for weston-style ini files.
//!
//! Only the `[shell] background-image` key is used, but the format and the
//! file lookup follow weston so the shell shares the compositor's config.
//!
//! ```ini
//! # comment
//! [shell]
//! background-image=/usr/share/backgrounds/default.png
//! ```

use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Errors from reading an ini file.
#[derive(Debug, thiserror::Error)]
pub enum IniError {
    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: &'static str },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    pub name: String,
    entries: Vec<(String, String)>,
}

impl IniSection {
    /// Value of `key`.  Later duplicates win.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A parsed ini file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniFile {
    sections: Vec<IniSection>,
}

impl IniFile {
    /// Parse ini text.  A key outside any section, an unterminated section
    /// header or a line without `=` fails the whole file.
    pub fn parse(text: &str) -> Result<Self, IniError> {
        let mut sections: Vec<IniSection> = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_no = idx + 1;

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or(IniError::Syntax {
                    line: line_no,
                    reason: "unterminated section header",
                })?;
                sections.push(IniSection {
                    name: name.trim().to_string(),
                    entries: Vec::new(),
                });
                continue;
            }

            let (key, value) = line.split_once('=').ok_or(IniError::Syntax {
                line: line_no,
                reason: "expected key=value",
            })?;
            let section = sections.last_mut().ok_or(IniError::Syntax {
                line: line_no,
                reason: "key outside of a section",
            })?;
            section
                .entries
                .push((key.trim().to_string(), value.trim().to_string()));
        }
        Ok(Self { sections })
    }

    pub fn load(path: &Path) -> Result<Self, IniError> {
        let text = std::fs::read_to_string(path).map_err(|source| IniError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// The first section called `name`.
    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }
}

/// Ini file name from `WESTON_CONFIG_FILE`, default `weston.ini`.
pub fn config_name_from_env(env: impl Fn(&str) -> Option<String>) -> String {
    env("WESTON_CONFIG_FILE")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "weston.ini".to_string())
}

/// Where to look for `name`, most specific first.
///
/// Absolute paths are used as-is.  Otherwise `$XDG_CONFIG_HOME`,
/// `$HOME/.config`, every `$XDG_CONFIG_DIRS` entry (with a `weston/`
/// subdirectory, default `/etc/xdg`) and finally the current directory.
pub fn candidate_paths(name: &str, env: impl Fn(&str) -> Option<String>) -> Vec<PathBuf> {
    if name.starts_with('/') {
        return vec![PathBuf::from(name)];
    }

    let mut paths = Vec::new();
    if let Some(dir) = env("XDG_CONFIG_HOME").filter(|s| !s.is_empty()) {
        paths.push(Path::new(&dir).join(name));
    }
    if let Some(home) = env("HOME").filter(|s| !s.is_empty()) {
        paths.push(Path::new(&home).join(".config").join(name));
    }
    let dirs = env("XDG_CONFIG_DIRS")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "/etc/xdg".to_string());
    for dir in dirs.split(':').filter(|d| !d.is_empty()) {
        paths.push(Path::new(dir).join("weston").join(name));
    }
    paths.push(PathBuf::from(name));
    paths
}

/// Settings read from the `[shell]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellSettings {
    /// `None` means a plain SteelBlue background.
    pub background_image: Option<PathBuf>,
}

impl ShellSettings {
    pub fn from_ini(ini: &IniFile) -> Self {
        let background_image = ini
            .section("shell")
            .and_then(|s| s.get("background-image"))
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self { background_image }
    }

    /// Find and read the ini file.  A missing or broken file yields the
    /// defaults.
    pub fn load(env: impl Fn(&str) -> Option<String>) -> Self {
        let name = config_name_from_env(&env);
        let Some(path) = candidate_paths(&name, &env)
            .into_iter()
            .find(|p| p.is_file())
        else {
            debug!("no {} found, using default shell settings", name);
            return Self::default();
        };

        match IniFile::load(&path) {
            Ok(ini) => {
                info!("loaded shell settings from {}", path.display());
                Self::from_ini(&ini)
            }
            Err(e) => {
                warn!("{}: {}, using default shell settings", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn parse_sections_and_comments() {
        let ini = IniFile::parse(
            "# top comment\n\
             [core]\n\
             modules = xwayland.so\n\
             \n\
             [shell]\n\
             background-image=/tmp/bg.png\n\
             panel-position = left\n",
        )
        .unwrap();
        let shell = ini.section("shell").unwrap();
        assert_eq!(shell.get("background-image"), Some("/tmp/bg.png"));
        assert_eq!(shell.get("panel-position"), Some("left"));
        assert_eq!(ini.section("core").unwrap().get("modules"), Some("xwayland.so"));
        assert!(ini.section("output").is_none());
    }

    #[test]
    fn key_outside_section_is_rejected() {
        let err = IniFile::parse("foo=bar\n[shell]\n").unwrap_err();
        assert!(matches!(err, IniError::Syntax { line: 1, .. }));
    }

    #[test]
    fn line_without_equals_is_rejected() {
        let err = IniFile::parse("[shell]\n\nbackground-image\n").unwrap_err();
        assert!(matches!(err, IniError::Syntax { line: 3, .. }));
    }

    #[test]
    fn unterminated_header_is_rejected() {
        assert!(IniFile::parse("[shell\n").is_err());
    }

    #[test]
    fn empty_background_means_none() {
        let ini = IniFile::parse("[shell]\nbackground-image=\n").unwrap();
        assert_eq!(ShellSettings::from_ini(&ini).background_image, None);
        assert_eq!(ShellSettings::from_ini(&IniFile::default()), ShellSettings::default());
    }

    #[test]
    fn env_overrides_config_name() {
        assert_eq!(config_name_from_env(env_of(&[])), "weston.ini");
        assert_eq!(
            config_name_from_env(env_of(&[("WESTON_CONFIG_FILE", "custom.ini")])),
            "custom.ini"
        );
    }

    #[test]
    fn absolute_name_is_used_verbatim() {
        let paths = candidate_paths("/srv/shell.ini", env_of(&[("HOME", "/home/u")]));
        assert_eq!(paths, vec![PathBuf::from("/srv/shell.ini")]);
    }

    #[test]
    fn search_order_follows_xdg() {
        let paths = candidate_paths(
            "weston.ini",
            env_of(&[
                ("XDG_CONFIG_HOME", "/cfg"),
                ("HOME", "/home/u"),
                ("XDG_CONFIG_DIRS", "/etc/a:/etc/b"),
            ]),
        );
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/cfg/weston.ini"),
                PathBuf::from("/home/u/.config/weston.ini"),
                PathBuf::from("/etc/a/weston/weston.ini"),
                PathBuf::from("/etc/b/weston/weston.ini"),
                PathBuf::from("weston.ini"),
            ]
        );
    }

    #[test]
    fn config_dirs_default_to_etc_xdg() {
        let paths = candidate_paths("weston.ini", env_of(&[]));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/etc/xdg/weston/weston.ini"),
                PathBuf::from("weston.ini"),
            ]
        );
    }

    #[test]
    fn load_reads_file_named_by_env() {
        let path = std::env::temp_dir().join(format!("maynard-ini-{}.ini", std::process::id()));
        std::fs::write(&path, "[shell]\nbackground-image=/x/y.jpg\n").unwrap();
        let settings = ShellSettings::load(env_of(&[(
            "WESTON_CONFIG_FILE",
            path.to_str().unwrap(),
        )]));
        assert_eq!(settings.background_image, Some(PathBuf::from("/x/y.jpg")));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("maynard-bad-{}.ini", std::process::id()));
        std::fs::write(&path, "background-image=/x.png\n").unwrap();
        let settings = ShellSettings::load(env_of(&[(
            "WESTON_CONFIG_FILE",
            path.to_str().unwrap(),
        )]));
        assert_eq!(settings, ShellSettings::default());
        let _ = std::fs::remove_file(&path);
    }
}
