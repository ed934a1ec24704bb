//! XDG base directories and locale selection for menu resolution.
//!
//! Everything the resolver reads from the environment is captured once in
//! [`XdgDirs`] so that a load is deterministic and tests can inject their
//! own directory layout.

use super::error::{MenuError, MenuResult};
use std::env;
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

/// Menu file that `XDG_MENU_PREFIX` applies to
const APPLICATIONS_MENU: &str = "applications.menu";

/// Directory and locale settings consulted while resolving a menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdgDirs {
    /// `$XDG_CONFIG_HOME`
    pub config_home: PathBuf,
    /// `$XDG_CONFIG_DIRS`, highest priority first
    pub config_dirs: Vec<PathBuf>,
    /// `$XDG_DATA_HOME`
    pub data_home: PathBuf,
    /// `$XDG_DATA_DIRS`, highest priority first
    pub data_dirs: Vec<PathBuf>,
    /// `$XDG_MENU_PREFIX`
    pub menu_prefix: Option<String>,
    /// `$XDG_CURRENT_DESKTOP`, split on `:`
    pub current_desktops: Vec<String>,
    /// Locales tried in order for `Name[locale]`
    pub locales: Vec<String>,
}

impl XdgDirs {
    /// Captures the XDG settings of the running process
    ///
    /// # Errors
    /// Returns [`MenuError::BaseDirectories`] if the home directory cannot
    /// be determined.
    pub fn from_env() -> MenuResult<Self> {
        let base = BaseDirectories::new()?;

        let menu_prefix = env::var("XDG_MENU_PREFIX").ok().filter(|p| !p.is_empty());

        let current_desktops = env::var("XDG_CURRENT_DESKTOP")
            .map(|value| {
                value
                    .split(':')
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            config_home: base.get_config_home(),
            config_dirs: base.get_config_dirs(),
            data_home: base.get_data_home(),
            data_dirs: base.get_data_dirs(),
            menu_prefix,
            current_desktops,
            locales: freedesktop_desktop_entry::get_languages_from_env(),
        })
    }

    /// Builds settings rooted at explicit directories with no prefix,
    /// desktop or locale
    #[must_use]
    pub fn explicit(config_home: PathBuf, data_home: PathBuf) -> Self {
        Self {
            config_home,
            config_dirs: Vec::new(),
            data_home,
            data_dirs: Vec::new(),
            menu_prefix: None,
            current_desktops: Vec::new(),
            locales: Vec::new(),
        }
    }

    /// Puts `locale` ahead of the locales taken from the environment
    ///
    /// The encoding and modifier are dropped and the bare language follows
    /// `lang_COUNTRY`, so `de_AT.UTF-8` tries `de_AT` then `de`.
    pub fn prefer_locale(&mut self, locale: &str) {
        let name = locale.split(['.', '@']).next().unwrap_or(locale);
        let mut preferred = vec![name.to_string()];
        if let Some((lang, _)) = name.split_once('_') {
            preferred.push(lang.to_string());
        }

        self.locales.retain(|l| !preferred.contains(l));
        preferred.append(&mut self.locales);
        self.locales = preferred;
    }

    /// Config directories, highest priority first
    pub fn config_search_path(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.config_home.as_path()).chain(self.config_dirs.iter().map(PathBuf::as_path))
    }

    /// Data directories, highest priority first
    pub fn data_search_path(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.data_home.as_path()).chain(self.data_dirs.iter().map(PathBuf::as_path))
    }

    /// Locates a menu file by name or path
    ///
    /// Names containing a `/` are used as given. Bare names are looked up
    /// in `menus/` under each config directory, trying the
    /// `XDG_MENU_PREFIX`-ed name first for `applications.menu`.
    ///
    /// # Errors
    /// Returns [`MenuError::NotFound`] listing every location tried.
    pub fn find_menu_file(&self, name: &str) -> MenuResult<PathBuf> {
        if name.contains('/') {
            let path = PathBuf::from(name);
            if path.is_file() {
                return Ok(path);
            }
            return Err(MenuError::NotFound {
                name: name.to_string(),
                searched: vec![path],
            });
        }

        let mut candidates = Vec::new();
        if name == APPLICATIONS_MENU
            && let Some(prefix) = &self.menu_prefix
        {
            candidates.push(format!("{prefix}{name}"));
        }
        candidates.push(name.to_string());

        let mut searched = Vec::new();
        for candidate in &candidates {
            for dir in self.config_search_path() {
                let path = dir.join("menus").join(candidate);
                if path.is_file() {
                    return Ok(path);
                }
                searched.push(path);
            }
        }

        Err(MenuError::NotFound {
            name: name.to_string(),
            searched,
        })
    }

    /// `<DefaultAppDirs>` expansion, lowest priority first
    #[must_use]
    pub fn default_app_dirs(&self) -> Vec<PathBuf> {
        self.data_subdirs("applications")
    }

    /// `<DefaultDirectoryDirs>` expansion, lowest priority first
    #[must_use]
    pub fn default_directory_dirs(&self) -> Vec<PathBuf> {
        self.data_subdirs("desktop-directories")
    }

    /// `<DefaultMergeDirs>` expansion for a menu file, lowest priority first
    ///
    /// `applications.menu` merges from `menus/applications-merged`.
    #[must_use]
    pub fn default_merge_dirs(&self, menu_file: &Path) -> Vec<PathBuf> {
        let stem = menu_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("applications");
        let stem = self
            .menu_prefix
            .as_deref()
            .and_then(|prefix| stem.strip_prefix(prefix))
            .unwrap_or(stem);
        let merged = format!("{stem}-merged");

        let mut dirs: Vec<PathBuf> = self
            .config_search_path()
            .map(|dir| dir.join("menus").join(&merged))
            .collect();
        dirs.reverse();
        dirs
    }

    /// Whether an entry with the given `OnlyShowIn`/`NotShowIn` lists is
    /// shown in the current desktop
    #[must_use]
    pub fn shown_in_current_desktop(&self, only_show_in: &[String], not_show_in: &[String]) -> bool {
        let current = |d: &String| self.current_desktops.iter().any(|c| c == d);

        if !only_show_in.is_empty() && !only_show_in.iter().any(current) {
            return false;
        }
        !not_show_in.iter().any(current)
    }

    /// `<data dir>/<sub>` for every data directory, lowest priority first
    fn data_subdirs(&self, sub: &str) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self.data_search_path().map(|dir| dir.join(sub)).collect();
        dirs.reverse();
        dirs
    }
}
