#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wmxdgmenu::menu::{MenuTree, MenuTreeFlags, XdgDirs};

/// XDG directory fixture for consistent test setup
///
/// Menus go to `config/menus/`, desktop entries to
/// `data/applications/`, directory files to `data/desktop-directories/`.
pub struct MenuFixture {
    pub temp_dir: TempDir,
}

impl MenuFixture {
    /// Create an empty XDG layout
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        fs::create_dir_all(temp_dir.path().join("config/menus"))?;
        fs::create_dir_all(temp_dir.path().join("data/applications"))?;
        fs::create_dir_all(temp_dir.path().join("data/desktop-directories"))?;
        Ok(Self { temp_dir })
    }

    /// Get the temporary directory path
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_home(&self) -> PathBuf {
        self.path().join("config")
    }

    pub fn data_home(&self) -> PathBuf {
        self.path().join("data")
    }

    /// Path of the configuration file inside the fixture
    pub fn config_file(&self) -> PathBuf {
        self.path().join("wmxdgmenu.toml")
    }

    /// Writes `config/menus/<name>` with `body` inside a root menu that
    /// uses the default app and directory dirs
    pub fn menu(&self, name: &str, body: &str) -> Result<PathBuf> {
        let path = self.config_home().join("menus").join(name);
        fs::write(
            &path,
            format!(
                "<!DOCTYPE Menu PUBLIC \"-//freedesktop//DTD Menu 1.0//EN\"\n \
                 \"http://www.freedesktop.org/standards/menu-spec/menu-1.0.dtd\">\n\
                 <Menu>\n  <Name>Applications</Name>\n  <DefaultAppDirs/>\n  \
                 <DefaultDirectoryDirs/>\n  {body}\n</Menu>\n"
            ),
        )?;
        Ok(path)
    }

    /// Writes `applications.menu`
    pub fn applications_menu(&self, body: &str) -> Result<PathBuf> {
        self.menu("applications.menu", body)
    }

    /// Writes a desktop entry with the given name, command and extra lines
    pub fn app(&self, file: &str, name: &str, exec: &str, extra: &str) -> Result<()> {
        let path = self.data_home().join("applications").join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(
            path,
            format!("[Desktop Entry]\nType=Application\nName={name}\nExec={exec}\n{extra}\n"),
        )?;
        Ok(())
    }

    /// Writes a `.directory` file
    pub fn directory(&self, file: &str, name: &str, extra: &str) -> Result<()> {
        fs::write(
            self.data_home().join("desktop-directories").join(file),
            format!("[Desktop Entry]\nType=Directory\nName={name}\n{extra}\n"),
        )?;
        Ok(())
    }

    /// Writes the configuration file
    pub fn config(&self, toml: &str) -> Result<()> {
        fs::write(self.config_file(), toml)?;
        Ok(())
    }

    /// Directory settings pointing only at the fixture
    pub fn xdg(&self) -> XdgDirs {
        XdgDirs::explicit(self.config_home(), self.data_home())
    }

    /// Loads a menu through the library
    pub fn load(&self, menu_file: &str, flags: MenuTreeFlags) -> Result<MenuTree> {
        let mut tree = MenuTree::with_dirs(menu_file, flags, self.xdg());
        tree.load_sync()?;
        Ok(tree)
    }

    /// The binary with its environment pointed at the fixture
    pub fn command(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("wmxdgmenu")?;
        cmd.env_clear()
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_CONFIG_DIRS", self.path().join("no-system-config"))
            .env("XDG_DATA_HOME", self.data_home())
            .env("XDG_DATA_DIRS", self.path().join("no-system-data"))
            .env("WMXDGMENU_CONFIG_PATH", self.config_file())
            .env("LANG", "C");
        Ok(cmd)
    }
}

/// Entry `(name, SHEXEC, command)` as printed
pub fn shexec(name: &str, command: &str) -> String {
    wmxdgmenu::plist::PropList::array([
        name.into(),
        wmxdgmenu::walker::SHEXEC.into(),
        command.into(),
    ])
    .description()
}
