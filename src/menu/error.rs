use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for menu resolution
pub type MenuResult<T> = Result<T, MenuError>;

/// Errors that make a menu tree fail to load
#[derive(Error, Debug)]
pub enum MenuError {
    /// The home directory needed for the XDG base directories is unknown
    #[error("cannot determine XDG base directories: {0}")]
    BaseDirectories(#[from] xdg::BaseDirectoriesError),

    /// The menu file could not be located in any config directory
    #[error("menu file '{name}' not found (searched: {})", display_paths(.searched))]
    NotFound {
        /// Name or path the caller asked for
        name: String,
        /// Locations that were tried, highest priority first
        searched: Vec<PathBuf>,
    },

    /// The menu file exists but could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The menu file is not well-formed XML
    #[error("failed to parse {}: {source}", .path.display())]
    Xml {
        /// File being parsed
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: xmltree::ParseError,
    },

    /// The document element is not `<Menu>`
    #[error("{}: root element is <{found}>, expected <Menu>", .path.display())]
    InvalidRoot {
        /// File being parsed
        path: PathBuf,
        /// Name of the element that was found instead
        found: String,
    },

    /// A `<Menu>` element has no `<Name>`
    #[error("{}: <Menu> without a <Name>", .path.display())]
    MissingName {
        /// File containing the unnamed menu
        path: PathBuf,
    },
}

/// Errors raised while reading a single desktop or directory file
///
/// These never fail a load; the resolver logs and skips the file.
#[derive(Error, Debug)]
pub enum DesktopFileError {
    /// The file could not be read or decoded
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        /// File being decoded
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: freedesktop_desktop_entry::DecodeError,
    },

    /// The file has no `Name` key
    #[error("{}: missing Name key", .path.display())]
    MissingName {
        /// File being parsed
        path: PathBuf,
    },
}

/// Joins paths for error messages
fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
