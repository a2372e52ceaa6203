use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("failed to read font file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a usable TrueType/OpenType font")]
    Parse { path: PathBuf },
}

/// Font used for overlay labels, decided once at startup.
pub enum OverlayFont {
    /// Scalable outline font (first face of a `.ttf`/`.otf`/`.ttc`).
    TrueType(FontVec),
    /// Built-in 8×8 bitmap font.
    Builtin,
}

impl OverlayFont {
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let data = fs::read(path).map_err(|source| FontError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontVec::try_from_vec_and_index(data, 0).map_err(|_| FontError::Parse {
            path: path.to_path_buf(),
        })?;
        Ok(OverlayFont::TrueType(font))
    }

    /// Loads `path`, or falls back to the built-in font for the whole run.
    pub fn load_or_builtin(path: &Path) -> Self {
        match Self::load(path) {
            Ok(font) => {
                log::info!("Loaded overlay font {}", path.display());
                font
            }
            Err(e) => {
                log::warn!(
                    "Could not load font file '{}' ({e}). Please ensure the file exists and is accessible. Using default font.",
                    path.display()
                );
                OverlayFont::Builtin
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, OverlayFont::Builtin)
    }
}

impl std::fmt::Debug for OverlayFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlayFont::TrueType(_) => f.write_str("OverlayFont::TrueType"),
            OverlayFont::Builtin => f.write_str("OverlayFont::Builtin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_read_error() {
        let err = OverlayFont::load(Path::new("/nonexistent/font.ttc")).unwrap_err();
        assert!(matches!(err, FontError::Read { .. }));
    }

    #[test]
    fn test_garbage_file_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.ttf");
        fs::write(&path, b"definitely not a font").unwrap();
        let err = OverlayFont::load(&path).unwrap_err();
        assert!(matches!(err, FontError::Parse { .. }));
        assert!(err.to_string().contains("broken.ttf"));
    }

    #[test]
    fn test_load_or_builtin_falls_back() {
        let font = OverlayFont::load_or_builtin(Path::new("/nonexistent/font.ttc"));
        assert!(font.is_builtin());
    }
}
