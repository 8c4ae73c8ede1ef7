use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use tracing::warn;

use crate::dbc::types::errors::DbcSaveError;

/// Writes rendered DBC text to `path`, encoded as Windows-1252.
///
/// Ensures the destination has a `.dbc` extension (case-insensitive) and creates
/// intermediate directories when needed. Characters with no Windows-1252 mapping are
/// written as numeric character references by the encoder; a warning is logged when
/// that happens.
pub fn save_to_file(path: impl AsRef<Path>, text: &str) -> Result<(), DbcSaveError> {
    let path_ref: &Path = path.as_ref();
    let path_str: String = path_ref.display().to_string();

    if !path_str.to_ascii_lowercase().ends_with(".dbc") {
        return Err(DbcSaveError::InvalidExtension { path: path_str });
    }

    if let Some(parent) = path_ref.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| DbcSaveError::CreateDirectory {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let (bytes, _, unmappable): (Cow<'_, [u8]>, _, bool) = WINDOWS_1252.encode(text);
    if unmappable {
        warn!(path = %path_str, "text contains characters outside Windows-1252");
    }

    let file = File::create(path_ref).map_err(|source| DbcSaveError::CreateFile {
        path: path_str.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .map_err(|source| DbcSaveError::Write {
            path: path_str.clone(),
            source,
        })?;
    writer.flush().map_err(|source| DbcSaveError::Write {
        path: path_str,
        source,
    })?;
    Ok(())
}
