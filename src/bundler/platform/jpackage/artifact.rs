//! Discovery of the artifact a packaging run produced.

use crate::bundler::error::Result;
use crate::bundler::settings::Format;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

/// Looks for the artifact `format` is expected to leave in `dest`.
///
/// Installers are found by extension (case-insensitive); images by their
/// `<name>` directory. Returns `Ok(None)` when nothing matches.
pub fn find_artifact(format: Format, dest: &Path, app_name: &str) -> Result<Option<PathBuf>> {
    let Some(extension) = format.artifact_extension() else {
        let image = dest.join(format.image_name(app_name));
        return Ok(image.is_dir().then_some(image));
    };

    let pattern = format!(
        "{}/*.{extension}",
        Pattern::escape(&dest.display().to_string())
    );
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut matches: Vec<PathBuf> = glob::glob_with(&pattern, options)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    matches.sort();

    if matches.len() > 1 {
        log::warn!(
            "Found {} .{} files in {}, reporting {}",
            matches.len(),
            extension,
            dest.display(),
            matches[0].display()
        );
    }
    Ok(matches.into_iter().next())
}
