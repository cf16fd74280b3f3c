use std::path::Path;

/// Checks that `path` names an existing regular file.
///
/// # Parameters:
/// - `role`: What the file is for, used in the error message (e.g. `"Primary hash file"`).
/// - `path`: The path to check.
///
/// # Returns:
/// - `Ok(())` if the file exists and is a regular file.
/// - `Err(std::io::Error)` with `NotFound` if nothing exists at `path`, or
///   `InvalidInput` if it is a directory or other non-file.
pub fn verify_file_existence(role: &str, path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} '{}' does not exist.", role, path.display()),
        ));
    }

    if !path.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} '{}' is not a regular file.", role, path.display()),
        ));
    }

    Ok(())
}
