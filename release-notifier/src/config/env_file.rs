//! `.env` file loading.

use std::io;
use std::path::Path;

/// Loads `KEY=VALUE` pairs from an env file into the process environment.
///
/// Variables that are already set are never overridden, so the real
/// environment always wins over the file. Blank lines and `#` comments are
/// skipped, a leading `export ` is tolerated, and single or double quotes
/// around a value are stripped.
///
/// A missing file is normal and reported as zero loaded variables.
///
/// # Errors
///
/// Returns an error only when the file exists but cannot be read.
pub fn load_env_file(path: impl AsRef<Path>) -> io::Result<usize> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(error) => return Err(error),
    };

    let mut loaded = 0;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            continue;
        }
        let value = unquote(value.trim());
        if std::env::var_os(key).is_none() {
            std::env::set_var(key, value);
            loaded += 1;
        }
    }
    Ok(loaded)
}

fn unquote(value: &str) -> &str {
    let quoted = (value.starts_with('"') && value.ends_with('"'))
        || (value.starts_with('\'') && value.ends_with('\''));
    if quoted && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_env(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn seeds_missing_variables() {
        let (_dir, path) = write_env("ENV_FILE_SEEDED=from-file\n");
        temp_env::with_var_unset("ENV_FILE_SEEDED", || {
            assert_eq!(load_env_file(&path).unwrap(), 1);
            assert_eq!(std::env::var("ENV_FILE_SEEDED").unwrap(), "from-file");
        });
    }

    #[test]
    fn never_overrides_existing_variables() {
        let (_dir, path) = write_env("ENV_FILE_PRESET=from-file\n");
        temp_env::with_var("ENV_FILE_PRESET", Some("from-env"), || {
            assert_eq!(load_env_file(&path).unwrap(), 0);
            assert_eq!(std::env::var("ENV_FILE_PRESET").unwrap(), "from-env");
        });
    }

    #[test]
    fn skips_comments_blanks_and_malformed_lines() {
        let (_dir, path) = write_env("# comment\n\nnot a pair\nENV_FILE_KEPT=yes\n");
        temp_env::with_var_unset("ENV_FILE_KEPT", || {
            assert_eq!(load_env_file(&path).unwrap(), 1);
            assert_eq!(std::env::var("ENV_FILE_KEPT").unwrap(), "yes");
        });
    }

    #[test]
    fn strips_quotes_and_export_prefix() {
        let (_dir, path) = write_env("export ENV_FILE_QUOTED=\"hello world\"\n");
        temp_env::with_var_unset("ENV_FILE_QUOTED", || {
            assert_eq!(load_env_file(&path).unwrap(), 1);
            assert_eq!(std::env::var("ENV_FILE_QUOTED").unwrap(), "hello world");
        });
    }

    #[test]
    fn missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_env_file(dir.path().join("absent.env")).unwrap(), 0);
    }
}
