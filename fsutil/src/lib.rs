use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),
    }

    impl Error {
        pub fn path(&self) -> &std::path::Path {
            match self {
                Error::SingleIO(_, path, _) => path,
            }
        }
    }
}
pub use error::{Error, Result};

#[must_use]
pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

/// Reads raw bytes; a file that does not exist reads as empty.
/// Any other failure (permission, a directory in place of the file, ...) is still an error.
#[must_use]
pub fn read_or_empty(filepath: impl AsRef<Path>) -> Result<Vec<u8>> {
    let filepath = filepath.as_ref();
    match fs::read(filepath) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("{:?} does not exist, treated as empty", filepath);
            Ok(Vec::new())
        }
        Err(e) => Err(Error::SingleIO("Cannot read file", filepath.to_owned(), e)),
    }
}

/// Returns true if `path` is a regular file (symlinks followed) that someone may execute.
pub fn is_executable_file(path: impl AsRef<Path>) -> bool {
    let Ok(meta) = fs::metadata(path) else {
        return false
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Normalize the path
/// ```
/// use fsutil::normalize_path;
/// use std::path::Path;
///
/// assert_eq!(normalize_path("./hoge/.config/././foo"), Path::new("hoge/.config/foo"));
/// assert_eq!(normalize_path("hoge/.config/../../bar/."), Path::new("bar"));
/// assert_eq!(normalize_path("../foo/../hello"), Path::new("../hello"));
/// assert_eq!(normalize_path("/"), Path::new("/"));
/// assert_eq!(normalize_path("/foo/"), Path::new("/foo"));
/// assert_eq!(normalize_path("./foo/"), Path::new("foo"));
/// assert_eq!(normalize_path("."), Path::new("."));
/// assert_eq!(normalize_path("./././."), Path::new("."));
/// assert_eq!(normalize_path("/a/b/c/../../../build/x"), Path::new("/build/x"));
/// ```
pub fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    use ::std::path::Component;
    let components = path.as_ref().components();
    let mut stack = Vec::with_capacity(components.size_hint().1.unwrap_or(4));
    for c in components {
        match c {
            Component::CurDir => (),
            Component::ParentDir
                if matches!(stack.last(), Some(Component::Normal(_))) =>
            {
                stack.pop();
            }
            Component::ParentDir if matches!(stack.last(), Some(Component::RootDir)) => (),
            _ => {
                stack.push(c);
            }
        }
    }
    if stack.is_empty() {
        stack.push(Component::CurDir);
    }
    stack.iter().collect()
}

/// Find `filename` in `start_dir` and its ancestors, nearest first.
pub fn find_file_in_ancestors(start_dir: impl AsRef<Path>, filename: &str) -> Option<PathBuf> {
    start_dir
        .as_ref()
        .ancestors()
        .map(|dir| dir.join(filename))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = read_or_empty(dir.path().join("nothing.dat")).unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn existing_file_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("01_input.dat");
        fs::write(&path, "3\n 4 \n").unwrap();
        assert_eq!(read_or_empty(&path).unwrap(), b"3\n 4 \n");
        assert_eq!(read_to_string(&path).unwrap(), "3\n 4 \n");
    }

    #[test]
    fn non_utf8_bytes_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("02_input.dat");
        fs::write(&path, [0xff, 0xfe, b'\n']).unwrap();
        assert_eq!(read_or_empty(&path).unwrap(), [0xff, 0xfe, b'\n']);
        assert!(read_to_string(&path).is_err());
    }

    #[test]
    fn directory_in_place_of_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_or_empty(dir.path()).unwrap_err();
        assert_eq!(err.path(), dir.path());
    }

    #[test]
    fn missing_file_is_an_error_for_plain_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("01_answ.dat");
        let err = read_to_string(&path).unwrap_err();
        assert!(matches!(err, Error::SingleIO(_, ref p, _) if p == &path));
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_is_checked() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paraCL");
        fs::write(&path, "#!/bin/sh\n").unwrap();

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable_file(&path));

        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable_file(&path));

        assert!(!is_executable_file(dir.path()));
        assert!(!is_executable_file(dir.path().join("missing")));
    }

    #[test]
    fn config_is_found_in_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("tests/end-to-end-tests/correct");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("tests/paracl-e2e.toml"), "").unwrap();

        let found = find_file_in_ancestors(&nested, "paracl-e2e.toml").unwrap();
        assert_eq!(found, dir.path().join("tests/paracl-e2e.toml"));
        assert_eq!(find_file_in_ancestors(&nested, "no-such.toml"), None);
    }
}
