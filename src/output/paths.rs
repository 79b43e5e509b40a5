use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension of the plain-text onset list
pub const TEXT_EXTENSION: &str = ".ana";

/// Extension of the JSON onset list
pub const JSON_EXTENSION: &str = ".json";

/// Destination paths for one analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Plain-text `.ana` file
    pub text: PathBuf,

    /// JSON file
    pub json: PathBuf,
}

impl OutputPaths {
    /// Resolve the output paths for `input`
    ///
    /// An explicit `prefix` is used verbatim. Without one, the prefix is the
    /// input path minus its final extension, so the outputs land next to the input.
    pub fn resolve<P: AsRef<Path>>(input: P, prefix: Option<&Path>) -> Self {
        match prefix {
            Some(prefix) => Self::from_prefix(prefix),
            None => Self::from_prefix(Self::derive_prefix(input)),
        }
    }

    /// Build both paths by appending the extensions to `prefix`
    ///
    /// The extensions are appended, never substituted: `out/result.v1`
    /// becomes `out/result.v1.ana`.
    pub fn from_prefix<P: AsRef<Path>>(prefix: P) -> Self {
        let prefix = prefix.as_ref();
        Self {
            text: append(prefix, TEXT_EXTENSION),
            json: append(prefix, JSON_EXTENSION),
        }
    }

    /// Strip the final extension from the input path, keeping its directory
    pub fn derive_prefix<P: AsRef<Path>>(input: P) -> PathBuf {
        input.as_ref().with_extension("")
    }
}

fn append(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(prefix.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_derived_from_input() {
        let paths = OutputPaths::resolve("track.wav", None);
        assert_eq!(paths.text, PathBuf::from("track.ana"));
        assert_eq!(paths.json, PathBuf::from("track.json"));
    }

    #[test]
    fn test_derived_prefix_keeps_directory() {
        let paths = OutputPaths::resolve("recordings/take 3/piano.flac", None);
        assert_eq!(paths.text, PathBuf::from("recordings/take 3/piano.ana"));
        assert_eq!(paths.json, PathBuf::from("recordings/take 3/piano.json"));
    }

    #[test]
    fn test_only_final_extension_is_stripped() {
        assert_eq!(OutputPaths::derive_prefix("mix.final.wav"), PathBuf::from("mix.final"));
        assert_eq!(OutputPaths::derive_prefix("no_extension"), PathBuf::from("no_extension"));
        assert_eq!(OutputPaths::derive_prefix("dir.d/take"), PathBuf::from("dir.d/take"));
    }

    #[test]
    fn test_explicit_prefix_used_verbatim() {
        let paths = OutputPaths::resolve("track.wav", Some(Path::new("out/result")));
        assert_eq!(paths.text, PathBuf::from("out/result.ana"));
        assert_eq!(paths.json, PathBuf::from("out/result.json"));
    }

    #[test]
    fn test_explicit_prefix_extension_is_kept() {
        let paths = OutputPaths::resolve("track.wav", Some(Path::new("out/result.v1")));
        assert_eq!(paths.text, PathBuf::from("out/result.v1.ana"));
        assert_eq!(paths.json, PathBuf::from("out/result.v1.json"));
    }
}
