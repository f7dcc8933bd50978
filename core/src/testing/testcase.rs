use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Where the fixtures of one test live, relative to a fixture root.
///
/// ```text
/// <root>/data/01.dat            source fed to the subject as argv[1]
/// <root>/input/01_input.dat     stdin (optional)
/// <root>/answers/01_answ.dat    expected stdout (exact-match only)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureLayout {
    #[serde(skip)]
    root: PathBuf,
    source_dir: PathBuf,
    input_dir: PathBuf,
    answer_dir: PathBuf,
    input_suffix: String,
    answer_suffix: String,
}

impl Default for FixtureLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            source_dir: "data".into(),
            input_dir: "input".into(),
            answer_dir: "answers".into(),
            input_suffix: "_input.dat".to_owned(),
            answer_suffix: "_answ.dat".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    test_id: String,
    source_path: PathBuf,
    input_path: PathBuf,
    expected_output_path: PathBuf,
}

impl FixtureLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::default().root(root)
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Resolve the fixture triad addressed by `test_file` (a filename under the source dir).
    pub fn resolve(&self, test_file: &str) -> TestCase {
        let test_id = TestCase::test_id_of(test_file);
        let input_name = format!("{}{}", test_id, self.input_suffix);
        let answer_name = format!("{}{}", test_id, self.answer_suffix);

        let t = TestCase {
            source_path: self.root.join(&self.source_dir).join(test_file),
            input_path: self.root.join(&self.input_dir).join(input_name),
            expected_output_path: self.root.join(&self.answer_dir).join(answer_name),
            test_id: test_id.to_owned(),
        };
        log::debug!("Resolved {:?}", t);
        t
    }
}

impl TestCase {
    /// Text before the first `.`; the whole name when there is none.
    pub fn test_id_of(test_file: &str) -> &str {
        test_file.split('.').next().unwrap_or(test_file)
    }

    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn expected_output_path(&self) -> &Path {
        &self.expected_output_path
    }

    /// Input to pipe into the subject. A missing input file means empty stdin.
    pub fn read_input(&self) -> fsutil::Result<Vec<u8>> {
        fsutil::read_or_empty(&self.input_path)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolves_fixture_triad() {
        let t = FixtureLayout::new("/work/tests/correct").resolve("01.dat");
        assert_eq!(t.test_id(), "01");
        assert_eq!(t.source_path(), Path::new("/work/tests/correct/data/01.dat"));
        assert_eq!(t.input_path(), Path::new("/work/tests/correct/input/01_input.dat"));
        assert_eq!(
            t.expected_output_path(),
            Path::new("/work/tests/correct/answers/01_answ.dat")
        );
    }

    #[test]
    fn test_id_is_text_before_first_dot() {
        assert_eq!(TestCase::test_id_of("01.dat"), "01");
        assert_eq!(TestCase::test_id_of("while.nested.pcl"), "while");
        assert_eq!(TestCase::test_id_of("noext"), "noext");
        assert_eq!(TestCase::test_id_of(".hidden"), "");
    }

    #[test]
    fn source_keeps_the_full_filename() {
        let t = FixtureLayout::new("root").resolve("while.nested.pcl");
        assert_eq!(t.source_path(), Path::new("root/data/while.nested.pcl"));
        assert_eq!(t.input_path(), Path::new("root/input/while_input.dat"));
    }

    #[test]
    fn missing_input_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let t = FixtureLayout::new(dir.path()).resolve("07.dat");
        assert!(t.read_input().unwrap().is_empty());

        std::fs::create_dir_all(dir.path().join("input")).unwrap();
        std::fs::write(t.input_path(), "5\n").unwrap();
        assert_eq!(t.read_input().unwrap(), b"5\n");
    }

    #[test]
    fn custom_layout_from_toml() {
        let layout: FixtureLayout = toml::from_str(
            r#"
            source_dir = "src"
            answer_suffix = ".out"
            "#,
        )
        .unwrap();
        let t = layout.root("r").resolve("a.pcl");
        assert_eq!(t.source_path(), Path::new("r/src/a.pcl"));
        assert_eq!(t.input_path(), Path::new("r/input/a_input.dat"));
        assert_eq!(t.expected_output_path(), Path::new("r/answers/a.out"));
    }
}
