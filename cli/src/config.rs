use std::path::PathBuf;

use anyhow::Context as _;
use paracl_e2e_core::{testing::FixtureLayout, testing::SubjectRunner, Config};
use serde::Deserialize;

use crate::{
    cmd::{Args, ColorChoice},
    util,
};

/// `PARACL_E2E_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnvConfig {
    pub binary: Option<PathBuf>,
    pub fixture_root: Option<PathBuf>,
    pub color: Option<ColorChoice>,
}

impl EnvConfig {
    pub const PREFIX: &str = "PARACL_E2E_";

    pub fn from_env() -> anyhow::Result<Self> {
        envy::prefixed(Self::PREFIX)
            .from_env::<Self>()
            .with_context(|| format!("Invalid {}* environment variable", Self::PREFIX))
    }
}

/// Everything one run needs, after layering args > env > config file > defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub layout: FixtureLayout,
    pub binary: PathBuf,
    pub color: ColorChoice,
    pub source_config_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let env = EnvConfig::from_env()?;
        Self::resolve(args, env, util::current_dir()?, util::harness_dir()?)
    }

    /// `cwd` is the fallback fixture root and anchors relative paths from args and env;
    /// `harness_dir` anchors the default binary path.
    pub fn resolve(
        args: &Args,
        env: EnvConfig,
        cwd: PathBuf,
        harness_dir: PathBuf,
    ) -> anyhow::Result<Self> {
        let fixture_root = match args.fixture_root.clone().or(env.fixture_root) {
            Some(root) => cwd.join(root),
            None => cwd.clone(),
        };

        let cfg = Config::from_file_in_ancestors_or_default(&fixture_root)?;

        // A bare `paraCL` names the file in `cwd`, never a `$PATH` lookup.
        let binary = match args.binary.clone().or(env.binary) {
            Some(binary) => cwd.join(binary),
            None => cfg
                .subject
                .binary
                .unwrap_or_else(|| SubjectRunner::default_binary_path(harness_dir)),
        };

        let color = args.color.or(env.color).unwrap_or_default();

        Ok(Self {
            layout: cfg.fixture.root(fixture_root),
            binary,
            color,
            source_config_file: cfg.source_config_file,
        })
    }
}

#[cfg(test)]
mod test {
    use std::{fs, path::Path};

    use clap::Parser as _;

    use super::*;

    fn args(argv: &[&str]) -> Args {
        let mut v = vec!["paracl-e2e-correct"];
        v.extend_from_slice(argv);
        Args::try_parse_from(v).unwrap()
    }

    #[test]
    fn defaults_use_cwd_and_harness_dir() {
        let cwd = tempfile::tempdir().unwrap();
        let s = Settings::resolve(
            &args(&["01.dat"]),
            EnvConfig::default(),
            cwd.path().to_owned(),
            PathBuf::from("/repo/tests/end-to-end-tests/correct"),
        )
        .unwrap();

        assert_eq!(s.layout.get_root(), cwd.path());
        assert_eq!(s.binary, Path::new("/repo/build/paraCL"));
        assert_eq!(s.color, ColorChoice::Auto);
        assert_eq!(s.source_config_file, None);
    }

    #[test]
    fn env_overrides_default_and_args_override_env() {
        let cwd = tempfile::tempdir().unwrap();
        let env = EnvConfig {
            binary: Some("/env/paraCL".into()),
            fixture_root: Some(cwd.path().to_owned()),
            color: Some(ColorChoice::Always),
        };

        let s = Settings::resolve(
            &args(&["01.dat"]),
            env.clone(),
            PathBuf::from("/nowhere"),
            PathBuf::from("/h"),
        )
        .unwrap();
        assert_eq!(s.binary, Path::new("/env/paraCL"));
        assert_eq!(s.layout.get_root(), cwd.path());
        assert_eq!(s.color, ColorChoice::Always);

        let s = Settings::resolve(
            &args(&["--binary", "/arg/paraCL", "--color", "never", "01.dat"]),
            env,
            PathBuf::from("/nowhere"),
            PathBuf::from("/h"),
        )
        .unwrap();
        assert_eq!(s.binary, Path::new("/arg/paraCL"));
        assert_eq!(s.color, ColorChoice::Never);
    }

    #[test]
    fn config_file_sits_between_env_and_defaults() {
        let root = tempfile::tempdir().unwrap();
        fs::write(
            root.path().join(Config::FILENAME),
            "[fixture]\nsource_dir = \"src\"\n[subject]\nbinary = \"bin/paraCL\"\n",
        )
        .unwrap();

        let s = Settings::resolve(
            &args(&["01.dat"]),
            EnvConfig::default(),
            root.path().to_owned(),
            PathBuf::from("/h"),
        )
        .unwrap();
        assert_eq!(s.binary, root.path().join("bin/paraCL"));
        assert_eq!(
            s.layout.resolve("01.dat").source_path(),
            root.path().join("src/01.dat")
        );
        assert_eq!(
            s.source_config_file,
            Some(root.path().join(Config::FILENAME))
        );

        let env = EnvConfig {
            binary: Some("/env/paraCL".into()),
            ..Default::default()
        };
        let s = Settings::resolve(&args(&["01.dat"]), env, root.path().to_owned(), "/h".into())
            .unwrap();
        assert_eq!(s.binary, Path::new("/env/paraCL"));
    }

    #[test]
    fn relative_paths_from_args_and_env_are_anchored_at_cwd() {
        let cwd = tempfile::tempdir().unwrap();
        fs::create_dir_all(cwd.path().join("fixtures")).unwrap();

        let s = Settings::resolve(
            &args(&["--binary", "paraCL", "--fixture-root", "fixtures", "01.dat"]),
            EnvConfig::default(),
            cwd.path().to_owned(),
            "/h".into(),
        )
        .unwrap();
        assert_eq!(s.binary, cwd.path().join("paraCL"));
        assert!(s.binary.is_absolute());
        assert_eq!(s.layout.get_root(), cwd.path().join("fixtures"));

        let env = EnvConfig {
            binary: Some("build/paraCL".into()),
            ..Default::default()
        };
        let s = Settings::resolve(&args(&["01.dat"]), env, cwd.path().to_owned(), "/h".into())
            .unwrap();
        assert_eq!(s.binary, cwd.path().join("build/paraCL"));
    }

    #[test]
    fn broken_config_file_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join(Config::FILENAME), "[fixture\n").unwrap();
        let res = Settings::resolve(
            &args(&["01.dat"]),
            EnvConfig::default(),
            root.path().to_owned(),
            "/h".into(),
        );
        assert!(res.is_err());
    }
}
