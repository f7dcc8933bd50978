use std::path::PathBuf;

use clap::{error::ErrorKind, Parser as _};
use paracl_e2e_core::{
    action::{self, TestPipeline},
    testing::{Verdict, VerdictPolicy},
};
use serde::Deserialize;

use crate::config::Settings;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Test file under the `data` dir, e.g. `01.dat`
    #[arg()] // positional argument
    pub test_file: String,

    /// Dir holding `data`, `input` and `answers` [default: current dir]
    #[arg(long)]
    pub fixture_root: Option<PathBuf>,

    /// The paraCL binary under test [default: ../../../build/paraCL from the harness]
    #[arg(long)]
    pub binary: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn apply(self) {
        use ColorChoice::*;
        match self {
            Auto => colored::control::unset_override(),
            Always => colored::control::set_override(true),
            Never => colored::control::set_override(false),
        }
    }
}

impl Args {
    /// Like `parse()`, but a bad command line prints the usage to stdout and exits with 1.
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(args) => args,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => {
                println!("{}", e.render());
                std::process::exit(Verdict::EXIT_FAILED);
            }
        }
    }
}

pub async fn exec<P: VerdictPolicy>(args: &Args, policy: P) -> i32 {
    let settings = match Settings::from_args(args) {
        Ok(s) => s,
        Err(e) => {
            println!("Error: {:#}", e);
            return Verdict::EXIT_FAILED;
        }
    };
    settings.color.apply();

    let pipeline = TestPipeline::new(settings.layout, settings.binary, policy);
    log::info!(
        "Policy: {}, subject: {:?} ({:?} mode)",
        pipeline.policy().name(),
        crate::util::replace_homedir_to_tilde(pipeline.runner().get_binary()),
        pipeline.runner().get_mode()
    );

    action::do_test(&pipeline, &args.test_file).await
}
