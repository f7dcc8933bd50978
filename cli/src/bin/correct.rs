use paracl_e2e_cli::{cmd, util};
use paracl_e2e_core::testing::ExactMatch;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    util::init_logger();
    let args = cmd::Args::parse_or_exit();
    let code = cmd::exec(&args, ExactMatch).await;
    std::process::exit(code);
}
