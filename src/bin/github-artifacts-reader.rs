use action_reporters::action::{self, artifacts};
use action_reporters::SystemEnvironment;

#[tokio::main]
async fn main() {
    action::init_tracing();
    let code = artifacts::run_with_env(&SystemEnvironment).await;
    std::process::exit(code);
}
