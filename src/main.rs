// src/main.rs

use scriptherd::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("scriptherd error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let level = logging::init_logging(args.log_level)?;
    run(args, level).await
}
