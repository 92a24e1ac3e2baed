use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    use kenmon::util::cli::*;

    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let opts = Options::parse();
    match run_cli_action(opts, &mut std::io::stdout()) {
        Ok(Outcome::Done) => {}
        Ok(Outcome::Unsafe) => std::process::exit(1),
        Err(e) => {
            tracing::error!(error = %e, "kenmon-util failed");
            std::process::exit(2);
        }
    }
}
