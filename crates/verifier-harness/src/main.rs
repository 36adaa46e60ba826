use clap::Parser;
use tracing_subscriber::EnvFilter;

use verifier_harness::commands::{
    self,
    cli::{Cli, Commands},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Keep alloy transport chatter out of the default output.
    let mut filter = EnvFilter::new("info,alloy_transport_http=warn,hyper=warn");
    if let Ok(env_filter) = std::env::var("RUST_LOG") {
        if let Ok(parsed) = env_filter.parse() {
            filter = filter.add_directive(parsed);
        }
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Init {} => commands::command::init()?,
        Commands::Run { case, local } => commands::command::run(case, local).await?,
        Commands::Calldata {
            scheme,
            proof,
            public,
            snarkjs,
        } => commands::command::calldata(scheme, proof, public, snarkjs).await?,
        Commands::Version {} => commands::command::version(),
    }

    Ok(())
}
