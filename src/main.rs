use aoa_gen::cli::Args;
use aoa_gen::config::load_dotenv;
use aoa_gen::launch;
use aoa_gen::logging::init_logging;
use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    load_dotenv();

    let config = args.into_config()?;
    launch(&config).await?;

    Ok(())
}
