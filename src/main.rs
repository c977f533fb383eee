use clap::Parser;
use strokelab_lib::{run, CliArgs};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    if let Err(err) = run(args).await {
        eprintln!("strokelab: {err:#}");
        std::process::exit(1);
    }
}
