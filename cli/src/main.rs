//! steamgr - provision dedicated game servers with steamcmd and systemd

use clap::Parser;

use steamgr_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = steamgr_cli::logging::init(cli.verbose, cli.log_format) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
