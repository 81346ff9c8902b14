//! drift - branch divergence and pull-request correlation CLI

mod cli;

use anstream::eprintln;
use clap::Parser;
use cli::style::Stylize;
use cli::{Cli, Commands, run_changes, run_compare, run_prs};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let token = args.token.as_deref();
    let host = args.host.as_deref();

    let result = match args.command {
        Commands::Changes {
            repo,
            branch,
            days,
            limit,
        } => run_changes(token, host, &repo, &branch, days, limit).await,
        Commands::Compare {
            repo,
            range,
            days,
            limit,
        } => run_compare(token, host, &repo, &range, days, limit).await,
        Commands::Prs {
            repo,
            branch,
            state,
            days,
            ticket,
            limit,
            scan_limit,
        } => {
            let options = cli::PrsOptions {
                state,
                days,
                ticket,
                limit,
                scan_limit,
            };
            run_prs(token, host, &repo, &branch, options).await
        }
        Commands::Serve { port } => branch_drift::web::serve(port).await,
    };

    if let Err(err) = result {
        eprintln!("{}", format!("Error: {err}").error());
        std::process::exit(1);
    }
}
