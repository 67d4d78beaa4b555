// repo-list: convert repo_stats.csv in the working directory into a block
// of Maven <repository> entries in newsettings-aar-jar.xml.

use std::process;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use log::error;

use pomtools::cli::{self, CommonArgs};
use pomtools::repolist;

#[derive(Parser, Debug)]
#[command(name = "repo-list")]
#[command(about = "Generate Maven <repository> entries from repo_stats.csv")]
#[command(version)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() {
    // Usage errors exit with status 1 (clap's default is 2); --help and
    // --version are not errors and keep status 0
    let args = Args::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
            _ => process::exit(1),
        }
    });

    if let Err(e) = run(&args) {
        error!("repo-list failed: {:#}", e);
        eprintln!("ERROR: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = cli::setup(&args.common)?;
    let paths = config.get_repolist_paths();
    repolist::generate(&paths.input, &paths.output)?;
    Ok(())
}
