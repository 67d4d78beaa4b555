// inject-plugin: append the fixed android-maven-plugin declaration to a
// Maven pom.xml, rewriting the file in place.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use log::error;

use pomtools::cli::{self, CommonArgs};
use pomtools::inject;

#[derive(Parser, Debug)]
#[command(name = "inject-plugin")]
#[command(about = "Append the android-maven-plugin declaration to a Maven pom.xml")]
#[command(version)]
struct Args {
    /// Path to the pom.xml to modify
    pom: PathBuf,

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
        error!("inject-plugin failed: {:#}", e);
        eprintln!("ERROR: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    cli::setup(&args.common)?;
    inject::inject_plugin(&args.pom)?;
    Ok(())
}
