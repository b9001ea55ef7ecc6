//! Public suffix list CLI
//!
//! Builds a selfie snapshot from PSL text and answers lookups against it.

use std::fs;

use clap::{Parser, Subcommand};

use psl_core::List;

#[derive(Parser)]
#[command(name = "psl-cli")]
#[command(about = "Build and query public suffix snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse PSL text and write a selfie snapshot
    Build {
        /// PSL text file (one rule per line)
        #[arg(short, long)]
        input: String,

        /// Output selfie file
        #[arg(short, long, default_value = "psl.selfie")]
        output: String,
    },

    /// Look up a hostname against a PSL text or selfie file
    Query {
        /// PSL text or selfie file
        #[arg(short, long)]
        list: String,

        /// Use the file as a selfie rather than raw PSL text
        #[arg(long)]
        selfie: bool,

        /// Hostname to look up
        hostname: String,
    },

    /// Report basic facts about a PSL text or selfie file
    Info {
        #[arg(short, long)]
        list: String,

        #[arg(long)]
        selfie: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { input, output } => cmd_build(&input, &output),
        Commands::Query {
            list,
            selfie,
            hostname,
        } => cmd_query(&list, selfie, &hostname),
        Commands::Info { list, selfie } => cmd_info(&list, selfie),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_list(path: &str, selfie: bool) -> Result<List, String> {
    if selfie {
        let bytes = fs::read(path).map_err(|e| format!("reading {path}: {e}"))?;
        List::from_selfie(&bytes).map_err(|e| format!("loading selfie {path}: {e}"))
    } else {
        let text = fs::read_to_string(path).map_err(|e| format!("reading {path}: {e}"))?;
        Ok(List::parse(&text))
    }
}

fn cmd_build(input: &str, output: &str) -> Result<(), String> {
    let text = fs::read_to_string(input).map_err(|e| format!("reading {input}: {e}"))?;
    let list = List::parse(&text);
    let selfie = list.to_selfie();
    fs::write(output, &selfie).map_err(|e| format!("writing {output}: {e}"))?;
    log::info!("wrote {} bytes to {output}", selfie.len());
    Ok(())
}

fn cmd_query(list_path: &str, selfie: bool, hostname: &str) -> Result<(), String> {
    let mut list = load_list(list_path, selfie)?;
    println!("public_suffix:       {}", list.public_suffix(hostname));
    println!("registrable_domain:  {}", list.registrable_domain(hostname));
    println!("is_public_suffix:    {}", list.is_public_suffix(hostname));
    Ok(())
}

fn cmd_info(list_path: &str, selfie: bool) -> Result<(), String> {
    let list = load_list(list_path, selfie)?;
    let bytes = list.to_selfie();
    println!("selfie size: {} bytes", bytes.len());
    Ok(())
}
