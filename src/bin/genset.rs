//! Test-set generation CLI: build category files from Wikidata.

use clap::Parser;
use embeval::wikidata::{generate_test_set, WikidataClient};
use embeval::Config;
use std::path::PathBuf;

/// Generate labeled category test sets from Wikidata `instance of` queries.
#[derive(Parser, Debug)]
#[command(name = "genset")]
struct Args {
    /// Wikidata items to build categories from (e.g. Q4022 for river).
    #[arg(long, required = true, num_args = 1..)]
    items: Vec<String>,

    /// Wikimedia language codes to generate a file for.
    #[arg(long, default_value = "en", num_args = 1..)]
    languages: Vec<String>,

    /// Output path stem; files are written as `<stem>_<lang>.txt`.
    #[arg(long, default_value = "testset")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();
    let config = Config::load()?;
    let client = WikidataClient::new(&config.wikidata);

    let written = generate_test_set(&client, &args.items, &args.languages, &args.output).await?;

    println!("Wrote {} test set file(s):", written.len());
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}
