//! `fx`: terminal front end for the currency converter.
//!
//! Loads the currency list, fills the form from flags, and either prints one
//! conversion or drops into a line-oriented session with `--interactive`.

mod repl;
mod transport;
mod view;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use fx_core::{ConversionController, Display, RatesClient, DEFAULT_BASE_URL};
use tracing_subscriber::EnvFilter;

use crate::transport::UreqTransport;
use crate::view::{display_text, options_text};

#[derive(Parser, Debug)]
#[command(name = "fx", about = "Convert between currencies using a Frankfurter-compatible rate service")]
struct Args {
    /// Rate service base URL.
    #[arg(long, env = "FX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Source currency code (defaults to USD when available).
    #[arg(long)]
    from: Option<String>,

    /// Target currency code (defaults to EUR when available).
    #[arg(long)]
    to: Option<String>,

    /// Amount in the source currency.
    #[arg(long)]
    amount: Option<String>,

    /// Swap source and target before converting.
    #[arg(long)]
    swap: bool,

    /// Print the available currencies and exit.
    #[arg(long)]
    list: bool,

    /// Read commands from stdin after applying the flags.
    #[arg(long, short)]
    interactive: bool,

    /// Overall request timeout in seconds. No limit when omitted.
    #[arg(long)]
    timeout: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let args = Args::parse();

    let transport = UreqTransport::new(args.timeout.map(Duration::from_secs));
    let mut controller = ConversionController::new(RatesClient::new(&args.base_url));

    controller.load_catalog(&transport);
    if let Display::Error(message) = controller.display() {
        anyhow::bail!("{message}");
    }

    if args.list {
        println!("{}", options_text(&controller.from_options()));
        return Ok(());
    }

    if let Some(from) = &args.from {
        controller
            .select_from(&from.to_ascii_uppercase())
            .context("invalid --from")?;
    }
    if let Some(to) = &args.to {
        controller
            .select_to(&to.to_ascii_uppercase())
            .context("invalid --to")?;
    }
    if let Some(amount) = &args.amount {
        controller.set_amount(amount.as_str());
    }

    if args.interactive {
        if args.swap {
            controller.swap(&transport);
        }
        let stdin = io::stdin();
        repl::run(&mut controller, &transport, stdin.lock(), io::stdout()).context("interactive session failed")?;
        return Ok(());
    }

    if args.swap {
        // Swap converts on its own when the form is complete.
        controller.swap(&transport);
    } else {
        controller.submit(&transport);
    }

    match controller.display() {
        Display::Result(_) => {
            println!("{}", display_text(controller.display()));
            Ok(())
        }
        Display::Error(message) => anyhow::bail!("{message}"),
        Display::Empty | Display::Loading(_) => {
            anyhow::bail!("nothing to convert: pass --amount with a positive number")
        }
    }
}
