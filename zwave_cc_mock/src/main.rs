use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use zwave_cc_mock::{run_session, MockConfig};

/// Run a scripted Protection session against a simulated node and print the
/// resulting values as JSON.
#[derive(Parser, Debug)]
#[command(name = "zwave_cc_mock", version, about)]
struct Args {
    /// TOML scenario file; command line flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    node: Option<u8>,

    #[arg(long)]
    instance: Option<u8>,

    /// State code the simulated device starts in
    #[arg(long)]
    initial_state: Option<u8>,

    /// State to set after the first report (label or code)
    #[arg(long)]
    set: Option<String>,

    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    zwave_cc::init_defaults()?;

    let args = Args::parse();
    let mut cfg = match args.config.as_deref() {
        Some(p) => MockConfig::from_path(p)?,
        None => MockConfig::default(),
    };
    if let Some(n) = args.node {
        cfg.node_id = n;
    }
    if let Some(i) = args.instance {
        cfg.instance = i;
    }
    if let Some(s) = args.initial_state {
        cfg.initial_state = s;
    }
    if args.set.is_some() {
        cfg.set = args.set;
    }
    if let Some(t) = args.timeout_ms {
        cfg.reply_timeout_ms = t;
    }

    tracing::info!(?cfg, "starting mock session");
    let values = run_session(&cfg).await?;
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}
