use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use coursepick::cli::{self, Command};
use coursepick::codes::split_each;
use coursepick::script::popup_script;
use coursepick::{Config, Popup, SingleTab, StaticPage};

#[tokio::main]
async fn main() -> Result<()> {
    let args = match cli::parse_cli_args(env::args().collect()) {
        Ok(a) => a,
        Err(e) => e.exit(),
    };

    init_tracing(args.verbose);

    let mut config = Config::load(args.config.as_deref()).context("failed to load configuration")?;
    args.apply_overrides(&mut config);
    config.validate().context("invalid command-line override")?;

    match &args.command {
        Command::Select { page, codes, json } => run_select(&config, page, codes, *json).await,
        Command::Script { codes } => {
            let mut popup = Popup::new(&config);
            popup.fill(codes)?;
            let script = popup_script(&popup)?;
            println!("{}", script);
            Ok(())
        }
        Command::Split { text } => {
            for code in split_each(text) {
                println!("{}", code);
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_select(
    config: &Config,
    page_path: &std::path::Path,
    codes: &[String],
    json: bool,
) -> Result<()> {
    let page = StaticPage::from_file(page_path, &config.selector)
        .with_context(|| format!("failed to load page {}", page_path.display()))?;
    let mut popup = Popup::new(config);
    popup.fill(codes)?;
    let mut host = SingleTab::new(page);

    let pb = if atty::is(atty::Stream::Stderr) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.set_message(format!(
            "Selecting {} course code(s)...",
            popup.fields().collect_codes().len()
        ));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let outcome = popup.run(&mut host).await;
    if let Some(p) = &pb {
        p.finish_and_clear();
    }
    outcome?;

    let Some(page) = host.into_page() else {
        return Ok(());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(page.sections())?);
    } else {
        for section in page.checked_sections() {
            println!("[x] {}", section);
        }
    }
    Ok(())
}
