use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use tfmod_installer::app::install_use_case::InstallUseCase;
use tfmod_installer::config::InstallConfig;
use tfmod_installer::infra::git_fetcher::GitFetcher;
use tfmod_installer::infra::hcl2json_parser::Hcl2JsonParser;
use tfmod_installer::logging;

#[derive(Parser)]
#[command(name = "tfmod-install")]
#[command(about = "Download the module tree of a Terraform root module and write modules.json")]
struct Cli {
    /// Root module directory
    #[arg(default_value = ".")]
    root: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = InstallConfig::load().context("Failed to load configuration")?;
    let _log_guard = logging::init_logging(config.log_dir.as_deref());
    info!(?config, "Starting module install");

    let parser = Arc::new(Hcl2JsonParser::new(&config.hcl2json_bin));
    let fetcher = Arc::new(GitFetcher::new(&config.git_bin));
    let use_case = InstallUseCase::new(parser, fetcher, &config);

    let summary = use_case
        .run(&cli.root)
        .await
        .with_context(|| format!("Module install failed for {}", cli.root.display()))?;

    println!("\n📦 Module install results:");
    println!("   Modules recorded: {}", summary.modules.len());
    println!("   Cloned: {}", summary.stats.cloned);
    println!("   Already present: {}", summary.stats.already_present);
    println!("   Registry modules skipped: {}", summary.stats.skipped_registry);
    if summary.stats.fetch_failures > 0 {
        println!("   ⚠️  Failed clones: {}", summary.stats.fetch_failures);
    }
    if summary.stats.duplicates > 0 {
        println!("   Repeated declarations ignored: {}", summary.stats.duplicates);
    }
    println!(
        "All modules downloaded and written to {}.",
        summary.manifest_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_the_only_argument() {
        let cli = Cli::try_parse_from(["tfmod-install"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("."));

        let cli = Cli::try_parse_from(["tfmod-install", "infra/prod"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("infra/prod"));

        assert!(Cli::try_parse_from(["tfmod-install", "--version"]).is_err());
        assert!(Cli::try_parse_from(["tfmod-install", "a", "b"]).is_err());
    }
}
