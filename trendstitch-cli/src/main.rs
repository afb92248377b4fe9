//! `trendstitch` job trigger: resolve a request, stitch it through one vendor and
//! persist the annotated rows as CSV.

mod output;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::info;
use trendstitch::{Frequency, Stitcher, TermSet, TrendReport, TrendRequest, TrendsConnector};
use trendstitch_http::{HttpConfig, HttpConnector, ReportVendor, TimelineVendor};
use trendstitch_mock::MockConnector;
use url::Url;

use crate::settings::FileConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VendorKind {
    /// Synchronous JSON timeline API.
    Timeline,
    /// Asynchronous report API with status polling.
    Report,
    /// Offline deterministic emulation.
    Mock,
}

#[derive(Debug, Parser)]
#[command(name = "trendstitch")]
#[command(about = "Fetch long-range search interest and stitch it into one consistently scaled series", long_about = None)]
struct Cli {
    /// Client identifier recorded on every row and in the file name
    #[arg(long, env = "TRENDSTITCH_CLIENT")]
    client: String,

    /// Comma-separated search terms
    #[arg(long, env = "TRENDSTITCH_TERMS", value_delimiter = ',', required = true)]
    terms: Vec<String>,

    /// Output frequency (daily | weekly | monthly)
    #[arg(long, env = "TRENDSTITCH_FREQUENCY", default_value = "weekly")]
    frequency: Frequency,

    /// Start date, YYYY-MM-DD. Defaults depend on the frequency.
    #[arg(long, env = "TRENDSTITCH_START")]
    start: Option<String>,

    /// End date, YYYY-MM-DD. Defaults to the last complete period.
    #[arg(long, env = "TRENDSTITCH_END")]
    end: Option<String>,

    /// Region code queried upstream
    #[arg(long, env = "TRENDSTITCH_REGION", default_value = "US")]
    region: String,

    /// Directory the CSV file is written to
    #[arg(long, env = "TRENDSTITCH_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// JSON file with `http` and `stitch` sections
    #[arg(long, env = "TRENDSTITCH_CONFIG")]
    config: Option<PathBuf>,

    /// Upstream vendor protocol
    #[arg(long, env = "TRENDSTITCH_VENDOR", value_enum, default_value_t = VendorKind::Timeline)]
    vendor: VendorKind,

    /// Vendor base URL; overrides the config file
    #[arg(long, env = "TRENDSTITCH_BASE_URL")]
    base_url: Option<Url>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "TRENDSTITCH_LOG", default_value = "info")]
    log_level: String,
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn http_config(cli: &Cli, file: Option<HttpConfig>) -> Result<HttpConfig> {
    match (file, cli.base_url.clone()) {
        (Some(cfg), Some(base_url)) => Ok(HttpConfig { base_url, ..cfg }),
        (Some(cfg), None) => Ok(cfg),
        (None, Some(base_url)) => Ok(HttpConfig::new(base_url)),
        (None, None) => bail!("--base-url or an `http` config section is required for this vendor"),
    }
}

fn connector(cli: &Cli, file: Option<HttpConfig>) -> Result<Arc<dyn TrendsConnector>> {
    Ok(match cli.vendor {
        VendorKind::Mock => Arc::new(MockConnector::new()),
        VendorKind::Timeline => Arc::new(
            HttpConnector::new(TimelineVendor::new(), http_config(cli, file)?)
                .context("building timeline connector")?,
        ),
        VendorKind::Report => Arc::new(
            HttpConnector::new(ReportVendor::new(), http_config(cli, file)?)
                .context("building report connector")?,
        ),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let file = FileConfig::load(cli.config.as_deref())?;
    let terms = TermSet::new(&cli.terms).context("invalid --terms")?;
    let mut req = TrendRequest::new(cli.client.clone(), terms, cli.frequency).region(cli.region.clone());
    if let Some(start) = &cli.start {
        req = req.start(start.clone());
    }
    if let Some(end) = &cli.end {
        req = req.end(end.clone());
    }

    let stitcher = Stitcher::builder()
        .with_connector(connector(&cli, file.http)?)
        .config(file.stitch)
        .build()?;

    let outcome = stitcher.stitch(&req).await.context("stitching run failed")?;
    info!(
        path = ?outcome.path,
        segments = outcome.segments,
        rows = outcome.series.len(),
        "run complete"
    );
    let report = TrendReport::from_outcome(&outcome, &req, chrono::Utc::now())?;
    let written = output::write_csv(&report, &cli.out_dir)?;
    info!(file = %written.display(), rows = report.rows().len(), "report written");
    println!("{}", written.display());
    Ok(())
}
