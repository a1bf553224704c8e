use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use formfill::page::is_restricted_url;
use formfill::{ButtonChoice, DataVariant, FillConfig, FormBrowser, ReferenceData, Session};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formfill", about = "Fill web forms with synthetic test data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a record and print it as JSON
    Generate {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Open a page and fill every field the label map knows about
    Fill {
        /// The page to fill
        url: String,

        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        browser: BrowserArgs,

        /// How long to wait for a dropdown option to render, in ms
        #[arg(long, default_value_t = 2000)]
        option_timeout_ms: u64,
    },
    /// Open a page and click every Yes or No button
    Click {
        choice: ButtonChoice,

        /// The page to act on
        url: String,

        #[command(flatten)]
        browser: BrowserArgs,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Label map and email template to use
    #[arg(long, value_enum, default_value_t = DataVariant::Default)]
    variant: DataVariant,

    /// Reference data JSON file (defaults to the bundled dataset)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Seed for reproducible records
    #[arg(long)]
    seed: Option<u64>,
}

impl DataArgs {
    fn reference(&self) -> formfill::Result<ReferenceData> {
        match &self.data {
            Some(path) => ReferenceData::from_path(path),
            None => ReferenceData::bundled(),
        }
    }

    fn fill_config(&self, option_timeout: Duration) -> FillConfig {
        let mut builder = FillConfig::builder()
            .variant(self.variant)
            .option_timeout(option_timeout);
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        builder.build()
    }
}

#[derive(Args)]
struct BrowserArgs {
    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Keep the browser open this many seconds after acting
    #[arg(long, default_value_t = 0)]
    hold: u64,

    /// Chrome executable to launch
    #[arg(long)]
    chrome: Option<String>,
}

impl BrowserArgs {
    async fn open(&self, url: &str) -> formfill::Result<(FormBrowser, formfill::Page)> {
        if is_restricted_url(url) {
            return Err(formfill::Error::RestrictedPage(url.to_string()));
        }
        let mut builder = FormBrowser::builder().headless(!self.headed);
        if let Some(path) = &self.chrome {
            builder = builder.chrome_path(path);
        }
        let browser = builder.build().await?;
        let page = browser.new_page(url).await?;
        Ok((browser, page))
    }

    async fn hold(&self) {
        if self.hold > 0 {
            tokio::time::sleep(Duration::from_secs(self.hold)).await;
        }
    }
}

async fn run(cli: Cli) -> formfill::Result<()> {
    match cli.command {
        Commands::Generate { data } => {
            let session = Session::new(data.reference()?, data.fill_config(Duration::from_secs(2)));
            println!("{}", serde_json::to_string_pretty(session.record())?);
        }
        Commands::Fill {
            url,
            data,
            browser,
            option_timeout_ms,
        } => {
            let config = data.fill_config(Duration::from_millis(option_timeout_ms));
            let mut session = Session::new(data.reference()?, config);
            let (_chrome, page) = browser.open(&url).await?;
            let report = session.fill_all(&page).await?;
            for (step, outcome) in &report.steps {
                println!("{:<40} {:?}", step.label, outcome);
            }
            println!(
                "{} of {} fields applied, {} not found, {} failed",
                report.applied(),
                report.steps.len(),
                report.not_found(),
                report.failed()
            );
            browser.hold().await;
        }
        Commands::Click {
            choice,
            url,
            browser,
        } => {
            let (_chrome, page) = browser.open(&url).await?;
            let clicked = page.click_buttons(choice).await?;
            println!("Clicked {clicked} \"{}\" button(s)", choice.as_str());
            browser.hold().await;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("⚠️ {e}");
            ExitCode::FAILURE
        }
    }
}
