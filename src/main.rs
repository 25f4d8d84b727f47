//! menuqr command-line entrypoint

use anyhow::Context;
use clap::Parser;
use menuqr::{Error, ErrorCorrection, MenuQrConfig, Result, logging};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "menuqr",
    version,
    about = "Generate the QR code linking to the mhanna menu"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to menuqr.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Text or URL to encode
    #[arg(long, value_name = "URL")]
    payload: Option<String>,

    /// Destination PNG file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Symbol version (minimum unless --no-fit is given)
    #[arg(long, value_name = "1-40")]
    symbol_version: Option<i16>,

    /// Fail instead of growing the symbol version when the payload does not fit
    #[arg(long)]
    no_fit: bool,

    /// Error correction level (L, M, Q or H)
    #[arg(long, value_name = "LEVEL")]
    ec_level: Option<String>,

    /// Pixels per module
    #[arg(long, value_name = "PX")]
    box_size: Option<u32>,

    /// Quiet zone width in modules
    #[arg(long, value_name = "MODULES")]
    border: Option<u32>,

    /// Colour of dark modules (name or #rrggbb)
    #[arg(long, value_name = "COLOR")]
    fill: Option<String>,

    /// Background colour (name or #rrggbb)
    #[arg(long, value_name = "COLOR")]
    background: Option<String>,

    /// Decode the written image and fail unless it matches the payload
    #[arg(long)]
    verify: bool,

    /// Print the symbol to the terminal as well
    #[arg(long)]
    preview: bool,

    /// Output the report as formatted JSON instead of human-readable text
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply(&self, config: &mut MenuQrConfig) -> Result<()> {
        if let Some(ref payload) = self.payload {
            config.qr.payload = payload.clone();
        }
        if let Some(ref output) = self.output {
            config.output.path = output.clone();
        }
        if let Some(version) = self.symbol_version {
            config.qr.version = version;
        }
        if self.no_fit {
            config.qr.fit = false;
        }
        if let Some(ref level) = self.ec_level {
            config.qr.error_correction = level.parse::<ErrorCorrection>().map_err(Error::Config)?;
        }
        if let Some(box_size) = self.box_size {
            config.qr.box_size = box_size;
        }
        if let Some(border) = self.border {
            config.qr.border = border;
        }
        if let Some(ref fill) = self.fill {
            config.qr.fill_color = fill.clone();
        }
        if let Some(ref background) = self.background {
            config.qr.background_color = background.clone();
        }
        if self.verify {
            config.output.verify = true;
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = MenuQrConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config)?;

    // Dropped at the end of main, flushing the log file.
    let _log_guard = logging::init(&config.logging)?;

    let request = config.request()?;
    info!(?request, path = %config.output.path.display(), "Generating QR code");

    let (symbol, image) = menuqr::build(&request)?;
    let path = &config.output.path;
    let mut report = menuqr::save(&request, &symbol, &image, path)
        .with_context(|| format!("failed to write QR code to {}", path.display()))?;

    if config.output.verify {
        menuqr::verify(path, &request.payload)
            .with_context(|| format!("{} does not scan back to the payload", path.display()))?;
        report.verified = Some(true);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.json())?);
    } else {
        for line in report.human_lines() {
            println!("{line}");
        }
    }

    if cli.preview {
        println!("{}", symbol.to_terminal());
    }

    Ok(())
}
