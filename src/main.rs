mod assets;
mod compose;
mod config;
mod font;
mod format;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use compose::{ComposeError, TradeMetrics};
use config::{Direction, RenderConfig, Token};

#[derive(Parser, Debug)]
#[command(name = "trading-record", about = "Generate trading record images")]
struct Args {
    /// Trading direction
    #[arg(short = 'd', long, value_enum)]
    direction: Direction,

    /// Trading token
    #[arg(short = 't', long, value_enum)]
    token: Token,

    /// Position PnL (can be negative)
    #[arg(short = 'p', long, allow_hyphen_values = true)]
    pnl: f64,

    /// Opening average price
    #[arg(short = 'o', long)]
    open_price: f64,

    /// Closing average price
    #[arg(short = 'c', long)]
    close_price: f64,

    /// Opening time in format YYYYMMDDHHMMSS (e.g. 20250608222135)
    #[arg(long)]
    open_time: String,

    /// Closing time in format YYYYMMDDHHMMSS (e.g. 20250609012745)
    #[arg(long)]
    close_time: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(path) => {
            info!("generated trading record saved as: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<PathBuf, ComposeError> {
    // Equal prices make the quantity undefined; reject before touching any
    // assets or the output directory.
    let metrics = TradeMetrics::derive(
        args.pnl,
        args.open_price,
        args.close_price,
        format::format_timestamp(&args.open_time),
        format::format_timestamp(&args.close_time),
    )?;

    let cfg = RenderConfig::new(args.direction, args.token);
    let img = compose::compose_record(&cfg, &metrics);

    let output_dir = output_dir();
    std::fs::create_dir_all(&output_dir)?;
    let path = output_dir.join(output_filename(args.direction, args.token));
    img.save(&path)
        .map_err(|e| ComposeError::Image(e.to_string()))?;

    info!(
        "generated {} {} trading record:",
        args.direction.as_str(),
        args.token.ticker()
    );
    info!("  pnl: {:+.3} {}", metrics.pnl, metrics.symbol);
    info!("  quantity: {:.3} {}", metrics.quantity, args.token.ticker());
    info!("  open price: {:.3}", metrics.open_price);
    info!("  close price: {:.3}", metrics.close_price);
    info!("  close value: {:.3} {}", metrics.close_value, metrics.symbol);
    info!("  open time: {}", metrics.open_time);
    info!("  close time: {}", metrics.close_time);

    Ok(path)
}

fn output_dir() -> PathBuf {
    std::env::var("OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("output"))
}

/// Output name carries direction, token and a generation timestamp so
/// parallel invocations never collide.
fn output_filename(direction: Direction, token: Token) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!(
        "trading_record_{}_{}_{stamp}.png",
        direction.as_str(),
        token.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_carries_direction_token_and_timestamp() {
        let name = output_filename(Direction::Long, Token::Btc);
        assert!(name.starts_with("trading_record_long_btc_"));
        assert!(name.ends_with(".png"));
        // trading_record_long_btc_YYYYMMDD_HHMMSS.png
        assert_eq!(name.len(), "trading_record_long_btc_".len() + 15 + 4);
    }

    #[test]
    fn end_to_end_writes_a_record_under_the_output_dir() {
        let scratch = std::env::temp_dir().join("trading-record-e2e");
        std::env::set_var("OUTPUT_DIR", &scratch);
        let args = Args {
            direction: Direction::Long,
            token: Token::Btc,
            pnl: 150.0,
            open_price: 100.0,
            close_price: 110.0,
            open_time: "20250608222135".into(),
            close_time: "20250609012745".into(),
        };
        let path = run(&args).unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.contains("long"));
        assert!(name.contains("btc"));
        std::fs::remove_file(&path).ok();
        std::env::remove_var("OUTPUT_DIR");
    }

    #[test]
    fn equal_prices_abort_before_writing() {
        let args = Args {
            direction: Direction::Short,
            token: Token::Eth,
            pnl: 150.0,
            open_price: 100.0,
            close_price: 100.0,
            open_time: "20250608222135".into(),
            close_time: "20250609012745".into(),
        };
        assert!(matches!(run(&args), Err(ComposeError::ZeroPriceRange)));
    }
}
