//! loan-sampler: headless portfolio generator.
//!
//! Usage:
//!   loan-sampler --seed 12345 --count 100
//!   loan-sampler --seed 12345 --count 100 --unrealistic --out sample.json
//!   loan-sampler --settings data/reporting_settings.json --count 1000

use anyhow::Result;
use loansynth_core::{
    config::ReportingSettings,
    portfolio::{self, Portfolio},
    snapshot::PortfolioSnapshot,
};
use std::env;
use std::io::Write;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64)?;
    let count = portfolio::validate_count(parse_arg(&args, "--count", 100i64)?)?;
    let realistic = !args.iter().any(|a| a == "--unrealistic");
    let settings_path = flag_value(&args, "--settings");
    let out_path = flag_value(&args, "--out");

    let settings = match settings_path {
        Some(path) => ReportingSettings::load(path)?,
        None => ReportingSettings::default_test(),
    };

    eprintln!("loan-sampler");
    eprintln!("  seed:      {seed}");
    eprintln!("  count:     {count}");
    eprintln!("  realistic: {realistic}");
    eprintln!(
        "  period:    {} .. {}",
        settings.previous_reporting_date, settings.current_reporting_date
    );
    eprintln!();

    let portfolio = portfolio::assemble(&settings, count, realistic, seed)?;
    let document = PortfolioSnapshot::new(&settings, &portfolio, seed, realistic);
    let json = document.to_json_pretty()?;

    match out_path {
        Some(path) => {
            std::fs::write(path, &json)
                .map_err(|e| anyhow::anyhow!("Cannot write {path}: {e}"))?;
            log::info!("wrote {} bytes to {path}", json.len());
        }
        None => {
            let mut stdout = std::io::stdout();
            writeln!(stdout, "{json}")?;
            stdout.flush()?;
        }
    }

    print_summary(&portfolio);
    Ok(())
}

fn print_summary(portfolio: &Portfolio) {
    let s = portfolio.summary;
    eprintln!("=== RUN SUMMARY ===");
    eprintln!("  loans:            {}", s.total());
    eprintln!("  continuing:       {}", s.continuing);
    eprintln!("  new:              {}", s.new);
    eprintln!("  expired:          {}", s.expired);
    eprintln!("  current records:  {}", portfolio.current_loans.len());
    eprintln!("  previous records: {}", portfolio.previous_loans.len());

    let principal: f64 = portfolio.current_loans.iter().map(|l| l.payment_amount).sum();
    let outstanding: f64 = portfolio.current_loans.iter().map(|l| l.current_balance).sum();
    eprintln!("  current principal:   {principal:.2}");
    eprintln!("  current outstanding: {outstanding:.2}");
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Missing flag means `default`; a value that does not parse is an error.
fn parse_arg<T>(args: &[String], flag: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match flag_value(args, flag) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {flag}: '{raw}' ({e})")),
        None => Ok(default),
    }
}
