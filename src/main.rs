// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Crawl the site
// 3. Write the CSV report
// 4. Exit with proper code (0 = done, 1 = bad arguments, 2 = unexpected error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - crawl limits and defaults
mod crawl;         // src/crawl/ - the crawler itself
mod extract;       // src/extract/ - HTML -> PageRecord
mod logging;       // src/logging.rs - tracing setup
mod report;        // src/report.rs - CSV output

use anyhow::Result;
use clap::Parser;
use tracing::error;
use url::Url;

use cli::Cli;
use config::CrawlConfig;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = crawl finished (the report may still have failed to write)
//   Ok(1) = bad command line or seed URL
//   Err   = unexpected error
async fn run() -> Result<i32> {
    // try_parse instead of parse: clap's own exit code for usage errors is 2
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return Ok(if e.use_stderr() { 1 } else { 0 });
        }
    };

    logging::init_logging(cli.verbose);

    match Url::parse(&cli.url) {
        Ok(url) if url.host_str().is_some() => {}
        Ok(_) => {
            eprintln!("Invalid URL: {} (no host)", cli.url);
            return Ok(1);
        }
        Err(e) => {
            eprintln!("Invalid URL: {}\n {}", cli.url, e);
            return Ok(1);
        }
    }

    let config = CrawlConfig::new(cli.max_concurrency(), cli.max_pages());

    println!("🔍 Crawling URL: {}", cli.url);
    println!(
        "📊 Max concurrency: {}, max pages: {}",
        config.max_concurrency, config.max_pages
    );

    let outcome = crawl::crawl_site(&cli.url, &config).await?;

    println!("Finished crawling.");
    println!("📄 Recorded {} page(s)", outcome.pages.len());

    match report::write_csv_report(&outcome.pages, &cli.output) {
        Ok(Some(path)) => println!("✅ CSV report written to {}", path.display()),
        Ok(None) => println!("⚠️  No page data to write"),
        // A failed write doesn't undo the crawl; log it and finish normally
        Err(e) => error!("Failed to write CSV report: {:#}", e),
    }

    print_summary(&outcome);
    Ok(0)
}

fn print_summary(outcome: &crawl::CrawlOutcome) {
    println!();
    println!("📊 Summary:");
    println!("   ✅ Recorded: {}", outcome.pages.len());
    println!("   ❌ Failed: {}", outcome.failed());
    if outcome.aborted > 0 {
        println!("   ⏹️  Aborted at the page limit: {}", outcome.aborted);
    }
    println!("   📋 Attempted: {}", outcome.claimed);
    if outcome.budget_reached {
        println!("   ⏹️  Stopped at the page limit");
    }
}
