//! Print a waste summary for an optional date range
//!
//! Usage: waste_report [START_DATE] [END_DATE]   (dates as YYYY-MM-DD)

use scrapless::config::Config;
use scrapless::db::Database;
use scrapless::tools::waste;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let start_date = args.next();
    let end_date = args.next();

    let config = Config::from_env();
    println!("Database path: {}", config.database_path.display());

    if !config.database_path.exists() {
        return Err(format!("No database at {}", config.database_path.display()).into());
    }

    let database = Database::open(&config.database_path)?;

    let summary = waste::waste_summary(&database, start_date.as_deref(), end_date.as_deref(), 10)?;

    println!(
        "Period: {} to {}",
        summary.start_date.as_deref().unwrap_or("beginning"),
        summary.end_date.as_deref().unwrap_or("today")
    );
    println!("Entries: {}", summary.entry_count);
    println!("Total value: {:.2}", summary.total_value);
    println!("Total carbon: {:.3} kg CO2e", summary.total_carbon_kg);

    if !summary.by_reason.is_empty() {
        println!();
        println!("By reason:");
        for row in &summary.by_reason {
            println!(
                "  {:<12} {:>4} entries  {:>10.2}  {:>8.3} kg",
                row.reason.as_str(),
                row.entry_count,
                row.totals.value,
                row.totals.carbon_kg
            );
        }
    }

    if !summary.top_items.is_empty() {
        println!();
        println!("Top items:");
        for item in &summary.top_items {
            println!(
                "  {:<20} {:>4} entries  {:>10.2}  {:>8.3} kg",
                item.item_name, item.entry_count, item.totals.value, item.totals.carbon_kg
            );
        }
    }

    Ok(())
}
