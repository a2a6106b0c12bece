use std::path::Path;

use anyhow::Result;
use log::{info, warn};

mod data;
mod model;
mod report;

use data::{Equipment, MarketData};
use report::format_gbp;

fn main() -> Result<()> {
    env_logger::init();

    // Optional positional argument: directory holding the three demand/price
    // sheets. Defaults to data/ next to the binary's working directory.
    let args: Vec<String> = std::env::args().collect();
    let data_dir = args.get(1).map(String::as_str).unwrap_or("data");

    let market = MarketData::load(Path::new(data_dir))?;
    info!(
        "loaded demand/price tables for {} equipment types over {} weeks",
        Equipment::ALL.len(),
        market.num_weeks()
    );

    let plan = model::solve(&market);

    if plan.is_optimal() {
        println!("Total revenue: {}", format_gbp(plan.total_revenue()));
    } else {
        warn!("solver terminated with status {:?}", plan.status);
        println!("No optimal solution found.");
    }

    for equipment in Equipment::ALL {
        println!(
            "Revenue from {}: {}",
            equipment.name(),
            format_gbp(plan.revenue_for(equipment))
        );
    }

    let summary = report::rental_summary(&market, &plan);
    println!();
    report::print_summary_head(&summary, 10);

    Ok(())
}
