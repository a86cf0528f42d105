//! rfmgrid: RFM grid segmentation CLI
//!
//! Entrypoint that generates or loads customers, scores them, applies the
//! filter and selection, renders the grid and optionally submits.

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use rfmgrid::{data, viz, Args, EchoBackend, Session};
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if args.verbose {
        println!("rfmgrid - RFM Grid Segmentation");
        println!("===============================\n");
    }

    let start_time = Instant::now();

    // Step 1: Build the dataset
    let data_start = Instant::now();
    let records = if args.sample {
        data::sample_dataset()
    } else {
        match args.seed {
            Some(seed) => data::generate(args.count, &mut Pcg64Mcg::seed_from_u64(seed))?,
            None => data::generate(args.count, &mut rand::thread_rng())?,
        }
    };
    println!("✓ Customers ready: {}", records.len());
    if args.verbose {
        println!("  Generation time: {:.3}s", data_start.elapsed().as_secs_f64());
    }

    // Step 2: Score and filter
    let mut session = Session::load(records)?;
    session.set_criteria(args.criteria());
    let criteria = session.criteria();
    println!(
        "✓ Filter R>={}, F>={}, M>={}: {} of {} customers",
        criteria.recency,
        criteria.frequency,
        criteria.monetary,
        session.filtered().len(),
        session.scores().len()
    );

    // Step 3: Selection
    for id in args.parse_selected_ids()? {
        if !session.is_selected(&id) {
            session.toggle(&id)?;
        }
    }
    if let Some((x, y)) = args.parse_select_cell()? {
        let added = session.select_cell(x, y)?;
        log::info!("Selected {} customers from cell {}-{}", added, x, y);
    }
    if !session.selected_ids().is_empty() {
        println!("✓ Selected {} customers", session.selected_ids().len());
    }

    // Step 4: Render
    let viz_start = Instant::now();
    viz::generate_visualization_report(&session, &args.output)?;
    if args.verbose {
        println!("  Visualization time: {:.3}s", viz_start.elapsed().as_secs_f64());
    }

    if let Some(ref path) = args.json {
        session.write_report(path)?;
        println!("Report saved to: {}", path);
    }

    // Step 5: Submit
    if args.submit {
        let response = session.submit(&EchoBackend)?;
        println!("\n=== Submission ===");
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    println!("\n=== Pipeline Complete ===");
    println!(
        "Total processing time: {:.3}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
