//! CLI tool for calview - computes day-column event layout as JSON
//!
//! Usage:
//!   calview_cli <events.json> <config.json>              # Output JSON to stdout
//!   calview_cli <events.json> <config.json> -o out.json  # Output JSON to file

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use calview::day_layout_json;
use std::env;
use std::fs;
use std::io::{self, Write};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: calview_cli <events.json> <config.json> [-o output.json]");
        std::process::exit(1);
    }

    let events_path = &args[1];
    let config_path = &args[2];
    let output_path = if args.len() > 4 && args[3] == "-o" {
        Some(&args[4])
    } else {
        None
    };

    // Read input files
    let events = match fs::read_to_string(events_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", events_path, e);
            std::process::exit(1);
        }
    };
    let config = match fs::read_to_string(config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", config_path, e);
            std::process::exit(1);
        }
    };

    // Compute the layout
    let styled = match day_layout_json(&events, &config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error computing layout: {}", e);
            std::process::exit(1);
        }
    };

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&styled) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
