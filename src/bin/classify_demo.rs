//! Classifies one observation given as JSON (first argument, or stdin) and
//! prints the ranked result.
//!
//! ```text
//! cargo run --bin classify_demo -- '{"wind_speed":120,"pressure":940,"temperature":30}'
//! ```

use std::io::Read;

use anyhow::Context;
use storm_advisor::{classify_with, config::load_config_default, engine, ObservationInput};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let raw = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading observation from stdin")?;
            buf
        }
    };
    let input: ObservationInput =
        serde_json::from_str(&raw).context("observation must be a JSON object")?;

    let cfg = load_config_default()?;
    let result = classify_with(&input, engine::canonical_rules(), cfg)?;

    println!("Storm Classifications");
    for r in &result.rankings {
        println!("  {} (Probability: {:.4})", r.category, r.probability);
    }
    println!("Safety Advice");
    for a in &result.advisories {
        println!("  {} ({:.4})", a.text, a.weight);
    }
    Ok(())
}
