use anyhow::{Context, Result};
use tracing::info;
use zonal::io;

use crate::cli::{Cli, PropagateArgs};
use crate::commands::zones;

pub fn run(_cli: &Cli, args: &PropagateArgs) -> Result<()> {
    let map = zones::build(&args.input)?;
    let scores = io::read_scores(&io::read_file(&args.scores)?)?;
    let points = io::read_points(&io::read_file(&args.points)?)?;

    let results = map.propagate_all(&scores, &points);
    let value = io::results_to_json(&results);

    match &args.output {
        Some(path) => io::write_json(path, &value, args.force)?,
        None => println!("{}", serde_json::to_string_pretty(&value).context("failed to serialize results")?),
    }

    info!(points = results.len(), approximated = results.iter().filter(|r| r.is_approximated()).count(), "propagated scores");
    Ok(())
}
