use anyhow::Result;
use tracing::info;
use zonal::{io, Config, ZoneMap};

use crate::cli::{Cli, InputArgs, ZonesArgs};

/// Load streets, sensors and config, and build the zone map.
pub(crate) fn build(input: &InputArgs) -> Result<ZoneMap> {
    let config = Config::from_json_file(&input.config)?;
    let streets = io::read_streets(&io::read_file(&input.streets)?)?;
    let sensors = io::read_sensors(&io::read_file(&input.sensors)?)?;
    ZoneMap::build(&streets, &sensors, &config)
}

pub fn run(_cli: &Cli, args: &ZonesArgs) -> Result<()> {
    let map = build(&args.input)?;
    let out_dir = args.output.clone().unwrap_or(".".into());

    io::write_json(&out_dir.join("zones.geojson"), &io::zones_to_geojson(map.zones()), args.force)?;
    io::write_json(&out_dir.join("corridor.geojson"), &io::corridor_to_geojson(map.corridor()), args.force)?;
    io::write_json(&out_dir.join("adjacency.json"), &io::adjacency_to_json(map.graph()), args.force)?;
    if let Some(walkable) = map.walkable() {
        io::write_json(&out_dir.join("walkable.geojson"), &io::walkable_to_geojson(walkable), args.force)?;
    }

    let approximated = map.zones().iter().filter(|z| z.is_approximated()).count();
    info!(zones = map.zones().len(), approximated, out = %out_dir.display(), "wrote zone outputs");
    Ok(())
}
