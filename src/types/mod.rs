mod score;
mod sensor;
mod street;

pub use score::ScoreTable;
pub use sensor::{Sensor, SensorId};
pub use street::StreetSegment;
