//! Classification stations
//!
//! A station is a row of four containers, one per lane, placed at every
//! multiple of the station interval. Placement is derived from distance
//! travelled only.

use glam::Vec3;
use serde::Serialize;

use crate::catalog::WasteType;
use crate::lane_x;

/// Height of a container's center
const CONTAINER_Y: f32 = 1.25;
/// Stations further than this from the player are not reported
const STATION_VISIBILITY: f32 = 80.0;
/// Stations reported at once (current plus two ahead)
const VISIBLE_STATIONS: u32 = 3;

/// z of the first station at or ahead of `z`
#[inline]
pub fn next_station(z: f32, interval: f32) -> f32 {
    (z / interval).ceil() * interval
}

/// z of the station closest to `z`
#[inline]
pub fn nearest_station(z: f32, interval: f32) -> f32 {
    (z / interval).round() * interval
}

/// True when the next station is strictly ahead and no more than `window` away
pub fn approaching_station(z: f32, interval: f32, window: f32) -> bool {
    let distance = next_station(z, interval) - z;
    distance > 0.0 && distance <= window
}

/// Move `z` off any station: positions within `buffer` of one are moved to
/// the midpoint after it
pub fn clear_of_stations(z: f32, interval: f32, buffer: f32) -> f32 {
    let station = nearest_station(z, interval);
    if (z - station).abs() < buffer {
        station + interval / 2.0
    } else {
        z
    }
}

/// One container of a station
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPlacement {
    /// `container-<type>-<station>`
    pub id: String,
    pub kind: WasteType,
    pub position: Vec3,
    pub station: f32,
}

/// Containers the renderer should show for the current progress
pub fn visible_stations(distance: f32, player_z: f32, interval: f32) -> Vec<ContainerPlacement> {
    let base = next_station(distance, interval).max(interval);
    let mut containers = Vec::new();

    for i in 0..VISIBLE_STATIONS {
        let station = base + i as f32 * interval;
        if (station - player_z).abs() > STATION_VISIBILITY {
            continue;
        }
        for kind in WasteType::ALL {
            containers.push(ContainerPlacement {
                id: format!("container-{}-{}", kind.as_str(), station),
                kind,
                position: Vec3::new(lane_x(kind.lane()), CONTAINER_Y, station),
                station,
            });
        }
    }

    containers
}
