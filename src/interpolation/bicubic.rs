//! Bicubic Catmull-Rom field interpolation.
//!
//! Each fine point uses the 16 coarse samples around the coarse cell that
//! encloses it: one ring outward on the low side and two on the high side,
//! in both latitude and longitude. The sample set must therefore extend at
//! least two coarse steps beyond the target area; where it does not, the
//! missing neighbors contribute zero.

use tracing::debug;

use super::common::{catmull_rom, fine_step, wind_from_components};
use super::VectorDatum;
use crate::error::{Result, WindfieldError};
use crate::grid::{axis_values, round1, snap_down, GeoBounds};
use crate::samples::SampleSet;
use crate::variables::MetricKey;

/// Coarse coordinates of the four stencil rows (or columns) around `base`.
fn stencil(base: f64, step: f64) -> [f64; 4] {
    [base - step, base, base + step, base + 2.0 * step]
}

/// Interpolate wind and one metric onto the fine grid covering `area`.
///
/// `step` is the coarse grid step and `fineness` the number of fine cells
/// per coarse step. Output is row-major: all longitudes of the first
/// latitude, then the next.
pub fn interpolate_field(
    samples: &SampleSet,
    area: &GeoBounds,
    step: f64,
    fineness: u32,
    metric: MetricKey,
) -> Result<Vec<VectorDatum>> {
    if fineness == 0 {
        return Err(WindfieldError::invalid_parameter(
            "fineness",
            "must be at least 1",
        ));
    }

    let fine = fine_step(step, fineness);
    let lats = axis_values(area.lat_min, area.lat_max, fine);
    let lons = axis_values(area.lon_min, area.lon_max, fine);

    let mut out = Vec::with_capacity(lats.len() * lons.len());
    let mut missing_neighbors = 0usize;

    for &lat in &lats {
        let lat_base = snap_down(lat, step);
        let fy = (lat - lat_base) / step;
        let rows = stencil(lat_base, step);

        for &lon in &lons {
            let lon_base = snap_down(lon, step);
            let fx = (lon - lon_base) / step;
            let cols = stencil(lon_base, step);

            let mut row_u = [0.0; 4];
            let mut row_v = [0.0; 4];
            let mut row_m = [0.0; 4];

            for (r, &row_lat) in rows.iter().enumerate() {
                let mut pu = [0.0; 4];
                let mut pv = [0.0; 4];
                let mut pm = [0.0; 4];

                for (c, &col_lon) in cols.iter().enumerate() {
                    match samples.get(row_lat, col_lon) {
                        Some(sample) => {
                            pu[c] = sample.u;
                            pv[c] = sample.v;
                            pm[c] = sample.metric(metric).unwrap_or(0.0);
                        }
                        None => missing_neighbors += 1,
                    }
                }

                row_u[r] = catmull_rom(pu[0], pu[1], pu[2], pu[3], fx);
                row_v[r] = catmull_rom(pv[0], pv[1], pv[2], pv[3], fx);
                row_m[r] = catmull_rom(pm[0], pm[1], pm[2], pm[3], fx);
            }

            let u = catmull_rom(row_u[0], row_u[1], row_u[2], row_u[3], fy);
            let v = catmull_rom(row_v[0], row_v[1], row_v[2], row_v[3], fy);
            let m = catmull_rom(row_m[0], row_m[1], row_m[2], row_m[3], fy);

            let (wind_speed, wind_direction) = wind_from_components(u, v);

            out.push(VectorDatum {
                lat: round1(lat),
                lon: round1(lon),
                wind_speed,
                wind_direction,
                metric: m.max(0.0),
            });
        }
    }

    if missing_neighbors > 0 {
        debug!(
            missing_neighbors = missing_neighbors,
            "Stencil reached outside the sample set; missing samples read as zero"
        );
    }

    Ok(out)
}
