//! Named points of interest and per-city value lookup.
//!
//! City labels read their values straight out of an already interpolated
//! field by snapping to the nearest fine-grid cell, so labeling never
//! re-runs the interpolation.

use serde::Serialize;
use std::collections::HashMap;

use crate::grid::{round1, GeoBounds, GridKey};
use crate::interpolation::VectorDatum;

/// Cities within this many degrees of the view are labeled.
pub const VISIBLE_MARGIN: f64 = 1.0;

/// A named location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

const fn city(name: &'static str, lat: f64, lon: f64) -> City {
    City { name, lat, lon }
}

/// A city label populated from the interpolated field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDatum {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// `None` when the city falls outside the field
    pub metric: Option<f64>,
    /// Rounded to one decimal
    pub wind_speed: f64,
    /// Rounded to the nearest whole degree
    pub wind_dir: u16,
}

/// Cities known to the map, grouped by region.
pub static CITIES: &[City] = &[
    // China: NE and North
    city("Harbin", 45.75, 126.65),
    city("Changchun", 43.88, 125.32),
    city("Shenyang", 41.80, 123.40),
    city("Dalian", 38.91, 121.60),
    city("Beijing", 39.91, 116.40),
    city("Tianjin", 39.09, 117.20),
    city("Hohhot", 40.85, 111.73),
    city("Ordos", 39.63, 109.97),
    city("Baotou", 40.66, 109.84),
    city("Qiqihar", 47.35, 123.92),
    city("Daqing", 46.60, 125.02),
    city("Mudanjiang", 44.58, 129.60),
    city("Jilin", 43.84, 126.56),
    city("Yanji", 42.89, 129.51),
    city("Dandong", 40.00, 124.35),
    city("Fushun", 41.87, 123.96),
    city("Anshan", 41.12, 122.99),
    // China: Central and East
    city("Shijiazhuang", 38.04, 114.50),
    city("Taiyuan", 37.87, 112.55),
    city("Jinan", 36.67, 116.98),
    city("Qingdao", 36.06, 120.38),
    city("Zhengzhou", 34.75, 113.65),
    city("Xi'an", 34.26, 108.94),
    city("Zhangjiakou", 40.82, 114.88),
    city("Erenhot", 43.65, 111.98),
    city("Yinchuan", 38.47, 106.27),
    city("Lanzhou", 36.06, 103.83),
    city("Xining", 36.62, 101.77),
    city("Kashgar", 39.47, 75.99),
    city("Korla", 41.76, 86.15),
    city("Hami", 42.83, 93.51),
    city("Jiayuguan", 39.77, 98.29),
    city("Dunhuang", 40.14, 94.66),
    city("Zhongwei", 37.51, 105.19),
    city("Golmud", 36.42, 94.90),
    city("Karamay", 45.58, 84.87),
    city("Nanjing", 32.06, 118.80),
    city("Shanghai", 31.23, 121.47),
    city("Wuhan", 30.59, 114.31),
    city("Hangzhou", 30.27, 120.15),
    city("Xuzhou", 34.26, 117.18),
    city("Yantai", 37.46, 121.45),
    city("Tangshan", 39.63, 118.18),
    city("Chengdu", 30.57, 104.07),
    city("Chongqing", 29.56, 106.55),
    city("Changsha", 28.23, 112.94),
    city("Nanchang", 28.68, 115.86),
    city("Hefei", 31.82, 117.23),
    city("Fuzhou", 26.07, 119.30),
    city("Xiamen", 24.48, 118.09),
    city("Guiyang", 26.65, 106.63),
    city("Kunming", 25.04, 102.68),
    city("Nanning", 22.82, 108.32),
    city("Guangzhou", 23.13, 113.26),
    city("Shenzhen", 22.54, 114.06),
    city("Dongguan", 23.04, 113.75),
    city("Wenzhou", 28.00, 120.67),
    city("Luoyang", 34.62, 112.45),
    city("Kaifeng", 34.80, 114.31),
    city("Handan", 36.60, 114.49),
    city("Linyi", 35.10, 118.35),
    city("Suzhou", 31.30, 120.62),
    city("Wuxi", 31.57, 120.30),
    city("Ningbo", 29.87, 121.55),
    city("Urumqi", 43.80, 87.60),
    // Korea
    city("Pyongyang", 39.02, 125.75),
    city("Seoul", 37.57, 126.98),
    city("Incheon", 37.46, 126.70),
    city("Busan", 35.18, 129.08),
    city("Daegu", 35.87, 128.60),
    city("Daejeon", 36.35, 127.38),
    city("Gwangju", 35.16, 126.85),
    city("Chuncheon", 37.90, 127.73),
    city("Jeju", 33.35, 126.53),
    city("Ulsan", 35.54, 129.31),
    city("Suwon", 37.26, 127.03),
    city("Hamhung", 39.92, 127.54),
    city("Wonsan", 39.15, 127.44),
    // Japan
    city("Fukuoka", 33.59, 130.40),
    city("Osaka", 34.69, 135.50),
    city("Nagoya", 35.18, 136.91),
    city("Tokyo", 35.68, 139.69),
    city("Sendai", 38.27, 140.87),
    city("Sapporo", 43.06, 141.35),
    city("Hiroshima", 34.39, 132.46),
    city("Kyoto", 35.01, 135.77),
    city("Toyama", 36.70, 137.21),
    city("Niigata", 37.90, 139.02),
    city("Akita", 39.72, 140.10),
    city("Hakodate", 41.77, 140.73),
    city("Asahikawa", 43.77, 142.37),
    city("Nagasaki", 32.75, 129.87),
    city("Kagoshima", 31.60, 130.56),
    city("Kobe", 34.69, 135.18),
    city("Yokohama", 35.44, 139.64),
    city("Kanazawa", 36.56, 136.65),
    city("Aomori", 40.82, 140.74),
    city("Kushiro", 42.98, 144.38),
    city("Kitakyushu", 33.88, 130.88),
    city("Kumamoto", 32.79, 130.74),
    city("Matsuyama", 33.84, 132.77),
    city("Okayama", 34.66, 133.92),
    city("Shizuoka", 34.98, 138.38),
    // Russia / Mongolia
    city("Vladivostok", 43.12, 131.87),
    city("Ulaanbaatar", 47.91, 106.91),
    city("Khabarovsk", 48.48, 135.07),
    city("Ussuriysk", 43.80, 131.95),
    city("Yuzhno-Sakhalinsk", 46.96, 142.74),
    city("Blagoveshchensk", 50.27, 127.54),
    city("Darkhan", 49.46, 106.01),
    city("Choibalsan", 48.07, 114.54),
    // Taiwan
    city("Taipei", 25.03, 121.57),
];

/// Cities close enough to the view to be labeled.
pub fn visible_cities(view: &GeoBounds) -> Vec<City> {
    let area = view.expand(VISIBLE_MARGIN);
    CITIES
        .iter()
        .filter(|c| area.contains(c.lat, c.lon))
        .copied()
        .collect()
}

/// Nearest fine-grid coordinate along one axis.
fn nearest_cell(coord: f64, axis_min: f64, fine_step: f64) -> f64 {
    round1(axis_min + ((coord - axis_min) / fine_step).round() * fine_step)
}

/// Look up each point's value in `field` by snapping it to the nearest
/// fine-grid cell of `area`.
///
/// Points that land outside the field come back with no metric and calm wind.
pub fn nearest_values(
    points: &[City],
    field: &[VectorDatum],
    area: &GeoBounds,
    fine_step: f64,
) -> Vec<CityDatum> {
    let lookup: HashMap<GridKey, &VectorDatum> = field
        .iter()
        .map(|d| (GridKey::new(d.lat, d.lon), d))
        .collect();

    points
        .iter()
        .map(|c| {
            let near_lat = nearest_cell(c.lat, area.lat_min, fine_step);
            let near_lon = nearest_cell(c.lon, area.lon_min, fine_step);
            let best = lookup.get(&GridKey::new(near_lat, near_lon));

            CityDatum {
                name: c.name.to_string(),
                lat: c.lat,
                lon: c.lon,
                metric: best.map(|d| d.metric),
                wind_speed: best.map_or(0.0, |d| round1(d.wind_speed)),
                wind_dir: best.map_or(0, |d| (d.wind_direction.round() as u16) % 360),
            }
        })
        .collect()
}
