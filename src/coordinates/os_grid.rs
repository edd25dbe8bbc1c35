//! Ordnance Survey National Grid references and their conversion to latitude
//! and longitude.
//!
//! The inverse transverse Mercator projection follows the Ordnance Survey's
//! published formulae ("A Guide to Coordinate Systems in Great Britain",
//! annex C) on the Airy 1830 ellipsoid, yielding OSGB36 coordinates. A
//! seven-parameter Helmert transform optionally moves the result onto WGS84.

use crate::coordinates::error::ConversionError;
use crate::types::lat_lon::LatLon;

const MAX_EASTING: f64 = 700_000.0;
const MAX_NORTHING: f64 = 1_300_000.0;

// National Grid projection constants.
const F0: f64 = 0.999_601_271_7;
const LAT0_DEG: f64 = 49.0;
const LON0_DEG: f64 = -2.0;
const E0: f64 = 400_000.0;
const N0: f64 = -100_000.0;

/// Residual (metres) below which the latitude iteration stops.
const MERIDIAN_TOLERANCE: f64 = 0.000_01;
const MAX_ITERATIONS: usize = 32;

struct Ellipsoid {
    a: f64,
    b: f64,
}

impl Ellipsoid {
    fn eccentricity_squared(&self) -> f64 {
        1.0 - (self.b * self.b) / (self.a * self.a)
    }
}

const AIRY_1830: Ellipsoid = Ellipsoid {
    a: 6_377_563.396,
    b: 6_356_256.909,
};

const WGS84: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    b: 6_356_752.314_245,
};

/// Helmert parameters: translations in metres, scale in ppm, rotations in arcseconds.
struct Helmert {
    tx: f64,
    ty: f64,
    tz: f64,
    s: f64,
    rx: f64,
    ry: f64,
    rz: f64,
}

const OSGB36_TO_WGS84: Helmert = Helmert {
    tx: 446.448,
    ty: -125.157,
    tz: 542.060,
    s: -20.4894,
    rx: 0.1502,
    ry: 0.2470,
    rz: 0.8421,
};

/// The geodetic datum a converted point is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Datum {
    /// The National Grid's own datum. No datum shift is applied.
    #[default]
    Osgb36,
    /// GPS datum; differs from OSGB36 by up to roughly 120 metres in Great Britain.
    Wgs84,
}

/// An easting/northing pair in metres on the OS National Grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRef {
    easting: f64,
    northing: f64,
}

impl GridRef {
    /// Validates and creates a grid reference.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::NonFinite`] for NaN or infinite input and
    /// [`ConversionError::OutOfGrid`] if the point lies outside the grid's
    /// 700 km x 1300 km extent.
    pub fn new(easting: f64, northing: f64) -> Result<Self, ConversionError> {
        if !easting.is_finite() || !northing.is_finite() {
            return Err(ConversionError::NonFinite { easting, northing });
        }
        if !(0.0..=MAX_EASTING).contains(&easting) || !(0.0..=MAX_NORTHING).contains(&northing) {
            return Err(ConversionError::OutOfGrid { easting, northing });
        }
        Ok(Self { easting, northing })
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Converts the grid reference to latitude/longitude in the given datum.
    pub fn to_lat_lon(&self, datum: Datum) -> LatLon {
        let (lat, lon) = self.inverse_projection();
        match datum {
            Datum::Osgb36 => LatLon(lat.to_degrees(), lon.to_degrees()),
            Datum::Wgs84 => {
                let cartesian = to_cartesian(lat, lon, &AIRY_1830);
                let shifted = apply_helmert(cartesian, &OSGB36_TO_WGS84);
                let (lat, lon) = from_cartesian(shifted, &WGS84);
                LatLon(lat.to_degrees(), lon.to_degrees())
            }
        }
    }

    /// Inverse transverse Mercator onto Airy 1830; returns radians.
    fn inverse_projection(&self) -> (f64, f64) {
        let a = AIRY_1830.a;
        let e2 = AIRY_1830.eccentricity_squared();
        let lat0 = LAT0_DEG.to_radians();
        let lon0 = LON0_DEG.to_radians();

        let mut lat = lat0;
        let mut m = 0.0;
        for _ in 0..MAX_ITERATIONS {
            lat += (self.northing - N0 - m) / (a * F0);
            m = meridional_arc(lat, lat0);
            if (self.northing - N0 - m).abs() < MERIDIAN_TOLERANCE {
                break;
            }
        }

        let (sin_lat, cos_lat) = lat.sin_cos();
        let nu = a * F0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let rho = a * F0 * (1.0 - e2) / (1.0 - e2 * sin_lat * sin_lat).powf(1.5);
        let eta2 = nu / rho - 1.0;

        let tan_lat = lat.tan();
        let tan2 = tan_lat * tan_lat;
        let tan4 = tan2 * tan2;
        let tan6 = tan4 * tan2;
        let sec_lat = 1.0 / cos_lat;
        let nu3 = nu.powi(3);
        let nu5 = nu.powi(5);
        let nu7 = nu.powi(7);

        let vii = tan_lat / (2.0 * rho * nu);
        let viii = tan_lat / (24.0 * rho * nu3) * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
        let ix = tan_lat / (720.0 * rho * nu5) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
        let x = sec_lat / nu;
        let xi = sec_lat / (6.0 * nu3) * (nu / rho + 2.0 * tan2);
        let xii = sec_lat / (120.0 * nu5) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
        let xiia = sec_lat / (5040.0 * nu7) * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6);

        let de = self.easting - E0;
        let (de2, de3) = (de * de, de * de * de);
        let (de4, de5) = (de2 * de2, de3 * de2);
        let (de6, de7) = (de4 * de2, de5 * de2);

        let lat = lat - vii * de2 + viii * de4 - ix * de6;
        let lon = lon0 + x * de - xi * de3 + xii * de5 - xiia * de7;
        (lat, lon)
    }
}

/// Meridional arc from the true origin latitude to `lat`, scaled by F0.
fn meridional_arc(lat: f64, lat0: f64) -> f64 {
    let Ellipsoid { a, b } = AIRY_1830;
    let n = (a - b) / (a + b);
    let (n2, n3) = (n * n, n * n * n);
    let d = lat - lat0;
    let s = lat + lat0;

    let ma = (1.0 + n + (5.0 / 4.0) * n2 + (5.0 / 4.0) * n3) * d;
    let mb = (3.0 * n + 3.0 * n2 + (21.0 / 8.0) * n3) * d.sin() * s.cos();
    let mc = ((15.0 / 8.0) * n2 + (15.0 / 8.0) * n3) * (2.0 * d).sin() * (2.0 * s).cos();
    let md = (35.0 / 24.0) * n3 * (3.0 * d).sin() * (3.0 * s).cos();
    b * F0 * (ma - mb + mc - md)
}

fn to_cartesian(lat: f64, lon: f64, ellipsoid: &Ellipsoid) -> [f64; 3] {
    let e2 = ellipsoid.eccentricity_squared();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    let nu = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    [
        nu * cos_lat * cos_lon,
        nu * cos_lat * sin_lon,
        nu * (1.0 - e2) * sin_lat,
    ]
}

fn apply_helmert([x, y, z]: [f64; 3], t: &Helmert) -> [f64; 3] {
    let s1 = t.s / 1e6 + 1.0;
    let rx = (t.rx / 3600.0).to_radians();
    let ry = (t.ry / 3600.0).to_radians();
    let rz = (t.rz / 3600.0).to_radians();
    [
        t.tx + x * s1 - y * rz + z * ry,
        t.ty + x * rz + y * s1 - z * rx,
        t.tz - x * ry + y * rx + z * s1,
    ]
}

fn from_cartesian([x, y, z]: [f64; 3], ellipsoid: &Ellipsoid) -> (f64, f64) {
    let e2 = ellipsoid.eccentricity_squared();
    let p = (x * x + y * y).sqrt();
    let mut lat = z.atan2(p * (1.0 - e2));
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let nu = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (z + e2 * nu * sin_lat).atan2(p);
        if (next - lat).abs() < 1e-12 {
            lat = next;
            break;
        }
        lat = next;
    }
    (lat, y.atan2(x))
}
