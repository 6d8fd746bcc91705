pub const PI: f64 = core::f64::consts::PI;
pub const TWOPI: f64 = 2.0 * PI;

pub const DEG_TO_RAD: f64 = PI / 180.0;
pub const RAD_TO_DEG: f64 = 180.0 / PI;
pub const ARCMIN_TO_RAD: f64 = DEG_TO_RAD / 60.0;
pub const ARCSEC_TO_RAD: f64 = DEG_TO_RAD / 3600.0;

pub const J2000_JD: f64 = 2451545.0;
pub const MJD_ZERO_POINT: f64 = 2_400_000.5;
pub const SECONDS_PER_DAY_F64: f64 = 86400.0;
pub const SECONDS_TO_DAYS: f64 = 1.0 / SECONDS_PER_DAY_F64;

pub const ELECTRON_VOLT_J: f64 = 1.602_176_634e-19;
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
pub const PLANCK_J_S: f64 = 6.626_070_15e-34;
pub const JANSKY_SI: f64 = 1e-26;

/// Rotation matrix between the IAU 1958 Galactic system and ICRS.
///
/// Stored so that ICRS -> Galactic is `M * v` and Galactic -> ICRS is `M^T * v`.
///
/// Reference: Liu, J.-C., Zhu, Z., & Zhang, H. (2011), A&A 526, A16.
#[allow(clippy::excessive_precision)]
pub const GALACTIC_TO_ICRS: [[f64; 3]; 3] = [
    [
        -0.054875560416215368492398900454,
        -0.873437090234885048760383168409,
        -0.483835015548713226831774175116,
    ],
    [
        0.494109427875583673525222371358,
        -0.444829629960011178146614061616,
        0.746982244497218890527388004556,
    ],
    [
        -0.867666149019004701181616534570,
        -0.198076373431201528180486091412,
        0.455983776175066922272100478348,
    ],
];
