use crate::HapticError;
use std::str::FromStr;

/// Returned by queries that need an open session or a responsive driver.
pub const NOT_INITIALIZED: &str = "Not initialized";

/// Status text reported while a session is open.
pub const INITIALIZED: &str = "Initialized";

/// A 3-component value in device or reporting space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(a: [f64; 3]) -> Self {
        Vec3::new(a[0], a[1], a[2])
    }
}

/// Force command in world axes (newtons), as received from the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceVector(pub Vec3);

impl ForceVector {
    /// Reorder and flip into the driver's `(z, x, y)` argument order.
    ///
    /// The vertical component is negated to correct the device-to-world axis.
    pub fn to_driver_order(self) -> [f64; 3] {
        let v = self.0;
        [v.z, v.x, -v.y]
    }
}

impl FromStr for ForceVector {
    type Err = HapticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::codec::string_to_array(s).map(ForceVector)
    }
}

bitflags::bitflags! {
    /// Button word reported by `hdPhantomGetButtons`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(C)]
    pub struct Buttons: u32 {
        const LEFT  = 1 << 0;
        const RIGHT = 1 << 1;
    }
}

impl Buttons {
    /// Decode the raw driver word. Codes outside 0..=3 read as no buttons.
    pub fn from_raw(raw: i32) -> Self {
        u32::try_from(raw)
            .ok()
            .and_then(Buttons::from_bits)
            .unwrap_or(Buttons::empty())
    }
}

/// A single stylus button.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left = 1,
    Right = 2,
}

impl Button {
    /// True when the driver reports exactly this button and nothing else.
    pub fn is_reported_by(self, buttons: Buttons) -> bool {
        match self {
            Button::Left => buttons == Buttons::LEFT,
            Button::Right => buttons == Buttons::RIGHT,
        }
    }
}

/// How polled positions are reported.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingMode {
    /// Device axes remapped to the `(y, -z, -x)` reporting convention.
    #[default]
    Raw3d = 0,
    /// Screen pixels, with the OS pointer following the stylus.
    Screen2d = 1,
}

impl MappingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MappingMode::Raw3d => "3d",
            MappingMode::Screen2d => "2d",
        }
    }
}

impl FromStr for MappingMode {
    type Err = HapticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "3d" => Ok(MappingMode::Raw3d),
            "2d" => Ok(MappingMode::Screen2d),
            other => Err(HapticError::InvalidMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_exact_match_only() {
        assert_eq!("2d".parse::<MappingMode>(), Ok(MappingMode::Screen2d));
        assert_eq!("3d".parse::<MappingMode>(), Ok(MappingMode::Raw3d));
        for bad in ["", "xyz", "2D", " 3d", "3d ", "2d3d"] {
            assert!(matches!(
                bad.parse::<MappingMode>(),
                Err(HapticError::InvalidMode(_))
            ));
        }
    }

    #[test]
    fn test_force_driver_order() {
        let f: ForceVector = "1.0,2.0,3.0".parse().unwrap();
        assert_eq!(f.to_driver_order(), [3.0, 1.0, -2.0]);
    }

    #[test]
    fn test_buttons_exact_code() {
        assert!(Button::Left.is_reported_by(Buttons::from_raw(1)));
        assert!(Button::Right.is_reported_by(Buttons::from_raw(2)));
        assert!(!Button::Left.is_reported_by(Buttons::from_raw(0)));
        assert!(!Button::Left.is_reported_by(Buttons::from_raw(2)));
        assert!(!Button::Left.is_reported_by(Buttons::from_raw(3)));
        assert_eq!(Buttons::from_raw(-1), Buttons::empty());
    }

    #[test]
    fn test_buttons_unknown_code_reports_nothing() {
        assert_eq!(Buttons::from_raw(3), Buttons::LEFT | Buttons::RIGHT);
        for raw in [4, 5, 6, 9, 0x101] {
            let b = Buttons::from_raw(raw);
            assert_eq!(b, Buttons::empty(), "raw word {}", raw);
            assert!(!Button::Left.is_reported_by(b));
            assert!(!Button::Right.is_reported_by(b));
        }
    }
}
