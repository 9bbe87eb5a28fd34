use crate::codec;
use crate::pointer::PointerSink;
use crate::types::{Buttons, MappingMode, Vec3};
use crate::Result;

/// Stylus offset, in meters, applied to both screen axes in 2D mode.
const SCREEN_ORIGIN_SHIFT: f64 = 0.1;

/// Static calibration between the device workspace and the target screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Target screen size in pixels `[width, height]`.
    pub screen_resolution: [u32; 2],
    /// Physical workspace extents in meters (width, height, depth).
    pub workspace_size: Vec3,
    /// Peak force the device can render, in newtons.
    pub max_force: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            screen_resolution: [1440, 900],
            workspace_size: Vec3::new(0.20, 0.20, 0.055),
            max_force: 3.3,
        }
    }
}

impl Calibration {
    /// Defaults overridden by `HAPTIC_SCREEN_RES` (`WxH`), `HAPTIC_WORKSPACE`
    /// (`w,h,d` meters) and `HAPTIC_MAX_FORCE` (newtons).
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Calibration::from_env`] with a caller-supplied variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cal = Calibration::default();

        if let Some(raw) = lookup("HAPTIC_SCREEN_RES") {
            match parse_resolution(&raw) {
                Some(res) => cal.screen_resolution = res,
                None => log::warn!(
                    "Ignoring HAPTIC_SCREEN_RES='{}', using {}x{} (expected WxH)",
                    raw,
                    cal.screen_resolution[0],
                    cal.screen_resolution[1]
                ),
            }
        }

        if let Some(raw) = lookup("HAPTIC_WORKSPACE") {
            match codec::string_to_array(&raw) {
                Ok(ws) if ws.x > 0.0 && ws.y > 0.0 && ws.z > 0.0 => cal.workspace_size = ws,
                _ => log::warn!(
                    "Ignoring HAPTIC_WORKSPACE='{}', using {} (expected three positive meters)",
                    raw,
                    codec::array_to_string(&cal.workspace_size)
                ),
            }
        }

        if let Some(raw) = lookup("HAPTIC_MAX_FORCE") {
            match raw.trim().parse::<f64>() {
                Ok(f) if f.is_finite() && f > 0.0 => cal.max_force = f,
                _ => log::warn!(
                    "Ignoring HAPTIC_MAX_FORCE='{}', using {}",
                    raw,
                    cal.max_force
                ),
            }
        }

        cal
    }
}

fn parse_resolution(raw: &str) -> Option<[u32; 2]> {
    let (w, h) = raw.trim().split_once(['x', 'X'])?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    (w > 0 && h > 0).then_some([w, h])
}

/// Converts raw device positions into the reporting convention of the
/// current [`MappingMode`].
#[derive(Debug, Clone)]
pub struct WorkspaceMapper {
    calibration: Calibration,
    pixel_pitch: f64,
    offset: [f64; 2],
    mode: MappingMode,
}

impl WorkspaceMapper {
    /// Derive pixel pitch and centering offsets from `calibration`.
    ///
    /// The pitch is the smaller of `width/res_x` and `height/res_y`, so the
    /// mapped screen fits the workspace on both axes. Offsets center that
    /// footprint. Neither is recomputed later.
    pub fn new(calibration: Calibration) -> Self {
        let [res_x, res_y] = calibration.screen_resolution.map(f64::from);
        let ws = calibration.workspace_size;

        let mut pixel_pitch = ws.x / res_x;
        if ws.y < res_y * pixel_pitch {
            pixel_pitch = ws.y / res_y;
        }

        let offset = [
            (ws.x - res_x * pixel_pitch) / 2.0,
            (ws.y - res_y * pixel_pitch) / 2.0,
        ];

        log::debug!(
            "Calibration {}x{} px over {} m: pitch={} m/px offset=({}, {})",
            res_x,
            res_y,
            codec::array_to_string(&ws),
            pixel_pitch,
            offset[0],
            offset[1]
        );

        Self {
            calibration,
            pixel_pitch,
            offset,
            mode: MappingMode::default(),
        }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Meters of stylus travel per screen pixel.
    pub fn pixel_pitch(&self) -> f64 {
        self.pixel_pitch
    }

    pub fn offset(&self) -> [f64; 2] {
        self.offset
    }

    pub fn mode(&self) -> MappingMode {
        self.mode
    }

    /// Workspace extents encoded as `"w,h,d"`.
    pub fn workspace_size(&self) -> String {
        codec::array_to_string(&self.calibration.workspace_size)
    }

    /// Switch mode by name. Only `"2d"` and `"3d"` are accepted; on any other
    /// name the current mode is kept.
    pub fn set_mode(&mut self, name: &str) -> Result<MappingMode> {
        let mode = name.parse::<MappingMode>()?;
        if mode != self.mode {
            log::debug!("Mapping mode {} -> {}", self.mode.as_str(), mode.as_str());
        }
        self.mode = mode;
        Ok(mode)
    }

    /// Map `raw` to the reported triple.
    ///
    /// In [`MappingMode::Screen2d`] this also moves `pointer` to the mapped
    /// pixel and clicks when exactly the left button is held.
    pub fn map<P>(&self, raw: Vec3, buttons: Buttons, pointer: &mut P) -> Vec3
    where
        P: PointerSink + ?Sized,
    {
        match self.mode {
            MappingMode::Raw3d => Vec3::new(raw.y, -raw.z, -raw.x),
            MappingMode::Screen2d => {
                let bx = raw.y + SCREEN_ORIGIN_SHIFT + self.offset[0];
                let by = -(raw.z - SCREEN_ORIGIN_SHIFT) + self.offset[1];
                let px = bx / self.pixel_pitch;
                let py = by / self.pixel_pitch;

                pointer.move_to(px, py);
                if buttons == Buttons::LEFT {
                    pointer.left_click();
                }

                // The depth axis rides along unmapped.
                Vec3::new(px, py, raw.x)
            }
        }
    }

    /// [`WorkspaceMapper::map`] encoded as `"a,b,c"`.
    pub fn map_position<P>(&self, raw: Vec3, buttons: Buttons, pointer: &mut P) -> String
    where
        P: PointerSink + ?Sized,
    {
        codec::array_to_string(&self.map(raw, buttons, pointer))
    }
}

impl Default for WorkspaceMapper {
    fn default() -> Self {
        Self::new(Calibration::default())
    }
}
