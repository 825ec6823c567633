// Fits the fixed logical battlefield into whatever box the page gives the canvas.

pub const LOGICAL_WIDTH: f64 = 800.0;
pub const LOGICAL_HEIGHT: f64 = 600.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Scale and offset of the 4:3 logical canvas inside its container.
/// `configure` must run on every resize before any conversion is trusted.
#[derive(Debug, Clone)]
pub struct CanvasViewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub display_width: f64,
    pub display_height: f64,
    pub configured: bool,
}

impl Default for CanvasViewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            display_width: LOGICAL_WIDTH,
            display_height: LOGICAL_HEIGHT,
            configured: false,
        }
    }
}

impl CanvasViewport {
    pub fn configure(&mut self, container_width: f64, container_height: f64) {
        let cw = container_width.max(0.0);
        let ch = container_height.max(0.0);
        let aspect = LOGICAL_WIDTH / LOGICAL_HEIGHT;
        if cw <= 0.0 || ch <= 0.0 {
            // Collapsed container (hidden tab, zero-height layout): keep a usable identity mapping.
            *self = Self::default();
            return;
        }
        let (w, h) = if cw / ch > aspect {
            (ch * aspect, ch)
        } else {
            (cw, cw / aspect)
        };
        self.display_width = w;
        self.display_height = h;
        self.scale = w / LOGICAL_WIDTH;
        self.offset_x = (cw - w) / 2.0;
        self.offset_y = (ch - h) / 2.0;
        self.configured = true;
    }

    /// Container-relative screen point to logical battlefield coordinates.
    pub fn to_logical(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        )
    }

    pub fn to_screen(&self, logical: Point) -> Point {
        Point::new(
            logical.x * self.scale + self.offset_x,
            logical.y * self.scale + self.offset_y,
        )
    }
}
