pub mod frame_loop;
pub mod lifecycle;
pub mod placement;
pub mod sync;
pub mod viewport;

pub use frame_loop::{BrowserFrames, FrameLoop};
pub use lifecycle::{Epoch, Lifecycle, Phase};
pub use placement::{FieldBand, Intent, PlaceCard, PlacementMachine};
pub use sync::{PollOutcome, StateSync};
pub use viewport::{CanvasViewport, LOGICAL_HEIGHT, LOGICAL_WIDTH, Point};
