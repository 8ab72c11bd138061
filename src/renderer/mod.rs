pub mod map_surface;
pub use map_surface::{MapConfig, MapSurface, SurfaceState};

pub mod pipeline;
pub use pipeline::{BuildOutcome, RenderPipeline, RenderPlan};

pub mod style;
pub use style::RenderOptions;
