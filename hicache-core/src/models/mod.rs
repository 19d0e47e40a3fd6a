pub mod annotation;
pub mod chromosome;
pub mod coverage;
pub mod interaction;
pub mod position;
pub mod window;

// re-export for cleaner imports
pub use self::annotation::{EpigeneticTrack, Gene};
pub use self::chromosome::Chromosome;
pub use self::coverage::CoverageSpan;
pub use self::interaction::{AnchorMode, Interaction};
pub use self::position::{CacheKey, CachedPosition, GroupKey, Position3};
pub use self::window::Window;
