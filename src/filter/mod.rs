pub mod criteria;
pub mod predicate;
pub mod projector;

pub use criteria::{FilterControl, FilterCriteria, FilterDimension, PriceBucket};
pub use predicate::is_visible;
pub use projector::{project, NoResultsNotice, Projection};
