pub mod error;
pub mod implicit;
pub mod plane;
pub mod priority_queue;
pub mod settings;
pub mod workload;

pub use crate::error::ViskitError;
pub use crate::implicit::ImplicitFunction;
pub use crate::plane::{LineIntersection, Plane, Vector3};
pub use crate::priority_queue::{IndexedPriorityQueue, PriorityItem, LARGE_PRIORITY};
pub use crate::settings::QueueSettings;
