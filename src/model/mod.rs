mod object;
mod refs;
mod report;
mod size;
mod top;

pub use object::{ObjectId, ObjectInfo, ObjectKind, TraversalUnit};
pub use refs::{pattern_matches, RefKind, RefRecord, RefSelection, RefSummary};
pub use report::{ObjectSummary, PathLeaderboards, Report};
pub use size::{SizeRecord, SizeTally};
pub use top::{Ranking, TopTable};
