//! The browsing pages: profiles, buckets, objects and object details

pub mod buckets;
pub mod object;
pub mod objects;
pub mod profiles;

pub use buckets::BucketsPage;
pub use object::ObjectPage;
pub use objects::{ObjectRow, ObjectsPage};
pub use profiles::ProfilesPage;
