pub mod fixtures;
pub mod mock_record_store;

pub use fixtures::*;
pub use mock_record_store::*;
