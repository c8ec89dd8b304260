pub mod chat;
pub mod companies;
pub mod latest;
pub mod load;
pub mod predict;
pub mod search;
pub mod serve;
pub mod trend;
