pub mod deadline;
pub mod error;
pub mod executable_utils;
pub mod fulfillment;
pub mod model;
pub mod storage;
