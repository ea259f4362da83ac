mod report;

pub use report::{FieldOrder, LocationReport};
