pub mod iris;

pub use iris::{load_iris, DataSplit, IRIS_CLASSES};
