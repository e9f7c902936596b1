pub mod csv_processor;
pub mod transform;
pub mod utils;

pub use csv_processor::{read_dataset, sort_rows, write_rows, Dataset, Row, SortKey};
pub use transform::{TransformReport, Transformer};
pub use utils::{AppConfig, ErrorKind, PathsConfig, PayrollSortError, Result};
