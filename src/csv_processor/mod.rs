pub mod reader;
pub mod sorter;
pub mod writer;

pub use reader::{parse_rows, read_dataset, Dataset, Row};
pub use sorter::{sort_rows, Integer, SortKey};
pub use writer::{write_rows, SortedCsvWriter};
