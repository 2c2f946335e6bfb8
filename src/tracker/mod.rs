pub mod done_files;
pub mod table;

pub use done_files::{DoneFileExtractor, DoneFilesReport, DoneList, FileCount};
pub use table::{read_path_column, PathCell, TableFormat};
