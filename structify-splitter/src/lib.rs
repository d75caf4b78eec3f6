mod splitter;
mod textprep;

pub use splitter::{RecursiveCharacterTextSplitter, SplitterBuilder, SplitterConfigError};
pub use textprep::tidy_extracted_text;
