mod articles;
mod keywords;
mod search;

pub use articles::articles;
pub use keywords::queue_keywords;
pub use search::search;
