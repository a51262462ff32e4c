pub mod complex_mag;
pub mod economic_times;
pub mod google;
pub mod nytimes;
pub mod traits;
pub mod watchlist;

pub use complex_mag::Complex;
pub use economic_times::EconomicTimes;
pub use google::{GoogleNewsIndex, NewsIndexEntry};
pub use nytimes::NewYorkTimes;
pub use traits::{ArticleSource, NewsIndex};
pub use watchlist::{ScrapedArticle, Watchlist};
