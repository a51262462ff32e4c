pub mod keywords;
pub mod ledger;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod walker;

pub use keywords::KeywordExtractor;
pub use ledger::VisitedLedger;
pub use traits::PostFetcher;
pub use walker::{ThreadWalker, WalkerConfig};
