pub mod debouncer;
pub mod refresher;

pub use debouncer::{QuoteDebouncer, QuoteUpdate};
pub use refresher::{refresh_once, BalanceWatch, MarketRefresher, MarketSnapshot};
