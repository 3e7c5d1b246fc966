pub mod path_resolver;
pub mod reserve_reader;
pub mod rpc_reader;

pub use path_resolver::{resolve_path, PathResolver};
pub use reserve_reader::{
    read_all_balances, read_all_stats, AmountOutSource, BalanceSource, ReserveReader,
};
pub use rpc_reader::RpcPoolReader;
