pub mod chats;
pub mod entry;

pub use chats::ChatFilter;
pub use entry::{parse_entry_list, Entry, Peer};
