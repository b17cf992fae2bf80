use serde::Serialize;

use super::entry::{Entry, Peer};

/// Which chats get exported, built from the Whitelist/Blacklist keys.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "lowercase", tag = "mode", content = "entries")]
pub enum ChatFilter {
    /// No list configured: every dialog is exported.
    All,
    /// Only the listed chats are exported.
    Whitelist(Vec<Entry>),
    /// Every dialog except the listed ones is exported.
    Blacklist(Vec<Entry>),
}

impl ChatFilter {
    /// Whitelist is authoritative when both lists are configured.
    pub fn new(whitelist: Vec<Entry>, blacklist: Vec<Entry>) -> ChatFilter {
        if !whitelist.is_empty() {
            ChatFilter::Whitelist(whitelist)
        } else if !blacklist.is_empty() {
            ChatFilter::Blacklist(blacklist)
        } else {
            ChatFilter::All
        }
    }

    pub fn allows(&self, peer: &Peer) -> bool {
        match self {
            ChatFilter::All => true,
            ChatFilter::Whitelist(entries) => entries.iter().any(|e| e.matches(peer)),
            ChatFilter::Blacklist(entries) => !entries.iter().any(|e| e.matches(peer)),
        }
    }

    /// In whitelist mode the exporter resolves exactly these chats instead
    /// of walking the whole dialog list.
    pub fn explicit_targets(&self) -> Option<&[Entry]> {
        match self {
            ChatFilter::Whitelist(entries) => Some(entries),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::entry::parse_entry_list;

    #[test]
    fn test_no_lists_allows_everything() {
        let filter = ChatFilter::new(vec![], vec![]);
        assert!(filter.allows(&Peer::Id(1)));
        assert!(filter.explicit_targets().is_none());
    }

    #[test]
    fn test_whitelist_selects_only_listed() {
        let filter = ChatFilter::new(parse_entry_list("someuser, 777000").unwrap(), vec![]);
        assert!(filter.allows(&Peer::Id(777000)));
        assert!(filter.allows(&Peer::username("SomeUser")));
        assert!(!filter.allows(&Peer::Id(1)));
        assert_eq!(filter.explicit_targets().unwrap().len(), 2);
    }

    #[test]
    fn test_blacklist_excludes_listed() {
        let filter = ChatFilter::new(vec![], parse_entry_list("-100123: spam").unwrap());
        assert!(!filter.allows(&Peer::Id(-100123)));
        assert!(filter.allows(&Peer::Id(42)));
        assert!(filter.explicit_targets().is_none());
    }

    #[test]
    fn test_whitelist_wins_over_blacklist() {
        let filter = ChatFilter::new(
            parse_entry_list("onlyme").unwrap(),
            parse_entry_list("onlyme, other").unwrap(),
        );
        // The blacklist is dropped entirely
        assert!(filter.allows(&Peer::username("onlyme")));
        assert!(!filter.allows(&Peer::username("other")));
    }
}
