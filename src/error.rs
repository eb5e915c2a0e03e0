/// Errors that can occur while building or configuring a [`crate::Trie`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrieError {
    /// The requested alphabet size was zero; a trie needs at least one
    /// real symbol to place before the endmarker.
    InvalidAlphabetSize,
    /// A byte in an inserted word fell outside the trie's configured
    /// alphabet range.
    SymbolOutOfAlphabet {
        /// The offending byte.
        symbol: u8,
    },
}

impl std::fmt::Display for TrieError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrieError::InvalidAlphabetSize => write!(f, "alphabet size must be at least 1"),
            TrieError::SymbolOutOfAlphabet { symbol } => {
                write!(f, "symbol {symbol:?} is outside the trie's alphabet")
            }
        }
    }
}

impl std::error::Error for TrieError {}
