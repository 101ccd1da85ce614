/// Supported tickers and the price feed id each maps to, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinTable {
    entries: Vec<(String, String)>,
}

pub const DEFAULT_COINS: &[(&str, &str)] = &[
    ("btc", "bitcoin"),
    ("eth", "ethereum"),
    ("bnb", "binancecoin"),
    ("sol", "solana"),
    ("ada", "cardano"),
    ("doge", "dogecoin"),
    ("xrp", "ripple"),
    ("meme", "meme"),
    ("moxie", "moxie"),
    ("degen", "degen-base"),
];

impl CoinTable {
    /// Later duplicates of a symbol are ignored. Symbols are stored lower case.
    pub fn new<S, C>(entries: impl IntoIterator<Item = (S, C)>) -> Self
    where
        S: Into<String>,
        C: Into<String>,
    {
        let mut out: Vec<(String, String)> = Vec::new();
        for (symbol, coin) in entries {
            let symbol = symbol.into().to_lowercase();
            if out.iter().any(|(s, _)| *s == symbol) {
                continue;
            }
            out.push((symbol, coin.into()));
        }
        Self { entries: out }
    }

    /// Case-insensitive ticker lookup.
    pub fn coin_for(&self, symbol: &str) -> Option<&str> {
        let symbol = symbol.to_lowercase();
        self.entries
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, c)| c.as_str())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CoinTable {
    fn default() -> Self {
        Self::new(DEFAULT_COINS.iter().copied())
    }
}
