/// Tags an asynchronous request so its completion can be matched against
/// the request that is current when it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u64);

impl Token {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic token source. Never rewinds, not even on reset, so a token
/// issued before a reset can never match one issued after it.
#[derive(Debug, Default)]
pub struct Tokens {
    last: u64,
}

impl Tokens {
    pub fn next(&mut self) -> Token {
        self.last += 1;
        Token(self.last)
    }
}
