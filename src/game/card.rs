use serde::{Deserialize, Serialize};

/// The fixed symbol pool. Rounds use a prefix of it, so its order matters.
pub const SYMBOL_POOL: [Symbol; 7] = [
    Symbol::Helmet,
    Symbol::Potion,
    Symbol::Ring,
    Symbol::Scroll,
    Symbol::Shield,
    Symbol::Sword,
    Symbol::Wizard,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Helmet,
    Potion,
    Ring,
    Scroll,
    Shield,
    Sword,
    Wizard,
}

impl Symbol {
    pub fn src(self) -> &'static str {
        match self {
            Symbol::Helmet => "/img/helmet-1.png",
            Symbol::Potion => "/img/potion-1.png",
            Symbol::Ring => "/img/ring-1.png",
            Symbol::Scroll => "/img/scroll-1.png",
            Symbol::Shield => "/img/shield-1.png",
            Symbol::Sword => "/img/sword-1.png",
            Symbol::Wizard => "/img/wizard-1.png",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Helmet => "🪖",
            Symbol::Potion => "🧪",
            Symbol::Ring => "💍",
            Symbol::Scroll => "📜",
            Symbol::Shield => "🛡️",
            Symbol::Sword => "⚔️",
            Symbol::Wizard => "🧙",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub symbol: Symbol,
    pub matched: bool,
}

impl Card {
    pub fn src(&self) -> &'static str {
        self.symbol.src()
    }

    /// Pair equality; identity is `id`.
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.symbol == other.symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn pool_sources_are_distinct() {
        let sources: HashSet<_> = SYMBOL_POOL.iter().map(|s| s.src()).collect();
        assert_eq!(sources.len(), SYMBOL_POOL.len());
    }

    #[test]
    fn a_card_never_pairs_with_itself() {
        let card = Card {
            id: CardId(1),
            symbol: Symbol::Ring,
            matched: false,
        };
        let twin = Card {
            id: CardId(2),
            ..card.clone()
        };
        assert!(!card.pairs_with(&card));
        assert!(card.pairs_with(&twin));
        assert_eq!(twin.src(), "/img/ring-1.png");
    }
}
