use crate::cards::CardFeatures;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// All cards found on one board, indexed in detection order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardState {
    cards: Vec<CardFeatures>,
}

impl BoardState {
    pub fn new(cards: Vec<CardFeatures>) -> Self {
        Self { cards }
    }

    /// Load a card list from a JSON array of card records
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read card list: {:?}", path))?;
        let cards: Vec<CardFeatures> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse card list: {:?}", path))?;
        Ok(Self::new(cards))
    }

    pub fn cards(&self) -> &[CardFeatures] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&CardFeatures> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Indices of cards with every attribute resolved, ascending
    pub fn playable_indices(&self) -> Vec<usize> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, card)| !card.is_unknown())
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of cards carrying the unknown sentinel
    pub fn unknown_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_unknown()).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardFeatures> {
        self.cards.iter()
    }
}

impl FromIterator<CardFeatures> for BoardState {
    fn from_iter<T: IntoIterator<Item = CardFeatures>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a BoardState {
    type Item = &'a CardFeatures;
    type IntoIter = std::slice::Iter<'a, CardFeatures>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}
