//! Candidate retailers for allocation targets

use core_kernel::RetailerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retailer {
    pub id: RetailerId,
    pub name: String,
}

impl Retailer {
    pub fn new(id: RetailerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Retailers the field employee may allocate stock to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerDirectory {
    retailers: Vec<Retailer>,
}

impl RetailerDirectory {
    pub fn new(retailers: Vec<Retailer>) -> Self {
        Self { retailers }
    }

    /// Adds a retailer, replacing any entry with the same id
    pub fn insert(&mut self, retailer: Retailer) {
        match self.retailers.iter_mut().find(|r| r.id == retailer.id) {
            Some(existing) => *existing = retailer,
            None => self.retailers.push(retailer),
        }
    }

    pub fn get(&self, id: RetailerId) -> Option<&Retailer> {
        self.retailers.iter().find(|r| r.id == id)
    }

    /// Looks up a retailer by name, ignoring case and surrounding whitespace
    pub fn find_by_name(&self, name: &str) -> Option<&Retailer> {
        let wanted = name.trim();
        self.retailers
            .iter()
            .find(|r| r.name.trim().eq_ignore_ascii_case(wanted))
    }

    /// Retailers whose name contains `query`, for type-ahead suggestions
    pub fn search(&self, query: &str) -> Vec<&Retailer> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.retailers.iter().collect();
        }
        self.retailers
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Retailer> {
        self.retailers.iter()
    }

    pub fn len(&self) -> usize {
        self.retailers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retailers.is_empty()
    }
}

impl FromIterator<Retailer> for RetailerDirectory {
    fn from_iter<I: IntoIterator<Item = Retailer>>(iter: I) -> Self {
        let mut directory = Self::default();
        for retailer in iter {
            directory.insert(retailer);
        }
        directory
    }
}
