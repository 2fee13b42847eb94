use super::money::Money;
use crate::error::StoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The store's fixed shelf sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    PersonalCare,
    Groceries,
    Beverages,
    Snacks,
    Refrigerated,
    HouseholdCleaning,
    PreparedFood,
    Produce,
}

impl Category {
    pub const ALL: [Self; 8] = [
        Self::PersonalCare,
        Self::Groceries,
        Self::Beverages,
        Self::Snacks,
        Self::Refrigerated,
        Self::HouseholdCleaning,
        Self::PreparedFood,
        Self::Produce,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::PersonalCare => "personal-care",
            Self::Groceries => "groceries",
            Self::Beverages => "beverages",
            Self::Snacks => "snacks",
            Self::Refrigerated => "refrigerated",
            Self::HouseholdCleaning => "household-cleaning",
            Self::PreparedFood => "prepared-food",
            Self::Produce => "produce",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PersonalCare => "Personal Care",
            Self::Groceries => "Groceries",
            Self::Beverages => "Beverages",
            Self::Snacks => "Snacks & Sweets",
            Self::Refrigerated => "Refrigerated & Frozen",
            Self::HouseholdCleaning => "Household Cleaning",
            Self::PreparedFood => "Prepared Food",
            Self::Produce => "Fruits & Vegetables",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| StoreError::ValidationError(format!("Unknown category '{s}'")))
    }
}

/// Category selector for catalog listings. `All` is the "show everything" tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl From<Option<Category>> for CategoryFilter {
    fn from(category: Option<Category>) -> Self {
        category.map_or(Self::All, Self::Only)
    }
}

/// Highest unit price a product may carry.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// A product on the shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub category: Category,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Builds a product with no description or image, stamped now.
    ///
    /// Fails on a blank name or a price above [`MAX_PRICE`].
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Money,
        category: Category,
    ) -> Result<Self, StoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StoreError::ValidationError(
                "Product name must not be empty".to_string(),
            ));
        }
        if price.value() > MAX_PRICE {
            return Err(StoreError::ValidationError(format!(
                "Price must not exceed {MAX_PRICE}, got {}",
                price.value()
            )));
        }
        Ok(Self {
            id,
            name: name.trim().to_string(),
            description: None,
            price,
            category,
            image_url: None,
            created_at: Utc::now(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into()).filter(|d| !d.trim().is_empty());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into()).filter(|u| !u.trim().is_empty());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
