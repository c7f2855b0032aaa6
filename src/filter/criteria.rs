use crate::error::Error;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Which attribute a filter checkbox constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterDimension {
    Category,
    Brand,
    Price,
}

impl FromStr for FilterDimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(FilterDimension::Category),
            "brand" => Ok(FilterDimension::Brand),
            "price" => Ok(FilterDimension::Price),
            other => Err(Error::Other(format!("unknown filter dimension '{}'", other))),
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterDimension::Category => "category",
            FilterDimension::Brand => "brand",
            FilterDimension::Price => "price",
        };
        f.write_str(name)
    }
}

/// One filter checkbox on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterControl {
    pub dimension: FilterDimension,
    pub value: String,
    pub checked: bool,
}

impl FilterControl {
    pub fn new(dimension: FilterDimension, value: impl Into<String>) -> Self {
        Self {
            dimension,
            value: value.into(),
            checked: false,
        }
    }
}

/// A half-open price interval `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBucket {
    pub min: f64,
    pub max: f64,
}

impl PriceBucket {
    /// Stands in for a selected bucket whose value could not be read.
    pub const NEVER: PriceBucket = PriceBucket { min: 0.0, max: 0.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn open_ended(min: f64) -> Self {
        Self {
            min,
            max: f64::INFINITY,
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price < self.max
    }

    /// Parse a checkbox value: `"10-25"` or `"50+"`.
    pub fn parse(value: &str) -> Result<Self, Error> {
        let value = value.trim();
        let bound = |s: &str| -> Result<f64, Error> {
            s.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| Error::InvalidBucket(value.to_string()))
        };

        if let Some(min) = value.strip_suffix('+') {
            return Ok(Self::open_ended(bound(min)?));
        }
        match value.split_once('-') {
            Some((min, max)) => Ok(Self::new(bound(min)?, bound(max)?)),
            None => Err(Error::InvalidBucket(value.to_string())),
        }
    }
}

/// Everything that currently constrains which cards are shown.
///
/// An empty set on any dimension means that dimension is unconstrained.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub categories: AHashSet<String>,
    pub brands: AHashSet<String>,
    pub price_buckets: Vec<PriceBucket>,
    search_input: String,
    search_term: String,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.insert(brand.into());
        self
    }

    pub fn with_price_bucket(mut self, bucket: PriceBucket) -> Self {
        self.price_buckets.push(bucket);
        self
    }

    pub fn with_search(mut self, input: &str) -> Self {
        self.set_search(input);
        self
    }

    pub fn set_search(&mut self, input: &str) {
        self.search_input = input.trim().to_string();
        self.search_term = self.search_input.to_lowercase();
    }

    /// Rebuild criteria from the checked controls and the raw search input.
    ///
    /// A checked price control with an unreadable value still counts as a
    /// selected bucket, but one that no price falls into.
    pub fn from_controls(controls: &[FilterControl], search_input: &str) -> Self {
        let mut criteria = Self::new().with_search(search_input);

        for control in controls.iter().filter(|c| c.checked) {
            match control.dimension {
                FilterDimension::Category => {
                    criteria.categories.insert(control.value.clone());
                }
                FilterDimension::Brand => {
                    criteria.brands.insert(control.value.clone());
                }
                FilterDimension::Price => match PriceBucket::parse(&control.value) {
                    Ok(bucket) => criteria.price_buckets.push(bucket),
                    Err(e) => {
                        warn!("{}; treating it as matching nothing", e);
                        criteria.price_buckets.push(PriceBucket::NEVER);
                    }
                },
            }
        }

        criteria
    }

    /// The trimmed search text as typed.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// The lower-cased term used for matching.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn has_search(&self) -> bool {
        !self.search_term.is_empty()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.categories.is_empty()
            && self.brands.is_empty()
            && self.price_buckets.is_empty()
            && !self.has_search()
    }
}
