use crate::catalog::ProductRecord;
use crate::error::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Identity of a cart line. Assigned once at add time from a per-store
/// sequence and never derived from product attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineId(u64);

impl LineId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line-{}", self.0)
    }
}

impl FromStr for LineId {
    type Err = Error;

    /// Accepts both `line-7` and `7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix("line-").unwrap_or(s);
        digits
            .parse::<u64>()
            .map(LineId)
            .map_err(|_| Error::Other(format!("invalid cart line id '{}'", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineItem {
    pub id: LineId,
    pub name: String,
    pub brand: String,
    /// Unit price captured when the line was created.
    pub price: f64,
    pub image: String,
    pub quantity: u32,
}

impl CartLineItem {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Merge key: exact, case-sensitive name and brand.
    fn is_same_product(&self, product: &ProductRecord) -> bool {
        self.name == product.name && self.brand == product.brand
    }
}

/// Derived totals, recomputed from the lines after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CartSummary {
    pub item_count: u32,
    pub total: f64,
}

impl CartSummary {
    pub fn from_lines(lines: &[CartLineItem]) -> Self {
        lines.iter().fold(CartSummary::default(), |acc, line| CartSummary {
            item_count: acc.item_count.saturating_add(line.quantity),
            total: acc.total + line.subtotal(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

/// Owns the cart lines. Every mutation returns the recomputed summary;
/// operations on ids that no longer exist are no-ops.
#[derive(Debug, Default)]
pub struct CartStore {
    lines: Vec<CartLineItem>,
    next_line: u64,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`, merging into an existing line with the same
    /// name and brand.
    pub fn add(&mut self, product: &ProductRecord) -> CartSummary {
        match self.lines.iter_mut().find(|l| l.is_same_product(product)) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                debug!("{} quantity now {}", line.id, line.quantity);
            }
            None => {
                self.next_line += 1;
                let id = LineId(self.next_line);
                self.lines.push(CartLineItem {
                    id,
                    name: product.name.clone(),
                    brand: product.brand.clone(),
                    price: product.price,
                    image: product.image.clone(),
                    quantity: 1,
                });
                debug!("{} created for {}", id, product.identity);
            }
        }
        info!("Added to cart: {}", product.name);
        self.summary()
    }

    pub fn increase(&mut self, id: LineId) -> CartSummary {
        if let Some(line) = self.line_mut(id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            debug!("increase: {} not in cart", id);
        }
        self.summary()
    }

    /// Never takes a line below one unit; use [`CartStore::remove`] for that.
    pub fn decrease(&mut self, id: LineId) -> CartSummary {
        match self.line_mut(id) {
            Some(line) if line.quantity > 1 => line.quantity -= 1,
            Some(_) => debug!("decrease: {} already at quantity 1", id),
            None => debug!("decrease: {} not in cart", id),
        }
        self.summary()
    }

    pub fn remove(&mut self, id: LineId) -> CartSummary {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        if self.lines.len() == before {
            debug!("remove: {} not in cart", id);
        }
        self.summary()
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary::from_lines(&self.lines)
    }

    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    pub fn line(&self, id: LineId) -> Option<&CartLineItem> {
        self.lines.iter().find(|l| l.id == id)
    }

    fn line_mut(&mut self, id: LineId) -> Option<&mut CartLineItem> {
        self.lines.iter_mut().find(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, brand: &str, price: f64) -> ProductRecord {
        ProductRecord {
            identity: format!("{}-x-1", brand),
            name: name.to_string(),
            brand: brand.to_string(),
            category: "x".to_string(),
            price,
            image: String::new(),
        }
    }

    #[test]
    fn test_line_id_parse_and_display() {
        let id: LineId = "line-7".parse().unwrap();
        assert_eq!(id.get(), 7);
        assert_eq!(id.to_string(), "line-7");
        assert_eq!("7".parse::<LineId>().unwrap(), id);
        assert!("seven".parse::<LineId>().is_err());
    }

    #[test]
    fn test_line_ids_are_monotonic() {
        let mut store = CartStore::new();
        store.add(&record("A", "X", 1.0));
        let first = store.lines()[0].id;
        store.remove(first);
        store.add(&record("A", "X", 1.0));
        assert!(store.lines()[0].id > first);
    }

    #[test]
    fn test_merge_ignores_price_and_image() {
        let mut store = CartStore::new();
        store.add(&record("Rouge", "Dior", 25.0));
        let mut repriced = record("Rouge", "Dior", 30.0);
        repriced.image = "other.jpg".to_string();
        let summary = store.add(&repriced);

        assert_eq!(store.len(), 1);
        assert_eq!(store.lines()[0].price, 25.0);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total, 50.0);
    }

    #[test]
    fn test_merge_is_case_sensitive() {
        let mut store = CartStore::new();
        store.add(&record("Rouge", "Dior", 25.0));
        store.add(&record("rouge", "Dior", 25.0));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_empty_summary() {
        let store = CartStore::new();
        assert!(store.summary().is_empty());
        assert_eq!(store.summary().total, 0.0);
    }
}
