use crate::error::Error;
use serde::Serialize;

/// A product card as rendered on the page.
///
/// `category`, `brand` and `price` are the card's data attributes and drive
/// checkbox filtering. `name`, `brand_label` and `price_label` are the text
/// shown to the shopper and drive search and cart line construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    pub id: String,
    pub category: String,
    pub brand: String,
    /// Parsed `data-price` attribute. `None` when the attribute was not a
    /// non-negative number; such a card never falls inside a price bucket.
    pub price: Option<f64>,
    pub name: String,
    pub brand_label: String,
    pub price_label: String,
    pub image: String,
    pub visible: bool,
    pub wishlisted: bool,
}

impl ProductCard {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        brand: impl Into<String>,
        name: impl Into<String>,
        price: f64,
    ) -> Self {
        let brand = brand.into();
        Self {
            id: id.into(),
            category: category.into(),
            brand_label: brand.clone(),
            brand,
            price: Some(price),
            name: name.into(),
            price_label: format!("${:.2}", price),
            image: String::new(),
            visible: true,
            wishlisted: false,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_brand_label(mut self, label: impl Into<String>) -> Self {
        self.brand_label = label.into();
        self
    }

    /// Override the price label. The data attribute is left untouched.
    pub fn with_price_label(mut self, label: impl Into<String>) -> Self {
        self.price_label = label.into();
        self
    }

    /// Replace the data attribute with raw attribute text, as read from markup.
    pub fn with_price_attr(mut self, raw: &str) -> Self {
        self.price = parse_price(raw);
        self
    }
}

/// A group of cards rendered together, e.g. one horizontal product row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    pub products: Vec<ProductCard>,
}

impl Section {
    pub fn new(name: impl Into<String>, products: Vec<ProductCard>) -> Self {
        Self {
            name: name.into(),
            products,
        }
    }

    pub fn has_visible_products(&self) -> bool {
        self.products.iter().any(|p| p.visible)
    }
}

/// An immutable snapshot of a card taken when the shopper adds it to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub identity: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: f64,
    pub image: String,
}

impl ProductRecord {
    /// Build a record from the card's display text.
    ///
    /// The price comes from the price label with `currency_symbol` stripped.
    /// A label that does not hold a non-negative number is rejected so that the
    /// cart never carries a non-numeric price.
    pub fn from_card(card: &ProductCard, currency_symbol: &str) -> Result<Self, Error> {
        let price = parse_price_label(&card.price_label, currency_symbol).ok_or_else(|| {
            Error::Catalog(format!(
                "product '{}' has an unreadable price label '{}'",
                card.id, card.price_label
            ))
        })?;

        Ok(Self {
            identity: format!("{}-{}-{}", card.brand, card.category, card.id),
            name: card.name.trim().to_string(),
            brand: card.brand_label.trim().to_string(),
            category: card.category.clone(),
            price,
            image: card.image.clone(),
        })
    }
}

/// Parse a bare numeric attribute. Negative, NaN and infinite values are rejected.
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

/// Parse a display label such as `"$25.00"`.
pub fn parse_price_label(label: &str, currency_symbol: &str) -> Option<f64> {
    let trimmed = label.trim();
    let bare = if currency_symbol.is_empty() {
        trimmed
    } else {
        trimmed.strip_prefix(currency_symbol).unwrap_or(trimmed)
    };
    parse_price(bare)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_label() {
        assert_eq!(parse_price_label("$25.00", "$"), Some(25.0));
        assert_eq!(parse_price_label("  $12.5 ", "$"), Some(12.5));
        assert_eq!(parse_price_label("18", "$"), Some(18.0));
        assert_eq!(parse_price_label("€9.99", "€"), Some(9.99));
        assert_eq!(parse_price_label("$abc", "$"), None);
        assert_eq!(parse_price_label("$-4", "$"), None);
        assert_eq!(parse_price_label("", "$"), None);
    }

    #[test]
    fn test_parse_price_rejects_non_finite() {
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("inf"), None);
        assert_eq!(parse_price("0"), Some(0.0));
    }

    #[test]
    fn test_record_from_card_uses_display_text() {
        let card = ProductCard::new("p1", "lipstick", "dior", "  Rouge Dior ", 25.0)
            .with_brand_label(" Dior ")
            .with_image("img/rouge.jpg");
        let record = ProductRecord::from_card(&card, "$").unwrap();

        assert_eq!(record.name, "Rouge Dior");
        assert_eq!(record.brand, "Dior");
        assert_eq!(record.price, 25.0);
        assert_eq!(record.image, "img/rouge.jpg");
        assert_eq!(record.identity, "dior-lipstick-p1");
    }

    #[test]
    fn test_record_from_card_rejects_bad_label() {
        let card =
            ProductCard::new("p1", "lipstick", "Dior", "Rouge", 25.0).with_price_label("call us");
        assert!(matches!(
            ProductRecord::from_card(&card, "$"),
            Err(Error::Catalog(_))
        ));
    }

    #[test]
    fn test_price_attr_malformed_is_none() {
        let card = ProductCard::new("p1", "lipstick", "Dior", "Rouge", 25.0).with_price_attr("n/a");
        assert_eq!(card.price, None);
        assert_eq!(card.price_label, "$25.00");
    }
}
