use super::model::{parse_price, ProductCard, Section};
use super::Catalog;
use crate::error::Error;
use crate::markup::format_money;
use ahash::AHashSet;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "section", default)]
    sections: Vec<SectionEntry>,
}

#[derive(Debug, Deserialize)]
struct SectionEntry {
    name: String,
    #[serde(rename = "product", default)]
    products: Vec<CardEntry>,
}

/// `data-price` as written in the file: a number, or text that may not parse.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceAttr {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct CardEntry {
    #[serde(default)]
    id: Option<String>,
    category: String,
    brand: String,
    name: String,
    price: PriceAttr,
    #[serde(default)]
    brand_label: Option<String>,
    #[serde(default)]
    price_label: Option<String>,
    #[serde(default)]
    image: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    section: String,
    #[serde(default)]
    id: Option<String>,
    category: String,
    brand: String,
    name: String,
    price: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    brand_label: Option<String>,
    #[serde(default)]
    price_label: Option<String>,
}

/// Load a catalog file, choosing the format by extension (`.csv` or TOML).
pub fn load_catalog(path: &Path, currency_symbol: &str) -> Result<Catalog, Error> {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let catalog = if is_csv {
        parse_csv(fs::File::open(path)?, currency_symbol)?
    } else {
        parse_toml(&fs::read_to_string(path)?, currency_symbol)?
    };

    info!(
        "Loaded {} products in {} sections from {}",
        catalog.len(),
        catalog.sections().len(),
        path.display()
    );
    Ok(catalog)
}

pub fn parse_toml(text: &str, currency_symbol: &str) -> Result<Catalog, Error> {
    let file: CatalogFile = toml::from_str(text)?;
    build_catalog(file.sections, currency_symbol)
}

/// Rows are grouped into sections in order of first appearance.
pub fn parse_csv<R: io::Read>(reader: R, currency_symbol: &str) -> Result<Catalog, Error> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut sections: Vec<SectionEntry> = Vec::new();

    for result in rdr.deserialize() {
        let row: CsvRow = result?;
        let card = CardEntry {
            id: row.id,
            category: row.category,
            brand: row.brand,
            name: row.name,
            price: PriceAttr::Text(row.price),
            brand_label: row.brand_label,
            price_label: row.price_label,
            image: row.image,
        };

        match sections.iter_mut().find(|s| s.name == row.section) {
            Some(section) => section.products.push(card),
            None => sections.push(SectionEntry {
                name: row.section,
                products: vec![card],
            }),
        }
    }

    build_catalog(sections, currency_symbol)
}

fn build_catalog(entries: Vec<SectionEntry>, currency_symbol: &str) -> Result<Catalog, Error> {
    let mut seen_ids: AHashSet<String> = AHashSet::new();
    let mut sections = Vec::with_capacity(entries.len());

    for entry in entries {
        let mut products = Vec::with_capacity(entry.products.len());

        for (idx, card) in entry.products.into_iter().enumerate() {
            let id = card
                .id
                .unwrap_or_else(|| format!("{}-{}", slug(&entry.name), idx + 1));
            if !seen_ids.insert(id.clone()) {
                return Err(Error::Catalog(format!("duplicate product id '{}'", id)));
            }

            let (price, default_label) = match card.price {
                PriceAttr::Number(p) => {
                    let price = Some(p).filter(|p| p.is_finite() && *p >= 0.0);
                    (price, format_money(currency_symbol, p))
                }
                PriceAttr::Text(raw) => match parse_price(&raw) {
                    Some(p) => (Some(p), format_money(currency_symbol, p)),
                    None => (None, format!("{}{}", currency_symbol, raw.trim())),
                },
            };
            if price.is_none() {
                warn!("Product '{}' has a non-numeric price attribute", id);
            }

            products.push(ProductCard {
                id,
                category: card.category,
                brand_label: card.brand_label.unwrap_or_else(|| card.brand.clone()),
                brand: card.brand,
                price,
                name: card.name,
                price_label: card.price_label.unwrap_or(default_label),
                image: card.image,
                visible: true,
                wishlisted: false,
            });
        }

        debug!("Section '{}': {} products", entry.name, products.len());
        sections.push(Section::new(entry.name, products));
    }

    Ok(Catalog::new(sections))
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Best Sellers"), "best-sellers");
        assert_eq!(slug("  New & Hot! "), "new-hot");
    }

    #[test]
    fn test_toml_generates_missing_ids() {
        let text = r#"
            [[section]]
            name = "Best Sellers"

            [[section.product]]
            category = "lipstick"
            brand = "Dior"
            name = "Rouge Dior"
            price = 25

            [[section.product]]
            id = "superstay"
            category = "lipstick"
            brand = "Maybelline"
            name = "SuperStay"
            price = "9.5"
        "#;
        let catalog = parse_toml(text, "$").unwrap();
        let ids: Vec<&str> = catalog.products().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["best-sellers-1", "superstay"]);
        assert_eq!(catalog.product("superstay").unwrap().price, Some(9.5));
        assert_eq!(catalog.product("best-sellers-1").unwrap().price_label, "$25.00");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let text = r#"
            [[section]]
            name = "A"
            [[section.product]]
            id = "x"
            category = "c"
            brand = "b"
            name = "n"
            price = 1
            [[section.product]]
            id = "x"
            category = "c"
            brand = "b"
            name = "m"
            price = 2
        "#;
        assert!(matches!(parse_toml(text, "$"), Err(Error::Catalog(_))));
    }
}
