use super::criteria::FilterCriteria;
use crate::catalog::ProductCard;

/// Decide whether a card is shown under `criteria`.
///
/// Category, brand, price and search are independent; a card must satisfy
/// all of them. Within the price dimension the selected buckets are OR'd.
pub fn is_visible(product: &ProductCard, criteria: &FilterCriteria) -> bool {
    matches_category(product, criteria)
        && matches_brand(product, criteria)
        && matches_price(product, criteria)
        && matches_search(product, criteria)
}

fn matches_category(product: &ProductCard, criteria: &FilterCriteria) -> bool {
    criteria.categories.is_empty() || criteria.categories.contains(product.category.as_str())
}

fn matches_brand(product: &ProductCard, criteria: &FilterCriteria) -> bool {
    criteria.brands.is_empty() || criteria.brands.contains(product.brand.as_str())
}

fn matches_price(product: &ProductCard, criteria: &FilterCriteria) -> bool {
    if criteria.price_buckets.is_empty() {
        return true;
    }
    match product.price {
        Some(price) => criteria.price_buckets.iter().any(|b| b.contains(price)),
        None => false,
    }
}

fn matches_search(product: &ProductCard, criteria: &FilterCriteria) -> bool {
    if !criteria.has_search() {
        return true;
    }
    let term = criteria.search_term();
    [&product.name, &product.brand_label, &product.price_label]
        .iter()
        .any(|text| text.to_lowercase().contains(term))
}
