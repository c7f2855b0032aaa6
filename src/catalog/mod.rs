pub mod loader;
pub mod model;

pub use loader::{load_catalog, parse_csv, parse_toml};
pub use model::{parse_price, parse_price_label, ProductCard, ProductRecord, Section};

use crate::filter::NoResultsNotice;
use ahash::AHashSet;
use serde::Serialize;

/// The pre-rendered product listing plus the display state the projector
/// writes back onto it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    sections: Vec<Section>,
    search_active: bool,
    no_results: Option<NoResultsNotice>,
}

impl Catalog {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            search_active: false,
            no_results: None,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub(crate) fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    pub fn products(&self) -> impl Iterator<Item = &ProductCard> {
        self.sections.iter().flat_map(|s| s.products.iter())
    }

    pub fn product(&self, id: &str) -> Option<&ProductCard> {
        self.products().find(|p| p.id == id)
    }

    pub fn product_mut(&mut self, id: &str) -> Option<&mut ProductCard> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.products.iter_mut())
            .find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.products.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn visible_count(&self) -> usize {
        self.products().filter(|p| p.visible).count()
    }

    /// Whether a section is shown. Only a search hides whole sections, and only
    /// once none of their cards remain visible.
    pub fn is_section_displayed(&self, section: &Section) -> bool {
        !self.search_active || section.has_visible_products()
    }

    pub fn displayed_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(move |s| self.is_section_displayed(s))
    }

    pub fn no_results(&self) -> Option<&NoResultsNotice> {
        self.no_results.as_ref()
    }

    pub(crate) fn set_search_state(&mut self, search_active: bool, notice: Option<NoResultsNotice>) {
        self.search_active = search_active;
        self.no_results = notice;
    }

    /// Distinct categories in listing order.
    pub fn categories(&self) -> Vec<String> {
        distinct(self.products().map(|p| p.category.as_str()))
    }

    /// Distinct brands in listing order.
    pub fn brands(&self) -> Vec<String> {
        distinct(self.products().map(|p| p.brand.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: AHashSet<&str> = AHashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(|v| v.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![
            Section::new(
                "Lips",
                vec![
                    ProductCard::new("a", "lipstick", "Dior", "Rouge", 25.0),
                    ProductCard::new("b", "lipstick", "Maybelline", "SuperStay", 9.0),
                ],
            ),
            Section::new(
                "Eyes",
                vec![ProductCard::new("c", "eyeshadow", "Dior", "Palette", 60.0)],
            ),
        ])
    }

    #[test]
    fn test_lookup_and_counts() {
        let catalog = sample();
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.product("c").map(|p| p.name.as_str()), Some("Palette"));
        assert!(catalog.product("zzz").is_none());
        assert_eq!(catalog.visible_count(), 3);
    }

    #[test]
    fn test_distinct_values_keep_listing_order() {
        let catalog = sample();
        assert_eq!(catalog.categories(), vec!["lipstick", "eyeshadow"]);
        assert_eq!(catalog.brands(), vec!["Dior", "Maybelline"]);
    }

    #[test]
    fn test_sections_displayed_without_search() {
        let mut catalog = sample();
        for p in catalog.sections_mut()[1].products.iter_mut() {
            p.visible = false;
        }
        // Checkbox filtering hides cards, never sections
        assert_eq!(catalog.displayed_sections().count(), 2);

        catalog.set_search_state(true, None);
        let names: Vec<&str> = catalog.displayed_sections().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Lips"]);
    }
}
