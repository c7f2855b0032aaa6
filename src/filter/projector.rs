use super::criteria::FilterCriteria;
use super::predicate::is_visible;
use crate::catalog::Catalog;
use html_escape::encode_text;
use serde::Serialize;
use tracing::{debug, trace};

/// Shown in place of the listing when a search leaves nothing visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoResultsNotice {
    pub term: String,
}

impl NoResultsNotice {
    pub fn new(term: impl Into<String>) -> Self {
        Self { term: term.into() }
    }

    pub fn message(&self) -> String {
        format!("We couldn't find any products matching \"{}\"", self.term)
    }

    pub fn to_html(&self) -> String {
        format!(
            concat!(
                "<div class=\"no-results-message\">",
                "<div class=\"no-results-content\">",
                "<i class=\"bi bi-search\"></i>",
                "<h3>No products found</h3>",
                "<p>We couldn't find any products matching \"<strong>{}</strong>\"</p>",
                "</div></div>"
            ),
            encode_text(&self.term)
        )
    }
}

/// What a projection pass changed, for listeners and reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Projection {
    pub total_products: usize,
    pub visible_products: usize,
    pub hidden_sections: Vec<String>,
    pub notice: Option<NoResultsNotice>,
}

/// Apply `criteria` to every card in the catalog.
///
/// Card flags are overwritten, section display is re-derived from them, and
/// the no-results notice is replaced, so repeated projections never stack
/// notices.
pub fn project(catalog: &mut Catalog, criteria: &FilterCriteria) -> Projection {
    let mut total_products = 0;
    let mut visible_products = 0;

    for section in catalog.sections_mut() {
        for card in section.products.iter_mut() {
            card.visible = is_visible(card, criteria);
            trace!("{} visible={}", card.id, card.visible);
            total_products += 1;
            if card.visible {
                visible_products += 1;
            }
        }
    }

    let search_active = criteria.has_search();
    let notice = (search_active && visible_products == 0)
        .then(|| NoResultsNotice::new(criteria.search_input()));
    catalog.set_search_state(search_active, notice.clone());

    let hidden_sections: Vec<String> = catalog
        .sections()
        .iter()
        .filter(|s| !catalog.is_section_displayed(s))
        .map(|s| s.name.clone())
        .collect();

    debug!(
        "Projected {}/{} products visible, {} sections hidden",
        visible_products,
        total_products,
        hidden_sections.len()
    );

    Projection {
        total_products,
        visible_products,
        hidden_sections,
        notice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductCard, Section};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Section::new(
                "Lips",
                vec![ProductCard::new("a", "lipstick", "Dior", "Rouge", 25.0)],
            ),
            Section::new(
                "Eyes",
                vec![ProductCard::new("b", "eyeshadow", "Maybelline", "Nudes", 12.0)],
            ),
        ])
    }

    #[test]
    fn test_search_hides_empty_sections() {
        let mut catalog = catalog();
        let projection = project(&mut catalog, &FilterCriteria::new().with_search("dior"));
        assert_eq!(projection.visible_products, 1);
        assert_eq!(projection.hidden_sections, vec!["Eyes".to_string()]);
        assert!(projection.notice.is_none());
    }

    #[test]
    fn test_checkbox_filter_keeps_sections() {
        let mut catalog = catalog();
        let projection = project(&mut catalog, &FilterCriteria::new().with_brand("Dior"));
        assert_eq!(projection.visible_products, 1);
        assert!(projection.hidden_sections.is_empty());
    }

    #[test]
    fn test_notice_replaced_not_stacked() {
        let mut catalog = catalog();
        project(&mut catalog, &FilterCriteria::new().with_search("xyz"));
        project(&mut catalog, &FilterCriteria::new().with_search("qqq"));
        assert_eq!(catalog.no_results(), Some(&NoResultsNotice::new("qqq")));

        project(&mut catalog, &FilterCriteria::new().with_search("nudes"));
        assert!(catalog.no_results().is_none());
    }

    #[test]
    fn test_checkbox_filter_with_no_matches_has_no_notice() {
        let mut catalog = catalog();
        let criteria = FilterCriteria::new()
            .with_category("lipstick")
            .with_brand("Maybelline");
        let projection = project(&mut catalog, &criteria);
        assert_eq!(projection.visible_products, 0);
        assert!(projection.notice.is_none());
        assert!(catalog.no_results().is_none());
        assert!(projection.hidden_sections.is_empty());
    }

    #[test]
    fn test_notice_html_escapes_term() {
        let html = NoResultsNotice::new("<script>").to_html();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert_eq!(html.matches("no-results-message").count(), 1);
    }
}
