use colored::*;
use storefront::cart::{CartSummary, CartView};
use storefront::filter::Projection;
use storefront::{Catalog, StorefrontListener};

/// Terminal listener: echoes visibility and cart changes to stderr.
pub struct TerminalListener {
    currency_symbol: String,
}

impl TerminalListener {
    pub fn new(currency_symbol: &str) -> Self {
        Self {
            currency_symbol: currency_symbol.to_string(),
        }
    }
}

impl StorefrontListener for TerminalListener {
    fn on_visibility_changed(&self, projection: &Projection) {
        eprintln!(
            "  {} {} of {} products visible",
            "✓".green(),
            projection.visible_products,
            projection.total_products
        );
        if let Some(notice) = &projection.notice {
            eprintln!("  {}", notice.message().yellow());
        }
    }

    fn on_cart_changed(&self, summary: &CartSummary, _view: &CartView) {
        eprintln!(
            "  {} Cart: {} items, total {}",
            "✓".green(),
            format!("{}", summary.item_count).cyan(),
            format!("{}{:.2}", self.currency_symbol, summary.total).cyan(),
        );
    }

    fn on_cart_opened(&self) {
        eprintln!("  {} Cart panel open", "›".cyan());
    }

    fn on_cart_closed(&self) {
        eprintln!("  {} Cart panel closed", "‹".cyan());
    }
}

pub fn print_listing(catalog: &Catalog) {
    if let Some(notice) = catalog.no_results() {
        println!("{}", "No products found".red().bold());
        println!("{}", notice.message());
        return;
    }

    for section in catalog.displayed_sections() {
        println!("{}", section.name.bold());
        for card in section.products.iter().filter(|p| p.visible) {
            let heart = if card.wishlisted { "♥" } else { " " };
            println!(
                "  {} {} {} {} {}",
                heart.red(),
                format!("{:<20}", card.id).dimmed(),
                format!("{:<32}", card.name),
                format!("{:>10}", card.price_label).green(),
                card.brand_label.cyan(),
            );
        }
    }
}

pub fn print_cart(view: &CartView) {
    match view {
        CartView::Empty => println!("{}", "Your cart is empty".dimmed()),
        CartView::Filled {
            rows,
            item_count,
            total,
        } => {
            for row in rows {
                println!(
                    "  {} {} {} {} x {} = {}",
                    format!("[{}]", row.line_id).dimmed(),
                    row.brand.cyan(),
                    row.name,
                    row.unit_price,
                    row.quantity,
                    row.subtotal.green(),
                );
            }
            println!(
                "  {} items, total {}",
                item_count,
                total.green().bold()
            );
        }
    }
}
