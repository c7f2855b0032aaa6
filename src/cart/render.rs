use super::store::{CartLineItem, CartStore, CartSummary, LineId};
use crate::markup::format_money;
use ahash::AHashMap;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use tracing::debug;

const EMPTY_CART_HTML: &str =
    "<div class=\"cart-empty\"><i class=\"bi bi-cart-x\"></i><p>Your cart is empty</p></div>";

/// What a per-line control does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "line", rename_all = "lowercase")]
pub enum CartAction {
    Increase(LineId),
    Decrease(LineId),
    Remove(LineId),
}

impl CartAction {
    pub fn line_id(self) -> LineId {
        match self {
            CartAction::Increase(id) | CartAction::Decrease(id) | CartAction::Remove(id) => id,
        }
    }

    /// Identifier of the rendered control bound to this action.
    pub fn control_id(self) -> String {
        let kind = match self {
            CartAction::Increase(_) => "increase",
            CartAction::Decrease(_) => "decrease",
            CartAction::Remove(_) => "remove",
        };
        format!("{}:{}", kind, self.line_id())
    }

    pub fn apply(self, store: &mut CartStore) -> CartSummary {
        match self {
            CartAction::Increase(id) => store.increase(id),
            CartAction::Decrease(id) => store.decrease(id),
            CartAction::Remove(id) => store.remove(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartRow {
    pub line_id: LineId,
    pub image: String,
    pub brand: String,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
    pub increase: String,
    pub decrease: String,
    pub remove: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CartView {
    Empty,
    Filled {
        rows: Vec<CartRow>,
        item_count: u32,
        total: String,
    },
}

/// A page element the renderer writes into.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayTarget {
    pub text: String,
    pub displayed: bool,
}

/// The summary elements around the cart panel. Any of them may be missing
/// from the page, in which case its update is skipped.
#[derive(Debug, Clone, Default)]
pub struct CartTargets {
    pub badge: Option<DisplayTarget>,
    pub empty_panel: Option<DisplayTarget>,
    pub footer: Option<DisplayTarget>,
    pub total_label: Option<DisplayTarget>,
    pub body: Option<DisplayTarget>,
}

impl CartTargets {
    /// A page that has every target.
    pub fn all() -> Self {
        Self {
            badge: Some(DisplayTarget::default()),
            empty_panel: Some(DisplayTarget::default()),
            footer: Some(DisplayTarget::default()),
            total_label: Some(DisplayTarget::default()),
            body: Some(DisplayTarget::default()),
        }
    }
}

/// Regenerates the cart display from the store and owns the control bindings.
///
/// Every render replaces the whole view and the whole binding table, so a
/// control left over from an earlier render can never fire.
pub struct CartRenderer {
    currency_symbol: String,
    view: CartView,
    bindings: AHashMap<String, CartAction>,
}

impl CartRenderer {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
            view: CartView::Empty,
            bindings: AHashMap::new(),
        }
    }

    pub fn render(&mut self, store: &CartStore, targets: &mut CartTargets) -> &CartView {
        let summary = store.summary();
        self.bindings.clear();

        self.view = if store.is_empty() {
            CartView::Empty
        } else {
            let mut rows = Vec::with_capacity(store.len());
            for line in store.lines() {
                for action in [
                    CartAction::Decrease(line.id),
                    CartAction::Increase(line.id),
                    CartAction::Remove(line.id),
                ] {
                    self.bindings.insert(action.control_id(), action);
                }
                rows.push(self.row(line));
            }
            CartView::Filled {
                rows,
                item_count: summary.item_count,
                total: self.money(summary.total),
            }
        };

        self.update_targets(&summary, targets);
        debug!(
            "Cart rendered: {} lines, {} items, {} bindings",
            store.len(),
            summary.item_count,
            self.bindings.len()
        );
        &self.view
    }

    /// Run the action bound to `control_id` and re-render. Unknown or stale
    /// controls do nothing and return `None`.
    pub fn dispatch(
        &mut self,
        control_id: &str,
        store: &mut CartStore,
        targets: &mut CartTargets,
    ) -> Option<CartSummary> {
        let Some(action) = self.bindings.get(control_id).copied() else {
            debug!("No binding for control '{}'", control_id);
            return None;
        };
        let summary = action.apply(store);
        self.render(store, targets);
        Some(summary)
    }

    pub fn view(&self) -> &CartView {
        &self.view
    }

    pub fn binding(&self, control_id: &str) -> Option<CartAction> {
        self.bindings.get(control_id).copied()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// The cart body as an HTML fragment.
    pub fn to_html(&self) -> String {
        let CartView::Filled { rows, .. } = &self.view else {
            return EMPTY_CART_HTML.to_string();
        };

        let mut html = String::new();
        for row in rows {
            let line_id = row.line_id.to_string();
            html.push_str(&format!(
                concat!(
                    "<div class=\"cart-item\" data-id=\"{id}\">",
                    "<img src=\"{image}\" alt=\"{alt}\" class=\"cart-item-img\">",
                    "<div class=\"cart-item-details\">",
                    "<div class=\"cart-item-brand\">{brand}</div>",
                    "<div class=\"cart-item-name\">{name}</div>",
                    "<div class=\"cart-item-price\">{price} each</div>",
                    "<div class=\"cart-item-actions\">",
                    "<div class=\"quantity-control\">",
                    "<button class=\"quantity-btn decrease\" data-id=\"{id}\">-</button>",
                    "<span class=\"quantity-display\">{qty}</span>",
                    "<button class=\"quantity-btn increase\" data-id=\"{id}\">+</button>",
                    "</div>",
                    "<button class=\"remove-btn\" data-id=\"{id}\"><i class=\"bi bi-trash\"></i></button>",
                    "</div>",
                    "<div class=\"cart-item-subtotal\">Subtotal: {subtotal}</div>",
                    "</div></div>"
                ),
                id = encode_double_quoted_attribute(&line_id),
                image = encode_double_quoted_attribute(&row.image),
                alt = encode_double_quoted_attribute(&row.name),
                name = encode_text(&row.name),
                brand = encode_text(&row.brand),
                price = encode_text(&row.unit_price),
                qty = row.quantity,
                subtotal = encode_text(&row.subtotal),
            ));
        }
        html
    }

    fn row(&self, line: &CartLineItem) -> CartRow {
        CartRow {
            line_id: line.id,
            image: line.image.clone(),
            brand: line.brand.clone(),
            name: line.name.clone(),
            unit_price: self.money(line.price),
            quantity: line.quantity,
            subtotal: self.money(line.subtotal()),
            increase: CartAction::Increase(line.id).control_id(),
            decrease: CartAction::Decrease(line.id).control_id(),
            remove: CartAction::Remove(line.id).control_id(),
        }
    }

    fn update_targets(&self, summary: &CartSummary, targets: &mut CartTargets) {
        let empty = summary.is_empty();

        if let Some(badge) = targets.badge.as_mut() {
            badge.text = summary.item_count.to_string();
            badge.displayed = true;
        }
        if let Some(panel) = targets.empty_panel.as_mut() {
            panel.displayed = empty;
        }
        if let Some(footer) = targets.footer.as_mut() {
            footer.displayed = !empty;
        }
        if let Some(label) = targets.total_label.as_mut() {
            label.text = self.money(summary.total);
            label.displayed = !empty;
        }
        if let Some(body) = targets.body.as_mut() {
            body.text = self.to_html();
            body.displayed = true;
        }
    }

    fn money(&self, amount: f64) -> String {
        format_money(&self.currency_symbol, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductRecord;

    fn record(name: &str, brand: &str, price: f64) -> ProductRecord {
        ProductRecord {
            identity: format!("{}-c-1", brand),
            name: name.to_string(),
            brand: brand.to_string(),
            category: "c".to_string(),
            price,
            image: "img.jpg".to_string(),
        }
    }

    #[test]
    fn test_empty_render() {
        let store = CartStore::new();
        let mut renderer = CartRenderer::new("$");
        let mut targets = CartTargets::all();
        assert_eq!(renderer.render(&store, &mut targets), &CartView::Empty);

        assert_eq!(targets.badge.as_ref().unwrap().text, "0");
        assert!(targets.empty_panel.as_ref().unwrap().displayed);
        assert!(!targets.footer.as_ref().unwrap().displayed);
        assert!(targets.body.as_ref().unwrap().text.contains("Your cart is empty"));
        assert_eq!(renderer.binding_count(), 0);
    }

    #[test]
    fn test_rows_and_bindings() {
        let mut store = CartStore::new();
        store.add(&record("Rouge", "Dior", 10.0));
        store.add(&record("Rouge", "Dior", 10.0));
        store.add(&record("Nudes", "Maybelline", 5.0));

        let mut renderer = CartRenderer::new("$");
        let mut targets = CartTargets::all();
        let view = renderer.render(&store, &mut targets).clone();

        let CartView::Filled { rows, item_count, total } = view else {
            panic!("expected filled view");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].subtotal, "$20.00");
        assert_eq!(rows[0].unit_price, "$10.00");
        assert_eq!(item_count, 3);
        assert_eq!(total, "$25.00");
        assert_eq!(renderer.binding_count(), 6);
        assert_eq!(targets.total_label.as_ref().unwrap().text, "$25.00");
        assert!(targets.footer.as_ref().unwrap().displayed);
    }

    #[test]
    fn test_dispatch_stale_control_is_noop() {
        let mut store = CartStore::new();
        store.add(&record("Rouge", "Dior", 10.0));
        let id = store.lines()[0].id;

        let mut renderer = CartRenderer::new("$");
        let mut targets = CartTargets::default();
        renderer.render(&store, &mut targets);

        let remove = CartAction::Remove(id).control_id();
        let increase = CartAction::Increase(id).control_id();
        assert_eq!(renderer.binding(&increase), Some(CartAction::Increase(id)));
        assert!(renderer.dispatch(&remove, &mut store, &mut targets).is_some());
        assert!(store.is_empty());
        assert!(renderer.binding(&increase).is_none());
        assert!(renderer.binding(&remove).is_none());
        assert!(renderer.dispatch(&increase, &mut store, &mut targets).is_none());
        assert!(renderer.dispatch(&remove, &mut store, &mut targets).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_targets_are_skipped() {
        let mut store = CartStore::new();
        store.add(&record("Rouge", "Dior", 10.0));
        let mut renderer = CartRenderer::new("$");
        let mut targets = CartTargets {
            badge: Some(DisplayTarget::default()),
            ..CartTargets::default()
        };
        renderer.render(&store, &mut targets);
        assert_eq!(targets.badge.unwrap().text, "1");
        assert!(targets.footer.is_none());
    }

    #[test]
    fn test_html_escapes_text() {
        let mut store = CartStore::new();
        store.add(&record("<b>Rouge</b>", "Dior & Co", 10.0));
        let mut renderer = CartRenderer::new("$");
        renderer.render(&store, &mut CartTargets::default());

        let html = renderer.to_html();
        assert!(html.contains("&lt;b&gt;Rouge&lt;/b&gt;"));
        assert!(html.contains("Dior &amp; Co"));
        assert!(html.contains("Subtotal: $10.00"));
        assert!(html.contains("data-id=\"line-1\""));
    }

    #[test]
    fn test_html_escapes_attributes() {
        let mut store = CartStore::new();
        let mut product = record("Say \"Oui\"", "Dior", 10.0);
        product.image = "a\"b.jpg".to_string();
        store.add(&product);
        let mut renderer = CartRenderer::new("$");
        renderer.render(&store, &mut CartTargets::default());

        let html = renderer.to_html();
        assert!(html.contains("src=\"a&quot;b.jpg\""));
        assert!(html.contains("alt=\"Say &quot;Oui&quot;\""));
        assert!(html.contains("<div class=\"cart-item-name\">Say \"Oui\"</div>"));
    }
}
