use crate::cart::{CartRenderer, CartStore, CartSummary, CartTargets, CartView, LineId};
use crate::catalog::{Catalog, ProductRecord};
use crate::config::AppConfig;
use crate::filter::{project, FilterControl, FilterCriteria, FilterDimension, Projection};
use tracing::{debug, warn};

/// Receives notifications from the storefront as the shopper interacts.
///
/// The CLI implements this with coloured terminal output.
/// All methods have default no-op implementations.
pub trait StorefrontListener {
    fn on_visibility_changed(&self, _projection: &Projection) {}
    fn on_cart_changed(&self, _summary: &CartSummary, _view: &CartView) {}
    fn on_cart_opened(&self) {}
    fn on_cart_closed(&self) {}
}

/// No-op listener for silent operation.
pub struct SilentListener;

impl StorefrontListener for SilentListener {}

/// One user interaction with the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ToggleFilter {
        dimension: FilterDimension,
        value: String,
        checked: bool,
    },
    ClearFilters,
    SearchInput(String),
    ClearSearch,
    AddToCart(String),
    ControlClicked(String),
    Increase(LineId),
    Decrease(LineId),
    Remove(LineId),
    OpenCart,
    CloseCart,
    ToggleWishlist(String),
}

/// The page-level event dispatcher: owns the listing, the filter controls,
/// the search box and the cart, and routes each event to the right engine.
///
/// Checkbox filters and search are evaluated together on every change.
pub struct Storefront {
    catalog: Catalog,
    controls: Vec<FilterControl>,
    search_input: String,
    search_clear_visible: bool,
    cart: CartStore,
    renderer: CartRenderer,
    targets: CartTargets,
    cart_open: bool,
    currency_symbol: String,
    open_cart_on_add: bool,
    listener: Box<dyn StorefrontListener>,
}

impl Storefront {
    /// Build the page with one checkbox per category and brand in the catalog
    /// plus the configured price buckets, and render the initial empty cart.
    pub fn new(catalog: Catalog, config: &AppConfig) -> Self {
        let mut controls: Vec<FilterControl> = Vec::new();
        for category in catalog.categories() {
            controls.push(FilterControl::new(FilterDimension::Category, category));
        }
        for brand in catalog.brands() {
            controls.push(FilterControl::new(FilterDimension::Brand, brand));
        }
        for bucket in &config.price_buckets {
            controls.push(FilterControl::new(FilterDimension::Price, bucket.clone()));
        }

        let mut storefront = Self {
            catalog,
            controls,
            search_input: String::new(),
            search_clear_visible: false,
            cart: CartStore::new(),
            renderer: CartRenderer::new(config.currency_symbol.clone()),
            targets: CartTargets::all(),
            cart_open: false,
            currency_symbol: config.currency_symbol.clone(),
            open_cart_on_add: config.open_cart_on_add,
            listener: Box::new(SilentListener),
        };
        storefront.renderer.render(&storefront.cart, &mut storefront.targets);
        storefront
    }

    pub fn with_listener(mut self, listener: Box<dyn StorefrontListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Replace the summary targets, e.g. to model a page missing some of them.
    pub fn with_targets(mut self, targets: CartTargets) -> Self {
        self.targets = targets;
        self.renderer.render(&self.cart, &mut self.targets);
        self
    }

    pub fn handle(&mut self, event: Event) {
        debug!("Event: {:?}", event);
        match event {
            Event::ToggleFilter {
                dimension,
                value,
                checked,
            } => self.set_filter(dimension, &value, checked),
            Event::ClearFilters => self.clear_filters(),
            Event::SearchInput(text) => self.search(&text),
            Event::ClearSearch => self.clear_search(),
            Event::AddToCart(product_id) => self.add_to_cart(&product_id),
            Event::ControlClicked(control_id) => self.click_control(&control_id),
            Event::Increase(id) => self.mutate_cart(|cart| cart.increase(id)),
            Event::Decrease(id) => self.mutate_cart(|cart| cart.decrease(id)),
            Event::Remove(id) => self.mutate_cart(|cart| cart.remove(id)),
            Event::OpenCart => self.open_cart(),
            Event::CloseCart => self.close_cart(),
            Event::ToggleWishlist(product_id) => {
                self.toggle_wishlist(&product_id);
            }
        }
    }

    /// Check or uncheck a filter control. A value with no matching control on
    /// the page is ignored.
    pub fn set_filter(&mut self, dimension: FilterDimension, value: &str, checked: bool) {
        match self
            .controls
            .iter_mut()
            .find(|c| c.dimension == dimension && c.value == value)
        {
            Some(control) => control.checked = checked,
            None => {
                debug!("No {} filter control for '{}'", dimension, value);
                return;
            }
        }
        self.apply_filters();
    }

    pub fn clear_filters(&mut self) {
        for control in self.controls.iter_mut() {
            control.checked = false;
        }
        self.apply_filters();
    }

    pub fn search(&mut self, text: &str) {
        self.search_input = text.to_string();
        self.search_clear_visible = !text.is_empty();
        self.apply_filters();
    }

    pub fn clear_search(&mut self) {
        self.search("");
    }

    pub fn add_to_cart(&mut self, product_id: &str) {
        let Some(card) = self.catalog.product(product_id) else {
            debug!("add: no product '{}' on the page", product_id);
            return;
        };
        let record = match ProductRecord::from_card(card, &self.currency_symbol) {
            Ok(record) => record,
            Err(e) => {
                warn!("Not adding '{}' to cart: {}", product_id, e);
                return;
            }
        };

        self.mutate_cart(|cart| cart.add(&record));
        if self.open_cart_on_add {
            self.open_cart();
        }
    }

    pub fn click_control(&mut self, control_id: &str) {
        if let Some(summary) = self
            .renderer
            .dispatch(control_id, &mut self.cart, &mut self.targets)
        {
            self.listener.on_cart_changed(&summary, self.renderer.view());
        }
    }

    pub fn open_cart(&mut self) {
        self.cart_open = true;
        self.listener.on_cart_opened();
    }

    pub fn close_cart(&mut self) {
        self.cart_open = false;
        self.listener.on_cart_closed();
    }

    /// Flip a card's wishlist flag, returning the new state.
    pub fn toggle_wishlist(&mut self, product_id: &str) -> Option<bool> {
        let card = self.catalog.product_mut(product_id)?;
        card.wishlisted = !card.wishlisted;
        Some(card.wishlisted)
    }

    /// Criteria as currently read from the controls and the search box.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_controls(&self.controls, &self.search_input)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn controls(&self) -> &[FilterControl] {
        &self.controls
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn summary(&self) -> CartSummary {
        self.cart.summary()
    }

    pub fn cart_view(&self) -> &CartView {
        self.renderer.view()
    }

    pub fn cart_html(&self) -> String {
        self.renderer.to_html()
    }

    pub fn renderer(&self) -> &CartRenderer {
        &self.renderer
    }

    pub fn targets(&self) -> &CartTargets {
        &self.targets
    }

    pub fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    pub fn is_search_clear_visible(&self) -> bool {
        self.search_clear_visible
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    fn apply_filters(&mut self) {
        let criteria = self.criteria();
        let projection = project(&mut self.catalog, &criteria);
        self.listener.on_visibility_changed(&projection);
    }

    fn mutate_cart<F>(&mut self, op: F)
    where
        F: FnOnce(&mut CartStore) -> CartSummary,
    {
        let summary = op(&mut self.cart);
        self.renderer.render(&self.cart, &mut self.targets);
        self.listener.on_cart_changed(&summary, self.renderer.view());
    }
}
