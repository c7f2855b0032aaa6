/// Format an amount with the currency symbol and two decimal places.
pub fn format_money(currency_symbol: &str, amount: f64) -> String {
    format!("{}{:.2}", currency_symbol, amount)
}
