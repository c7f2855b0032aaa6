use crate::report;
use anyhow::{anyhow, bail, Context, Result};
use colored::*;
use std::io::{self, BufRead, Write};
use storefront::filter::FilterDimension;
use storefront::{Event, LineId, Storefront};

const HELP: &str = "\
filter <category|brand|price> <value>   check a filter box
unfilter <category|brand|price> <value> uncheck a filter box
clear-filters                           uncheck every filter box
search <text>                           type into the search box
clear-search                            empty the search box
add <product-id>                        press a product's add-to-cart button
inc|dec|rm <line-id>                    cart line quantity controls
click <control-id>                      press a rendered cart control
open | close                            show or hide the cart panel
wish <product-id>                       toggle a product's wishlist heart
list | cart | html                      show the listing, cart or cart markup
quit                                    end the session";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(Event),
    List,
    Cart,
    Html,
    Help,
    Quit,
}

/// Parse one session line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (line, ""),
    };
    let required = |what: &str| -> Result<String> {
        if arg.is_empty() {
            bail!("'{}' needs a {}", verb, what);
        }
        Ok(arg.to_string())
    };
    let line_id = || -> Result<LineId> {
        arg.parse::<LineId>()
            .with_context(|| format!("'{}' needs a cart line id", verb))
    };

    let command = match verb {
        "filter" | "unfilter" => {
            let (dimension, value) = arg
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("usage: {} <category|brand|price> <value>", verb))?;
            Command::Event(Event::ToggleFilter {
                dimension: dimension.parse::<FilterDimension>()?,
                value: value.trim().to_string(),
                checked: verb == "filter",
            })
        }
        "clear-filters" => Command::Event(Event::ClearFilters),
        "search" => Command::Event(Event::SearchInput(arg.to_string())),
        "clear-search" => Command::Event(Event::ClearSearch),
        "add" => Command::Event(Event::AddToCart(required("product id")?)),
        "inc" => Command::Event(Event::Increase(line_id()?)),
        "dec" => Command::Event(Event::Decrease(line_id()?)),
        "rm" => Command::Event(Event::Remove(line_id()?)),
        "click" => Command::Event(Event::ControlClicked(required("control id")?)),
        "open" => Command::Event(Event::OpenCart),
        "close" => Command::Event(Event::CloseCart),
        "wish" => Command::Event(Event::ToggleWishlist(required("product id")?)),
        "list" => Command::List,
        "cart" => Command::Cart,
        "html" => Command::Html,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{}' (try 'help')", other),
    };
    Ok(Some(command))
}

/// Feed lines from `input` to the storefront until EOF or `quit`.
pub fn run<R: BufRead>(storefront: &mut Storefront, input: R, interactive: bool) -> Result<()> {
    prompt(interactive)?;
    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => execute(storefront, command),
            Err(e) => eprintln!("{} {}", "error:".red(), e),
        }
        prompt(interactive)?;
    }
    Ok(())
}

fn execute(storefront: &mut Storefront, command: Command) {
    match command {
        Command::Event(Event::ToggleWishlist(id)) => match storefront.toggle_wishlist(&id) {
            Some(true) => println!("{} added to wishlist", id),
            Some(false) => println!("{} removed from wishlist", id),
            None => {}
        },
        Command::Event(event) => storefront.handle(event),
        Command::List => report::print_listing(storefront.catalog()),
        Command::Cart => report::print_cart(storefront.cart_view()),
        Command::Html => println!("{}", storefront.cart_html()),
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

fn prompt(interactive: bool) -> io::Result<()> {
    if interactive {
        print!("{} ", ">".cyan());
        io::stdout().flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_keeps_spaces_in_value() {
        let cmd = parse_command("filter brand Estée Lauder").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Event(Event::ToggleFilter {
                dimension: FilterDimension::Brand,
                value: "Estée Lauder".to_string(),
                checked: true,
            })
        );
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert!(parse_command("   ").unwrap().is_none());
        assert!(parse_command("# setup").unwrap().is_none());
    }

    #[test]
    fn test_parse_line_ids() {
        let cmd = parse_command("dec line-3").unwrap().unwrap();
        assert_eq!(cmd, Command::Event(Event::Decrease("line-3".parse().unwrap())));
        assert!(parse_command("inc").is_err());
        assert!(parse_command("rm three").is_err());
    }

    #[test]
    fn test_parse_search_keeps_raw_text() {
        let cmd = parse_command("search  Rouge Dior").unwrap().unwrap();
        assert_eq!(cmd, Command::Event(Event::SearchInput("Rouge Dior".to_string())));
        let cmd = parse_command("search").unwrap().unwrap();
        assert_eq!(cmd, Command::Event(Event::SearchInput(String::new())));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(parse_command("checkout").is_err());
        assert!(parse_command("filter colour red").is_err());
        assert!(parse_command("filter brand").is_err());
    }
}
