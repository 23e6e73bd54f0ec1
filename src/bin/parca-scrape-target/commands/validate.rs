use anyhow::{bail, Result};
use clap::Parser;
use parca_scrape_target::parser::validate_address;

#[derive(Parser, Clone)]
pub struct Arguments {
    /// The addresses to validate, in the `host:port` format. Addresses are
    /// checked as-is, surrounding whitespace is not removed.
    #[clap(required = true)]
    addresses: Vec<String>,
}

pub fn handle_command(args: Arguments) -> Result<()> {
    let mut invalid = 0;

    for address in &args.addresses {
        match validate_address(address) {
            Ok(_) => println!("{address}: valid"),
            Err(err) => {
                invalid += 1;
                println!("{address}: invalid ({err})");
            }
        }
    }

    if invalid > 0 {
        bail!(
            "{invalid} of {} addresses are invalid",
            args.addresses.len()
        );
    }

    Ok(())
}
