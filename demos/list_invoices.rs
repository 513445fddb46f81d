use std::env;

use fakturoid::*;

fn var(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        eprintln!("{name} is not set");
        std::process::exit(2);
    })
}

fn main() -> Result<()> {
    let config = Config::new(
        var("FAKTUROID_SLUG"),
        var("FAKTUROID_EMAIL"),
        var("FAKTUROID_CLIENT_ID"),
        var("FAKTUROID_CLIENT_SECRET"),
    );
    let fa = Fakturoid::new(config)?;

    // ── Account ──────────────────────────────────────────────────────
    let account = fa.account()?;
    println!("=== {account} ({}) ===", account.subdomain);
    for bank in fa.bank_accounts()? {
        println!("  bank account: {bank}");
    }

    // ── Newest and oldest open invoice ───────────────────────────────
    let mut open = fa.invoices(&InvoiceFilter::new().status(InvoiceStatus::Open));
    if open.is_empty()? {
        println!("\nNo open invoices.");
    } else {
        println!("\n{} open invoice(s)", open.len()?);
        println!("  newest: {}", open.get(0)?);
        println!("  oldest: {}", open.get(-1)?);
    }

    // ── First ten overdue invoices ───────────────────────────────────
    println!("\n=== Overdue ===");
    let overdue = fa.invoices(&InvoiceFilter::new().status(InvoiceStatus::Overdue));
    for invoice in overdue.take(10) {
        let invoice = invoice?;
        match invoice.remaining_amount {
            Some(amount) => println!("  {invoice}: {amount} left to pay"),
            None => println!("  {invoice}"),
        }
    }

    Ok(())
}
