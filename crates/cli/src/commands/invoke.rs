//! Raw dispatch command.

use super::{with_ledger, DataDirArgs};
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct InvokeArgs {
    #[command(flatten)]
    store: DataDirArgs,

    /// Operation name (mint, balanceOf, withdraw, transfer, totalAmount, queryAllUsers, deleteUser)
    operation: String,

    /// Operation arguments
    #[arg(allow_hyphen_values = true)]
    args: Vec<String>,
}

pub fn run(args: InvokeArgs) -> Result<()> {
    with_ledger(&args.store, |ledger| {
        let payload = ledger.invoke(&args.operation, args.args.as_slice())?;

        if payload.is_empty() {
            println!("{}  {}", "✓".green().bold(), args.operation);
        } else {
            println!("{}", render_payload(&payload));
        }
        Ok(())
    })
}

/// Payloads are text for every built-in operation; anything else is shown as hex.
fn render_payload(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("0x{}", hex::encode(payload)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_payload() {
        assert_eq!(render_payload(b"100"), "100");
        assert_eq!(render_payload(br#"{"User":[]}"#), r#"{"User":[]}"#);
        assert_eq!(render_payload(&[0xff, 0x00]), "0xff00");
    }
}
