//! Recorded price tape used to drive the paper exchange

use std::fs;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::grid::{GridError, GridResult};

/// Sequence of last-trade prices, replayed one per tick
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTape {
    prices: Vec<Decimal>,
}

impl PriceTape {
    pub fn new(prices: Vec<Decimal>) -> GridResult<Self> {
        if prices.is_empty() {
            return Err(GridError::PriceTape("tape has no prices".into()));
        }
        if let Some(bad) = prices.iter().find(|p| **p <= Decimal::ZERO) {
            return Err(GridError::PriceTape(format!("non-positive price {}", bad)));
        }
        Ok(Self { prices })
    }

    /// Read a tape file: one decimal per line, blank lines and `#` comments skipped
    pub fn load(path: impl AsRef<Path>) -> GridResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| GridError::PriceTape(format!("{}: {}", path.display(), e)))?;
        content.parse()
    }

    pub fn first(&self) -> Decimal {
        self.prices[0]
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn prices(&self) -> &[Decimal] {
        &self.prices
    }
}

impl FromStr for PriceTape {
    type Err = GridError;

    fn from_str(s: &str) -> GridResult<Self> {
        let mut prices = Vec::new();
        for (n, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let price = Decimal::from_str(line)
                .map_err(|e| GridError::PriceTape(format!("line {}: {:?}: {}", n + 1, line, e)))?;
            prices.push(price);
        }
        Self::new(prices)
    }
}

impl IntoIterator for PriceTape {
    type Item = Decimal;
    type IntoIter = std::vec::IntoIter<Decimal>;

    fn into_iter(self) -> Self::IntoIter {
        self.prices.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let tape: PriceTape = "# warmup\n100\n\n 99.5 \n101.25\n".parse().unwrap();
        assert_eq!(tape.prices(), &[dec!(100), dec!(99.5), dec!(101.25)]);
        assert_eq!(tape.first(), dec!(100));
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let err = "100\nabc\n".parse::<PriceTape>().unwrap_err();
        assert!(matches!(err, GridError::PriceTape(msg) if msg.starts_with("line 2")));
    }

    #[test]
    fn test_empty_and_negative_tapes_rejected() {
        assert!("# nothing\n".parse::<PriceTape>().is_err());
        assert!("100\n-1\n".parse::<PriceTape>().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "100\n99").unwrap();

        let tape = PriceTape::load(file.path()).unwrap();
        assert_eq!(tape.len(), 2);
        assert!(PriceTape::load("/nonexistent/prices.txt").is_err());
    }
}
