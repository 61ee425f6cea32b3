use std::path::Path;

use crate::error::{Context, Result};

/// Read ticker symbols from the first column of a header-less CSV file.
pub fn load_ticker_file(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open ticker list at {}", path.display()))?;

    let mut tickers = Vec::new();
    for result in reader.records() {
        let record = result
            .with_context(|| format!("failed to read ticker list at {}", path.display()))?;
        match record.get(0) {
            Some(ticker) if !ticker.is_empty() => tickers.push(ticker.to_string()),
            _ => continue,
        }
    }

    Ok(tickers)
}

/// Command-line tickers first, then file entries. Order and repeats are kept.
pub fn collect_tickers<I, J>(args: I, file_entries: J) -> Vec<String>
where
    I: IntoIterator<Item = String>,
    J: IntoIterator<Item = String>,
{
    args.into_iter()
        .chain(file_entries)
        .map(|ticker| ticker.trim().to_string())
        .filter(|ticker| !ticker.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_first_column_and_skips_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# NSE large caps").unwrap();
        writeln!(file, "RELIANCE.NS, Reliance Industries").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  TCS.NS  ").unwrap();
        writeln!(file, "^NSEI").unwrap();

        let tickers = load_ticker_file(file.path()).unwrap();

        assert_eq!(tickers, vec!["RELIANCE.NS", "TCS.NS", "^NSEI"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_ticker_file(Path::new("no/such/tickers.csv")).is_err());
    }

    #[test]
    fn arguments_precede_file_entries_and_duplicates_survive() {
        let tickers = collect_tickers(
            vec!["INFY.NS".to_string(), " ".to_string(), "TCS.NS".to_string()],
            vec!["TCS.NS".to_string(), " HDFCBANK.NS".to_string()],
        );
        assert_eq!(tickers, vec!["INFY.NS", "TCS.NS", "TCS.NS", "HDFCBANK.NS"]);
    }
}
