use ratings_core::RatingsError;
use std::path::Path;

/// Symbols from a watch file: the first line is a header, the second a
/// comma-separated list. Symbols are upper-cased and de-duplicated in order.
pub fn parse_symbols(contents: &str) -> Result<Vec<String>, RatingsError> {
    let line = contents
        .lines()
        .nth(1)
        .ok_or_else(|| RatingsError::InvalidData("symbols file has no symbol line".to_string()))?;

    let mut symbols: Vec<String> = Vec::new();
    for symbol in line.split(',').map(|s| s.trim().to_uppercase()) {
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    if symbols.is_empty() {
        return Err(RatingsError::InvalidData("symbols file lists no symbols".to_string()));
    }
    Ok(symbols)
}

pub async fn load_symbols(path: &Path) -> Result<Vec<String>, RatingsError> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        RatingsError::InvalidData(format!("unable to read symbols file {}: {}", path.display(), e))
    })?;
    parse_symbols(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbols() {
        let symbols = parse_symbols("symbols\nAAPL, msft,TSLA\n").unwrap();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "TSLA"]);
    }

    #[test]
    fn test_parse_symbols_crlf_and_duplicates() {
        let symbols = parse_symbols("symbols\r\nAAPL,,aapl,GME\r\nignored,line\r\n").unwrap();
        assert_eq!(symbols, vec!["AAPL", "GME"]);
    }

    #[test]
    fn test_parse_symbols_header_only() {
        assert!(parse_symbols("symbols\n").is_err());
        assert!(parse_symbols("").is_err());
        assert!(parse_symbols("symbols\n , ,\n").is_err());
    }

    #[tokio::test]
    async fn test_load_symbols_missing_file() {
        let err = load_symbols(Path::new("/nonexistent/symbols.csv")).await.unwrap_err();
        assert!(err.to_string().contains("unable to read symbols file"));
    }
}
