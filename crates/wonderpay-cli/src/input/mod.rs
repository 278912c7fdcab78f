//! Request sources for `capital-calculate`: a JSON file, piped stdin, or
//! neither (flags are used instead).

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use wonderpay_core::capital::LoanCalculationRequest;

/// Load a request from `path` when given, otherwise from piped stdin.
/// `Ok(None)` means there was nothing to read and flags apply.
pub fn read_request(path: Option<&str>) -> Result<Option<LoanCalculationRequest>, Box<dyn Error>> {
    if let Some(path) = path {
        return from_file(Path::new(path)).map(Some);
    }
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut body = String::new();
    io::stdin().read_to_string(&mut body)?;
    parse_body(&body, "stdin")
}

fn from_file(path: &Path) -> Result<LoanCalculationRequest, Box<dyn Error>> {
    if !path.is_file() {
        return Err(format!("No request file at {}", path.display()).into());
    }
    let body = fs::read_to_string(path)?;
    match parse_body(&body, &path.display().to_string())? {
        Some(request) => Ok(request),
        None => Err(format!("Request file {} is empty", path.display()).into()),
    }
}

fn parse_body(body: &str, source: &str) -> Result<Option<LoanCalculationRequest>, Box<dyn Error>> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }
    LoanCalculationRequest::from_json(body)
        .map(Some)
        .map_err(|e| format!("{source}: {e}").into())
}
