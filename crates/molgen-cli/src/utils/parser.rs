use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid quantity bound '{0}'. Expected 'UNIT=N' (e.g., 'C=6').")]
    MissingSeparator(String),

    #[error("Unit reference cannot be empty in '{0}'.")]
    EmptyUnit(String),

    #[error("Quantity '{value}' in '{input}' is not a non-negative integer.")]
    InvalidQuantity { value: String, input: String },
}

/// Splits a `UNIT=N` bound into the unit reference and its quantity.
///
/// The reference is split at the last `=`, so unit names may themselves
/// contain one.
pub fn parse_quantity_bound(input: &str) -> Result<(String, u32), ParseError> {
    let (unit, value) = input
        .rsplit_once('=')
        .ok_or_else(|| ParseError::MissingSeparator(input.to_string()))?;

    let unit = unit.trim();
    if unit.is_empty() {
        return Err(ParseError::EmptyUnit(input.to_string()));
    }

    let value = value.trim();
    let quantity = value.parse().map_err(|_| ParseError::InvalidQuantity {
        value: value.to_string(),
        input: input.to_string(),
    })?;

    Ok((unit.to_string(), quantity))
}
