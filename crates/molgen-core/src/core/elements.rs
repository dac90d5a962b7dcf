use phf::{Map, phf_map};

/// Conventional standard atomic weights (IUPAC, abridged to three decimals)
/// for the elements most often used when composing small molecules.
#[rustfmt::skip]
static STANDARD_ATOMIC_WEIGHTS: Map<&'static str, f64> = phf_map! {
    // --- Period 1 ---
    "H"  => 1.008,   "He" => 4.003,

    // --- Period 2 ---
    "Li" => 6.94,    "Be" => 9.012,  "B"  => 10.81,  "C"  => 12.011,
    "N"  => 14.007,  "O"  => 15.999, "F"  => 18.998, "Ne" => 20.180,

    // --- Period 3 ---
    "Na" => 22.990,  "Mg" => 24.305, "Al" => 26.982, "Si" => 28.085,
    "P"  => 30.974,  "S"  => 32.06,  "Cl" => 35.45,  "Ar" => 39.948,

    // --- Period 4 ---
    "K"  => 39.098,  "Ca" => 40.078, "Mn" => 54.938, "Fe" => 55.845,
    "Co" => 58.933,  "Ni" => 58.693, "Cu" => 63.546, "Zn" => 65.38,
    "Se" => 78.971,  "Br" => 79.904,

    // --- Heavier, common in reagents ---
    "Ag" => 107.868, "Sn" => 118.710, "I"  => 126.904, "Pt" => 195.084,
    "Au" => 196.967, "Hg" => 200.592, "Pb" => 207.2,
};

/// Looks up the standard atomic weight for an element symbol.
///
/// Symbols are normalized to conventional capitalization first, so `"cl"` and
/// `"CL"` both resolve to chlorine.
pub fn standard_atomic_weight(symbol: &str) -> Option<f64> {
    let normalized = normalize_symbol(symbol)?;
    STANDARD_ATOMIC_WEIGHTS.get(normalized.as_str()).copied()
}

/// Returns the canonical capitalization of a known element symbol.
pub fn canonical_symbol(symbol: &str) -> Option<&'static str> {
    let normalized = normalize_symbol(symbol)?;
    STANDARD_ATOMIC_WEIGHTS
        .get_key(normalized.as_str())
        .copied()
}

fn normalize_symbol(symbol: &str) -> Option<String> {
    let mut chars = symbol.trim().chars();
    let first = chars.next()?;
    let rest: String = chars.flat_map(char::to_lowercase).collect();
    Some(first.to_uppercase().chain(rest.chars()).collect())
}
