//! Part number to model lookup

/// Known part-number prefixes and the model they identify
const PART_MODELS: &[(&str, &str)] = &[
    ("S548DF", "FS-548D-FPOE"),
    ("FS3E32", "FS-3032E"),
    ("FS1E48", "FS-1048E"),
    ("S108EF", "FS-108E-FPOE"),
    ("FP23JF", "FAP-23JF"),
];

/// Look up the model for a part-number prefix such as `S548DF`
///
/// The match is exact. Models are returned in the vendor's upper case.
#[must_use]
pub fn model_for_part(part: &str) -> Option<&'static str> {
    PART_MODELS
        .iter()
        .find(|(prefix, _)| *prefix == part)
        .map(|(_, model)| *model)
}
