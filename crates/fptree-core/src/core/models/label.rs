use std::fmt;

/// Spectral metadata recovered from a taxon label.
///
/// The curation pipeline names sequences `species|protein|ex/em`, where the
/// trailing pair are the excitation and emission maxima in nanometers. This
/// struct is the typed form of that convention, parsed once at ingestion so
/// downstream stages never re-match the raw string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpectralMetadata {
    pub species_code: String,
    pub protein_name: String,
    pub excitation_nm: u32,
    pub emission_nm: u32,
}

/// A taxon label: the raw display text plus optional spectral metadata.
///
/// A label decomposes only when its tail matches `|<digits>/<digits>`;
/// anything else (placeholder `-` values, stray separators, no `|` at all)
/// leaves the metadata empty. A missing species field is fine, the
/// wavelengths still parse. A malformed tail is never an error: such a
/// taxon simply renders with the default color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxonLabel {
    raw: String,
    metadata: Option<SpectralMetadata>,
}

impl TaxonLabel {
    /// Parses a raw label, extracting spectral metadata when present.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let metadata = parse_metadata(&raw);
        Self { raw, metadata }
    }

    /// The raw display text of the label.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed spectral metadata, if the label follows the convention.
    pub fn metadata(&self) -> Option<&SpectralMetadata> {
        self.metadata.as_ref()
    }

    /// Shortcut for the emission maximum, the value driving leaf coloring.
    pub fn emission_nm(&self) -> Option<u32> {
        self.metadata.as_ref().map(|m| m.emission_nm)
    }
}

impl fmt::Display for TaxonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for TaxonLabel {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

fn parse_metadata(raw: &str) -> Option<SpectralMetadata> {
    let (head, tail) = raw.rsplit_once('|')?;
    let (excitation, emission) = tail.split_once('/')?;
    let excitation_nm = parse_digits(excitation)?;
    let emission_nm = parse_digits(emission)?;

    // Only the trailing wavelength field has fixed meaning; the species and
    // protein decomposition is best-effort. Protein names may themselves
    // contain '|', and a label can omit the species field entirely.
    let (species_code, protein_name) = match head.split_once('|') {
        Some((species, protein)) => (species.to_string(), protein.to_string()),
        None => (String::new(), head.to_string()),
    };

    Some(SpectralMetadata {
        species_code,
        protein_name,
        excitation_nm,
        emission_nm,
    })
}

fn parse_digits(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_label_yields_metadata() {
        let label = TaxonLabel::new("Cpop|CpYGFP|508/518");

        let meta = label.metadata().expect("metadata should parse");
        assert_eq!(meta.species_code, "Cpop");
        assert_eq!(meta.protein_name, "CpYGFP");
        assert_eq!(meta.excitation_nm, 508);
        assert_eq!(meta.emission_nm, 518);
        assert_eq!(label.emission_nm(), Some(518));
        assert_eq!(label.raw(), "Cpop|CpYGFP|508/518");
    }

    #[test]
    fn plain_name_has_no_metadata() {
        let label = TaxonLabel::new("DsRed");
        assert!(label.metadata().is_none());
        assert_eq!(label.emission_nm(), None);
    }

    #[test]
    fn wrong_separator_in_tail_is_not_metadata() {
        // A real curation typo: '/' where '|' was intended.
        let label = TaxonLabel::new("Amac|GFPxm/476/496");
        assert!(label.metadata().is_none());
    }

    #[test]
    fn placeholder_excitation_is_not_metadata() {
        let label = TaxonLabel::new("Cmem|cmFP512|-/512");
        assert!(label.metadata().is_none());
    }

    #[test]
    fn label_without_species_field_still_carries_wavelengths() {
        let label = TaxonLabel::new("LanFP1|500/510");
        let meta = label.metadata().expect("metadata should parse");
        assert_eq!(meta.species_code, "");
        assert_eq!(meta.protein_name, "LanFP1");
        assert_eq!(meta.excitation_nm, 500);
        assert_eq!(label.emission_nm(), Some(510));
    }

    #[test]
    fn pipe_inside_protein_name_is_kept() {
        let label = TaxonLabel::new("Xsp|odd|name|500/510");
        let meta = label.metadata().expect("metadata should parse");
        assert_eq!(meta.species_code, "Xsp");
        assert_eq!(meta.protein_name, "odd|name");
        assert_eq!(meta.emission_nm, 510);
    }

    #[test]
    fn non_numeric_tail_is_rejected() {
        assert!(TaxonLabel::new("Avic|GFP|50a/510").metadata().is_none());
        assert!(TaxonLabel::new("Avic|GFP|/510").metadata().is_none());
        assert!(TaxonLabel::new("Avic|GFP|500/").metadata().is_none());
    }
}
