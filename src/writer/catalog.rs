/// One translation unit of an external catalog
pub trait CatalogItem {
    fn source(&self) -> &str;

    /// Plural form of the source, for items carrying plural translations.
    fn plural_source(&self) -> Option<&str> {
        None
    }

    fn translations(&self) -> &[String];
    fn is_fuzzy(&self) -> bool;
    fn is_translated(&self) -> bool;
}

/// External catalog: a language pair plus its units
pub trait Catalog {
    type Item: CatalogItem;

    fn source_language(&self) -> Option<&str>;
    fn target_language(&self) -> Option<&str>;
    fn items(&self) -> &[Self::Item];
}

/// Plain in-memory unit, for callers without a catalog model of their own
#[derive(Debug, Clone, Default)]
pub struct CatalogUnit {
    pub source: String,
    pub plural_source: Option<String>,
    pub translations: Vec<String>,
    pub fuzzy: bool,
}

impl CatalogUnit {
    pub fn new(source: &str, translation: &str) -> Self {
        CatalogUnit {
            source: source.to_string(),
            translations: vec![translation.to_string()],
            ..Default::default()
        }
    }

    pub fn plural(source: &str, plural_source: &str, forms: &[&str]) -> Self {
        CatalogUnit {
            source: source.to_string(),
            plural_source: Some(plural_source.to_string()),
            translations: forms.iter().map(|f| f.to_string()).collect(),
            fuzzy: false,
        }
    }

    pub fn fuzzy(mut self) -> Self {
        self.fuzzy = true;
        self
    }
}

impl CatalogItem for CatalogUnit {
    fn source(&self) -> &str {
        &self.source
    }

    fn plural_source(&self) -> Option<&str> {
        self.plural_source.as_deref()
    }

    fn translations(&self) -> &[String] {
        &self.translations
    }

    fn is_fuzzy(&self) -> bool {
        self.fuzzy
    }

    fn is_translated(&self) -> bool {
        !self.translations.is_empty() && self.translations.iter().all(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogData {
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub units: Vec<CatalogUnit>,
}

impl Catalog for CatalogData {
    type Item = CatalogUnit;

    fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    fn target_language(&self) -> Option<&str> {
        self.target_language.as_deref()
    }

    fn items(&self) -> &[CatalogUnit] {
        &self.units
    }
}

/// (source, translation) pairs an item contributes; empty when the item
/// is unusable.
pub(crate) fn item_pairs<I: CatalogItem + ?Sized>(item: &I) -> Vec<(&str, &str)> {
    if item.is_fuzzy() || !item.is_translated() {
        return Vec::new();
    }

    let translations = item.translations();
    let pairs = match item.plural_source() {
        None => match translations.first() {
            Some(translation) => vec![(item.source(), translation.as_str())],
            None => Vec::new(),
        },
        // Only the common two-form case maps cleanly onto singular/plural
        // sources.
        Some(plural) if translations.len() == 2 => vec![
            (item.source(), translations[0].as_str()),
            (plural, translations[1].as_str()),
        ],
        Some(_) => Vec::new(),
    };

    pairs.into_iter()
        .filter(|(source, translation)| !source.is_empty() && !translation.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_and_untranslated_items_contribute_nothing() {
        assert!(item_pairs(&CatalogUnit::new("Save", "Enregistrer").fuzzy()).is_empty());
        assert!(item_pairs(&CatalogUnit::new("Save", "")).is_empty());
        assert_eq!(item_pairs(&CatalogUnit::new("Save", "Enregistrer")), vec![("Save", "Enregistrer")]);
    }

    #[test]
    fn two_form_plurals_split_into_two_pairs() {
        let unit = CatalogUnit::plural("%d file", "%d files", &["%d fichier", "%d fichiers"]);
        assert_eq!(item_pairs(&unit), vec![("%d file", "%d fichier"), ("%d files", "%d fichiers")]);

        let czech = CatalogUnit::plural("%d file", "%d files", &["%d soubor", "%d soubory", "%d souborů"]);
        assert!(item_pairs(&czech).is_empty());
    }
}
