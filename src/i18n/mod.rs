use std::path::Path;

use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use unic_langid::LanguageIdentifier;

/// Languages shipped in the resources directory. English doubles as the
/// fallback when detection or loading fails.
const LANGUAGES: [&str; 2] = ["en", "de"];

/// Fluent-based internationalization.
pub struct I18n {
    bundle: FluentBundle<FluentResource>,
    lang: String,
}

impl I18n {
    /// Load `.ftl` files from the resources directory, preferring the
    /// system language and falling back to English.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();

        let sys_lang = sys_locale::get_locale()
            .unwrap_or_else(|| "en".to_string())
            .to_lowercase();

        let mut candidates: Vec<&str> = vec!["en"];
        for lang in LANGUAGES {
            if lang != "en" && sys_lang.starts_with(lang) {
                candidates.insert(0, lang);
            }
        }

        for lang in candidates {
            if let Some(i18n) = Self::try_load(dir, lang) {
                return i18n;
            }
        }

        // Empty fallback: every lookup degrades to its message identifier.
        let langid: LanguageIdentifier = "en".parse().unwrap();
        Self {
            bundle: FluentBundle::new(vec![langid]),
            lang: "en".to_string(),
        }
    }

    fn try_load(dir: &Path, lang: &str) -> Option<Self> {
        let path = dir.join(format!("{}.ftl", lang));
        let source = std::fs::read_to_string(&path).ok()?;
        let resource = FluentResource::try_new(source).ok()?;
        let langid: LanguageIdentifier = lang.parse().ok()?;
        let mut bundle = FluentBundle::new(vec![langid]);
        bundle.add_resource(resource).ok()?;
        Some(Self {
            bundle,
            lang: lang.to_string(),
        })
    }

    /// Get a translated message by its identifier.
    pub fn t(&self, id: &str) -> String {
        self.format(id, None)
    }

    /// Get a translated message with arguments.
    pub fn t_args(&self, id: &str, args: &FluentArgs) -> String {
        self.format(id, Some(args))
    }

    fn format(&self, id: &str, args: Option<&FluentArgs>) -> String {
        let msg = match self.bundle.get_message(id) {
            Some(m) => m,
            None => return id.to_string(),
        };
        let pattern = match msg.value() {
            Some(p) => p,
            None => return id.to_string(),
        };
        let mut errors = vec![];
        self.bundle
            .format_pattern(pattern, args, &mut errors)
            .to_string()
    }

    #[allow(dead_code)]
    pub fn current_language(&self) -> &str {
        &self.lang
    }
}
